//! Caller identity: tokens issued by this service, provider ID tokens
//! and the request extractor guarding the API.

pub use self::{
    extractor::AuthUser,
    google::{
        inspect_claims, verify_google_token, GoogleIdentity, EXPIRED, INVALID_SIGNATURE,
    },
    token::{issue_token, issue_token_pair, validate_token},
};

mod extractor;
mod google;
mod token;
