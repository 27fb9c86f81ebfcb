pub use self::{
    auth::{
        AccessTokenResponse, DetailResponse, GoogleClaims, GoogleLoginRequest,
        LoginRequest, RefreshRequest, RegisterRequest, TokenClaims,
        TokenPairResponse, TokenType, UserResponse,
    },
    decimal::{check_decimal, money, DecimalInput},
    pricing::{
        days_until, default_pricing, quote, PricingRequest, PricingResponse,
        QuoteQuery, QuoteResponse,
    },
    profile::{Plan, ProfileResponse, SetPlanRequest},
    push::{
        PushData, PushHeader, SubscriptionData, SubscriptionKeys,
        SubscriptionRequest, SubscriptionResponse, Urgency, VapidClaims,
    },
    reservation::{
        FlightStatus, ReservationRequest, ReservationResponse,
        MISSING_FLIGHT_NUMBER,
    },
};

mod auth;
mod decimal;
mod pricing;
mod profile;
mod push;
mod reservation;
