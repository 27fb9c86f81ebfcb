pub use self::types::{DataBase, PoolOption, PoolType, QueryResult};

mod pricing_settings;
mod push_subscription;
mod reservation;
mod types;
mod user;
mod user_profile;
