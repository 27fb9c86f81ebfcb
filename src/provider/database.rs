use crate::{
    configuration::Config,
    dao::{PoolOption, PoolType},
    error::Error,
    model::{
        PricingSettings, PushSubscription, Reservation, Table, User,
        UserProfile,
    },
};

#[derive(Debug)]
pub struct DatabasePool {
    pub user: Table<User>,
    pub reservation: Table<Reservation>,
    pub user_profile: Table<UserProfile>,
    pub pricing_settings: Table<PricingSettings>,
    pub push_subscription: Table<PushSubscription>,
    pub pool: PoolType,
}

impl DatabasePool {
    pub async fn new(config: &Config) -> Result<DatabasePool, Error> {
        let pool = PoolOption::new()
            .max_connections(config.max_connections)
            .connect(config.database_url.as_str())
            .await?;

        Ok(DatabasePool::from_pool(pool))
    }

    pub fn from_pool(pool: PoolType) -> DatabasePool {
        DatabasePool {
            pool: pool.clone(),
            user: Table::new(pool.clone()),
            reservation: Table::new(pool.clone()),
            user_profile: Table::new(pool.clone()),
            pricing_settings: Table::new(pool.clone()),
            push_subscription: Table::new(pool),
        }
    }

    pub fn get_pool(&self) -> &PoolType {
        &self.pool
    }
}
