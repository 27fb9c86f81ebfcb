//! CLI module for the parking reservation service
//!
//! Runs the HTTP server by default; maintenance commands run against the
//! same configuration without starting it.

use clap::{Parser, Subcommand};

use crate::{
    configuration::{get_configuration, set_configuration, AppState, Config, State},
    error::Error,
    handler::send_push,
    migration,
    provider::{DatabasePool, HTTP},
    server,
    types::PushData,
};

/// Parking reservation backend
#[derive(Parser)]
#[command(name = "parksystem")]
#[command(about = "Multi-tenant parking reservation service", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default if no command specified)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Send a test notification to every stored push subscription
    SendTestNotification,
}

/// Initialize configuration and return Config
pub fn init_config() -> Result<Config, Error> {
    set_configuration()?;
    get_configuration()
}

async fn init_state() -> Result<AppState<State>, Error> {
    let config = init_config()?;
    let database = DatabasePool::new(&config).await?;
    let http = HTTP::new(config.clone())?;

    Ok(AppState::new(State::new(config, database, http)))
}

pub async fn run_serve() -> Result<(), Error> {
    let app_state = init_state().await?;
    migration::run_migrations(app_state.database.get_pool()).await?;
    server::server_task(&app_state).await
}

pub async fn run_migrate() -> Result<(), Error> {
    let config = init_config()?;
    let database = DatabasePool::new(&config).await?;

    migration::run_migrations(database.get_pool()).await?;
    tracing::info!("Migrations complete");

    Ok(())
}

pub async fn run_send_test_notification() -> Result<(), Error> {
    let app_state = init_state().await?;
    let summary = send_push::broadcast(&app_state, &PushData::test()).await?;

    tracing::info!(
        "Test notification finished: {} sent, {} failed",
        summary.sent,
        summary.failed
    );

    Ok(())
}
