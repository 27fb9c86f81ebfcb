use clap::Parser;
use tracing::{error, Level};

use parksystem::{
    cli::{run_migrate, run_send_test_notification, run_serve, Cli, Commands},
    error::Error,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let result = app_main().await;

    if let Err(err) = &result {
        error!("{}", err);
    }

    result
}

async fn app_main() -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level(Level::INFO)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_serve().await,
        Commands::Migrate => run_migrate().await,
        Commands::SendTestNotification => run_send_test_notification().await,
    }
}
