use std::process::ExitCode;

use clap::Parser;
use player_equivalence::cli::Cli;
use player_equivalence::server::{self, AppState};
use player_equivalence::{logger, Error, Settings};

async fn run(cli: Cli) -> Result<(), Error> {
    let settings = cli.apply(Settings::from_env()?)?;
    tracing::info!(model = %settings.model, base_url = %settings.base_url, "configuration loaded");

    let chain = settings.build_chain()?;
    server::serve(AppState::new(chain), &cli.server_config()).await
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logger::init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            ExitCode::FAILURE
        }
    }
}
