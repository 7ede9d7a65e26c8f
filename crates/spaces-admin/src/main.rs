//! spaces-admin entry point
//!
//! ```bash
//! cargo run -p spaces-admin -- provision
//! cargo run -p spaces-admin -- teardown --yes
//! cargo run -p spaces-admin -- compact
//! ```

use clap::Parser;
use spaces_admin::{connect, execute, Cli, Outcome};
use spaces_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Before parsing so `DATABASE_URL` may come from .env
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            std::process::exit(2);
        }
    };

    if let Err(e) = init_tracing(&cli, &config) {
        eprintln!("Warning: Failed to initialize tracing: {e:#}");
    }

    if let Err(e) = run(&cli, &config).await {
        error!(error = %e, command = cli.command.name(), "Command failed");
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let builder = AppConfig::with_sources(AppConfig::defaults()?)
        .set_override_option("database.url", cli.database_url.clone())?;
    Ok(AppConfig::from_builder(builder)?)
}

fn init_tracing(cli: &Cli, config: &AppConfig) -> anyhow::Result<()> {
    let mut telemetry = config.telemetry.clone();
    if let Some(level) = &cli.log_level {
        telemetry.level.clone_from(level);
    }
    telemetry.json |= cli.json_logs;

    try_init_tracing_with_config(&TracingConfig::from_settings(&telemetry)?)?;
    Ok(())
}

async fn run(cli: &Cli, config: &AppConfig) -> anyhow::Result<()> {
    info!(command = cli.command.name(), env = ?config.app.env, "spaces-admin starting");

    let store = connect(config).await?;
    match execute(cli.command, store, config).await? {
        Outcome::Provisioned => println!("provisioned"),
        Outcome::TornDown => println!("torn down"),
        Outcome::Compacted { removed } => println!("removed {removed} expired restraint(s)"),
    }

    Ok(())
}
