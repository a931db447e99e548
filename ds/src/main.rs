//! DayServe - DayPlan plan service
//!
//! CLI entry point for running the HTTP service.

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info};

use dayserve::cli::{Cli, Command};
use dayserve::config::Config;
use dayserve::server;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let level = daytypes::log_level::resolve_level(cli_log_level, config_log_level);

    // Service logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Provider keys usually live in .env during development
    let dotenv = dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;
    if let Some(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Config) => {
            debug!("main: matched Config command");
            print!("{}", config.to_yaml()?);
            Ok(())
        }
        Some(Command::Serve { host, port }) => {
            debug!(?host, ?port, "main: matched Serve command");
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            server::run(&config).await
        }
        None => {
            debug!("main: no command, serving");
            server::run(&config).await
        }
    }
}
