//! DayPlan - daily planning client
//!
//! CLI entry point: interactive TUI by default, plus one-shot `health` and
//! `generate` commands.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use dayplan::api::PlanServiceClient;
use dayplan::cli::{Cli, Command, OutputFormat};
use dayplan::config::Config;
use dayplan::{report, tui};
use daytypes::{Goal, Mood, PlanRequest};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Logs go to a file so they never draw over the TUI
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dayplan")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = daytypes::log_level::resolve_level(cli_log_level, config_log_level);

    let log_file = fs::File::create(log_dir.join("dayplan.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(url) = cli.url {
        config.service.base_url = url;
    }

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None | Some(Command::Tui) => {
            debug!("main: running TUI");
            tui::run(&config).await
        }
        Some(Command::Health) => {
            debug!("main: matched Health command");
            run_health(&config).await
        }
        Some(Command::Generate {
            mood,
            energy,
            time,
            goals,
            format,
        }) => {
            debug!(%mood, energy, time, "main: matched Generate command");
            run_generate(&config, mood, energy, time, goals, format).await
        }
    }
}

async fn run_health(config: &Config) -> Result<()> {
    let client = PlanServiceClient::from_config(&config.service)?;
    match client.check_health().await {
        Ok(health) => {
            println!(
                "{} {} {}",
                "●".green(),
                client.base_url(),
                format!("healthy: {}", health.message).green()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {} {}", "●".red(), client.base_url(), "unreachable".red());
            Err(e).context(format!("Health check of {} failed", client.base_url()))
        }
    }
}

async fn run_generate(
    config: &Config,
    mood: Mood,
    energy: u8,
    time: f64,
    goals: Vec<Goal>,
    format: OutputFormat,
) -> Result<()> {
    let request = PlanRequest::new(mood, energy, time, goals)?;
    let client = PlanServiceClient::from_config(&config.service)?;

    let plan = client.generate_plan(&request).await.context("Failed to generate plan")?;

    match format {
        OutputFormat::Text => print!("{}", report::format_table(&request, &plan)),
        OutputFormat::Json => println!("{}", report::format_json(&plan)?),
    }
    Ok(())
}
