//! CLI command definitions and subcommands

use clap::{Parser, Subcommand, ValueEnum};
use daytypes::{Goal, Mood};
use std::path::PathBuf;

/// DayPlan - mood-aware daily planner
#[derive(Parser)]
#[command(
    name = "dp",
    about = "Daily planner: pick a mood, energy, time and goals, get an AI-generated schedule",
    version,
    after_help = "Logs are written to ~/.local/share/dayplan/logs/dayplan.log so the TUI stays clean."
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Plan service base URL (overrides service.base-url)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Subcommand to execute (defaults to `tui`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive terminal UI (default)
    Tui,

    /// Check the plan service once; exits non-zero when it is unreachable
    Health,

    /// Generate a plan without the TUI
    Generate {
        /// How you feel (happy, focused, energetic, calm, tired, stressed, anxious, sad)
        #[arg(short, long)]
        mood: Mood,

        /// Energy level from 1 to 5
        #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
        energy: u8,

        /// Available hours (0.5 to 24)
        #[arg(short, long, default_value_t = 8.0)]
        time: f64,

        /// Goal to plan for; repeat for several (work, study, exercise, health, social, creative, relaxation, chores)
        #[arg(short, long = "goal", required = true)]
        goals: Vec<Goal>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// How `generate` prints the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored table
    Text,
    /// `{"plan": [...]}` as returned by the service
    Json,
}
