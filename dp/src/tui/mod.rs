//! Terminal user interface
//!
//! Mood and goal pickers, energy and time controls, and the generated plan
//! as a table with per-task completion toggles. A header dot shows whether
//! the plan service answered its last health check.

mod app;
mod events;
mod runner;
mod views;

pub use app::{App, Focus};
pub use events::{Event, EventHandler};
pub use runner::TuiRunner;
pub use views::plan_rows;

use std::io::{self, Stdout};

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use eyre::Result;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::api::PlanServiceClient;
use crate::config::Config;

/// Terminal type alias
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Switch the terminal into raw alternate-screen mode
pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the interactive client until the user quits
pub async fn run(config: &Config) -> Result<()> {
    let client = PlanServiceClient::from_config(&config.service)?;
    let terminal = init()?;

    // Restore the terminal even on early return or error
    struct TerminalGuard;
    impl Drop for TerminalGuard {
        fn drop(&mut self) {
            let _ = restore();
        }
    }
    let _guard = TerminalGuard;

    let mut runner = TuiRunner::new(terminal, client, config);
    runner.run().await
}
