//! TUI Runner - main loop that owns the terminal
//!
//! The runner is the only place that mutates the App. It waits on three
//! sources at once: terminal events, health updates from the monitor task and
//! the result of an in-flight plan request.

use std::sync::Arc;
use std::time::Duration;

use daytypes::{Plan, PlanRequest};
use eyre::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::views;
use crate::api::{ClientError, PlanServiceClient};
use crate::config::Config;
use crate::health::{HealthMonitor, HealthMonitorHandle, HealthUpdate};

/// Input poll interval; also the redraw cadence when idle
const TICK_RATE: Duration = Duration::from_millis(100);

/// What woke the loop up
enum Wake {
    Event(Event),
    Health(HealthUpdate),
    Generated(Result<Plan, ClientError>),
}

/// TUI Runner that manages the terminal and event loop
pub struct TuiRunner {
    app: App,
    terminal: Tui,
    event_handler: EventHandler,
    client: Arc<PlanServiceClient>,
    monitor: Option<HealthMonitorHandle>,
    health_rx: mpsc::Receiver<HealthUpdate>,
    /// Result channel of the in-flight plan request
    generate_rx: Option<mpsc::Receiver<Result<Plan, ClientError>>>,
    generate_task: Option<JoinHandle<()>>,
}

impl TuiRunner {
    /// Create the runner and start health monitoring
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(terminal: Tui, client: PlanServiceClient, config: &Config) -> Self {
        debug!(base_url = %client.base_url(), "TuiRunner::new: called");
        let client = Arc::new(client);
        let (health_tx, health_rx) = mpsc::channel(8);
        let monitor = HealthMonitor::spawn(
            client.clone(),
            config.health.poll_interval(),
            config.service.health_timeout(),
            health_tx,
        );

        Self {
            app: App::new(),
            terminal,
            event_handler: EventHandler::new(TICK_RATE),
            client,
            monitor: Some(monitor),
            health_rx,
            generate_rx: None,
            generate_task: None,
        }
    }

    /// Run the TUI main loop until the user quits
    pub async fn run(&mut self) -> Result<()> {
        debug!("TuiRunner::run: entering main loop");
        let result = self.main_loop().await;
        self.shutdown().await;
        debug!("TuiRunner::run: exiting");
        result
    }

    async fn main_loop(&mut self) -> Result<()> {
        loop {
            self.terminal.draw(|frame| views::render(&self.app, frame))?;

            let wake = tokio::select! {
                event = self.event_handler.next() => Wake::Event(event?),
                Some(update) = self.health_rx.recv() => Wake::Health(update),
                result = recv_generation(&mut self.generate_rx) => Wake::Generated(
                    result.unwrap_or_else(|| Err(ClientError::Service("Plan request ended unexpectedly".to_string()))),
                ),
            };

            match wake {
                Wake::Event(Event::Key(key)) => {
                    if self.app.handle_key(key) {
                        debug!("TuiRunner::main_loop: force quit");
                        break;
                    }
                    if let Some(request) = self.app.take_pending_generate() {
                        self.spawn_generation(request);
                    }
                }
                Wake::Event(Event::Resize(width, height)) => {
                    debug!(width, height, "TuiRunner::main_loop: resize");
                }
                Wake::Event(Event::Tick) => {}
                Wake::Health(update) => {
                    self.app.state_mut().apply_health(update);
                }
                Wake::Generated(result) => {
                    self.generate_rx = None;
                    self.generate_task = None;
                    self.app.state_mut().finish_generate(result);
                    self.app.clamp_plan_cursor();
                }
            }

            if self.app.should_quit {
                debug!("TuiRunner::main_loop: should_quit is true, breaking");
                break;
            }
        }
        Ok(())
    }

    fn spawn_generation(&mut self, request: PlanRequest) {
        debug!(%request.mood, "TuiRunner::spawn_generation: called");
        let (tx, rx) = mpsc::channel(1);
        let client = self.client.clone();

        self.generate_task = Some(tokio::spawn(async move {
            let result = client.generate_plan(&request).await;
            if tx.send(result).await.is_err() {
                debug!("TuiRunner: generation result dropped, runner gone");
            }
        }));
        self.generate_rx = Some(rx);
    }

    /// Stop background work; the terminal is restored by the caller
    async fn shutdown(&mut self) {
        debug!("TuiRunner::shutdown: called");
        if let Some(task) = self.generate_task.take() {
            info!("Aborting in-flight plan request");
            task.abort();
        }
        self.generate_rx = None;

        match self.monitor.take() {
            Some(monitor) => monitor.stop().await,
            None => warn!("Health monitor was already stopped"),
        }
    }
}

/// Wait for the in-flight request; never resolves when there is none
async fn recv_generation(
    rx: &mut Option<mpsc::Receiver<Result<Plan, ClientError>>>,
) -> Option<Result<Plan, ClientError>> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
