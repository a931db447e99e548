//! Periodic health monitoring of the plan service
//!
//! One background task probes the service immediately and then on a fixed
//! interval, reporting each result over a channel. Checks never overlap: the
//! next tick is only awaited once the previous probe finished or timed out.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::api::HealthProbe;

/// Connection state shown to the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HealthStatus {
    /// No check has completed yet
    #[default]
    Checking,
    Connected,
    Error,
}

impl HealthStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Checking => "Checking...",
            HealthStatus::Connected => "Connected",
            HealthStatus::Error => "Disconnected",
        }
    }
}

/// Result of one completed check
#[derive(Debug, Clone, PartialEq)]
pub struct HealthUpdate {
    pub status: HealthStatus,
    /// Human-readable reason when the check failed
    pub message: Option<String>,
    pub checked_at: DateTime<Local>,
}

impl HealthUpdate {
    pub fn connected() -> Self {
        Self {
            status: HealthStatus::Connected,
            message: None,
            checked_at: Local::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Error,
            message: Some(message.into()),
            checked_at: Local::now(),
        }
    }
}

/// Run one probe bounded by `timeout`
pub async fn check_once(probe: &dyn HealthProbe, timeout: Duration) -> HealthUpdate {
    debug!(?timeout, "check_once: called");
    match tokio::time::timeout(timeout, probe.probe()).await {
        Ok(Ok(())) => HealthUpdate::connected(),
        Ok(Err(e)) => HealthUpdate::error(e.to_string()),
        Err(_) => HealthUpdate::error(format!("Health check timed out after {:?}", timeout)),
    }
}

/// Spawns the monitoring task
pub struct HealthMonitor;

impl HealthMonitor {
    /// Start polling `probe` every `interval`, sending each result to `updates_tx`
    ///
    /// Each probe is bounded by `probe_timeout`, capped at the interval. The
    /// task ends when stopped, when the handle is dropped, or when the
    /// receiver goes away.
    pub fn spawn(
        probe: Arc<dyn HealthProbe>,
        interval: Duration,
        probe_timeout: Duration,
        updates_tx: mpsc::Sender<HealthUpdate>,
    ) -> HealthMonitorHandle {
        let probe_timeout = probe_timeout.min(interval);
        debug!(?interval, ?probe_timeout, "HealthMonitor::spawn: called");
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(run(probe, interval, probe_timeout, updates_tx, shutdown_rx));

        HealthMonitorHandle {
            shutdown_tx,
            task: Some(task),
        }
    }
}

async fn run(
    probe: Arc<dyn HealthProbe>,
    interval: Duration,
    probe_timeout: Duration,
    updates_tx: mpsc::Sender<HealthUpdate>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    info!("Health monitor started (interval: {:?})", interval);
    // First tick completes immediately
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last_status = None;
    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                debug!("HealthMonitor: shutdown received while idle");
                break;
            }
            _ = ticker.tick() => {}
        }

        let update = tokio::select! {
            _ = shutdown_rx.recv() => {
                debug!("HealthMonitor: shutdown received during check");
                break;
            }
            update = check_once(probe.as_ref(), probe_timeout) => update,
        };

        if last_status != Some(update.status) {
            match update.status {
                HealthStatus::Connected => info!("Plan service is reachable"),
                _ => warn!(message = ?update.message, "Plan service is unreachable"),
            }
            last_status = Some(update.status);
        }

        if updates_tx.send(update).await.is_err() {
            debug!("HealthMonitor: receiver dropped");
            break;
        }
    }
    info!("Health monitor stopped");
}

/// Owner's handle on the monitoring task
pub struct HealthMonitorHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: Option<JoinHandle<()>>,
}

impl HealthMonitorHandle {
    /// Cancel the task and wait for it to finish
    pub async fn stop(mut self) {
        debug!("HealthMonitorHandle::stop: called");
        let _ = self.shutdown_tx.try_send(());
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            warn!(error = %e, "Health monitor task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|t| t.is_finished())
    }
}

impl Drop for HealthMonitorHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            debug!("HealthMonitorHandle::drop: aborting task");
            task.abort();
        }
    }
}
