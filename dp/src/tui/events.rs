//! Terminal input pump
//!
//! crossterm's event reading blocks, so it runs on its own thread and feeds a
//! tokio channel the runner can select on.

use std::time::Duration;

use crossterm::event::{self, KeyEvent, KeyEventKind};
use eyre::Result;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Terminal events
#[derive(Debug)]
pub enum Event {
    /// Key press
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Nothing happened within one tick
    Tick,
}

/// Event handler for the TUI
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Start the polling thread; a `Tick` is sent whenever `tick_rate` passes quietly
    pub fn new(tick_rate: Duration) -> Self {
        debug!(?tick_rate, "EventHandler::new: called");
        let (tx, rx) = mpsc::unbounded_channel();

        std::thread::spawn(move || {
            debug!("EventHandler: polling thread started");
            loop {
                let event = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        // Windows reports releases too
                        Ok(event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                            trace!(?key, "EventHandler: key event");
                            Event::Key(key)
                        }
                        Ok(event::Event::Resize(w, h)) => Event::Resize(w, h),
                        _ => continue,
                    }
                } else {
                    Event::Tick
                };

                if tx.send(event).is_err() {
                    debug!("EventHandler: channel closed, exiting thread");
                    break;
                }
            }
        });

        Self { rx }
    }

    /// Next terminal event
    pub async fn next(&mut self) -> Result<Event> {
        self.rx.recv().await.ok_or_else(|| eyre::eyre!("Event channel closed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ticks_without_terminal_input() {
        let mut handler = EventHandler::new(Duration::from_millis(10));
        let event = tokio::time::timeout(Duration::from_secs(5), handler.next())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(event, Event::Tick | Event::Resize(..) | Event::Key(_)));
    }
}
