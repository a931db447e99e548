//! TUI application - key handling
//!
//! The App owns the [`AppState`] plus the cursor and focus bookkeeping that
//! only the interactive view needs. It never renders and never does I/O: a
//! generate key press leaves a pending request for the runner to pick up.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use daytypes::{Goal, Mood, PlanRequest};
use tracing::debug;

use crate::state::{AppState, GenerateBlocked};

/// Hours added or removed per key press
pub const TIME_STEP: f64 = 0.5;

/// Which panel receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Mood,
    Energy,
    Time,
    Goals,
    Plan,
}

impl Focus {
    const ORDER: [Focus; 5] = [Focus::Mood, Focus::Energy, Focus::Time, Focus::Goals, Focus::Plan];

    pub fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// TUI application
#[derive(Debug, Default)]
pub struct App {
    state: AppState,
    pub focus: Focus,
    pub mood_cursor: usize,
    pub goal_cursor: usize,
    pub plan_cursor: usize,
    pub show_help: bool,
    pub should_quit: bool,
    /// Accepted generate action waiting for the runner
    pending_generate: Option<PlanRequest>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Request accepted by the last generate key press, if any
    pub fn take_pending_generate(&mut self) -> Option<PlanRequest> {
        self.pending_generate.take()
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit immediately.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        debug!(code = ?key.code, focus = ?self.focus, "App::handle_key: called");

        if self.show_help {
            self.show_help = false;
            return false;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return true,
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => {
                self.should_quit = true;
            }
            (KeyCode::Char('?'), _) | (KeyCode::F(1), _) => {
                self.show_help = true;
            }
            (KeyCode::Tab, _) => {
                self.focus = self.focus.next();
            }
            (KeyCode::BackTab, _) => {
                self.focus = self.focus.prev();
            }
            (KeyCode::Char('g'), _) => {
                self.request_generate();
            }
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => self.move_cursor(-1),
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => self.move_cursor(1),
            (KeyCode::Left, _) | (KeyCode::Char('h'), _) | (KeyCode::Char('-'), _) => self.adjust(-1),
            (KeyCode::Right, _) | (KeyCode::Char('l'), _) | (KeyCode::Char('+'), _) => self.adjust(1),
            (KeyCode::Enter, _) | (KeyCode::Char(' '), _) => self.activate(),
            _ => {}
        }
        false
    }

    fn request_generate(&mut self) {
        match self.state.begin_generate() {
            Ok(request) => {
                debug!("App::request_generate: accepted");
                self.pending_generate = Some(request);
            }
            Err(GenerateBlocked::Loading) => {
                debug!("App::request_generate: already loading, ignored");
            }
            Err(blocked) => {
                debug!(%blocked, "App::request_generate: refused");
            }
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        match self.focus {
            Focus::Mood => self.mood_cursor = step(self.mood_cursor, delta, Mood::ALL.len()),
            Focus::Goals => self.goal_cursor = step(self.goal_cursor, delta, Goal::ALL.len()),
            Focus::Plan => {
                let len = self.state.plan.as_ref().map_or(0, |p| p.len());
                self.plan_cursor = step(self.plan_cursor, delta, len);
            }
            // Up/down nudge the numeric fields too
            Focus::Energy | Focus::Time => self.adjust(-delta),
        }
    }

    fn adjust(&mut self, delta: isize) {
        match self.focus {
            Focus::Energy => {
                let energy = self.state.energy.saturating_add_signed(delta as i8);
                self.state.set_energy(energy);
            }
            Focus::Time => {
                let hours = self.state.available_time + TIME_STEP * delta as f64;
                self.state.set_available_time(hours);
            }
            _ => {}
        }
    }

    fn activate(&mut self) {
        match self.focus {
            Focus::Mood => {
                if let Some(mood) = Mood::ALL.get(self.mood_cursor) {
                    self.state.select_mood(*mood);
                }
            }
            Focus::Goals => {
                if let Some(goal) = Goal::ALL.get(self.goal_cursor) {
                    self.state.toggle_goal(*goal);
                }
            }
            Focus::Plan => {
                self.state.toggle_complete(self.plan_cursor);
            }
            Focus::Energy | Focus::Time => self.request_generate(),
        }
    }

    /// Keep the plan cursor inside the current plan
    pub fn clamp_plan_cursor(&mut self) {
        let len = self.state.plan.as_ref().map_or(0, |p| p.len());
        self.plan_cursor = self.plan_cursor.min(len.saturating_sub(1));
    }
}

/// Move `current` by `delta` within `0..len`, stopping at the ends
fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}
