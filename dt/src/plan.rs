//! Plan items and the ordered plan

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::priority::Priority;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// One scheduled activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    /// Start time label, e.g. "09:00"
    pub time: String,

    pub activity: String,

    pub description: String,

    /// Length in minutes
    pub duration: u32,

    pub priority: Priority,

    /// Only ever set by the user
    #[serde(default)]
    pub completed: bool,
}

impl PlanItem {
    /// Create an uncompleted item
    pub fn new(
        time: impl Into<String>,
        activity: impl Into<String>,
        description: impl Into<String>,
        duration: u32,
        priority: Priority,
    ) -> Self {
        Self {
            time: time.into(),
            activity: activity.into(),
            description: description.into(),
            duration,
            priority,
            completed: false,
        }
    }

    /// Duration for display, e.g. "120 min"
    pub fn duration_label(&self) -> String {
        format!("{} min", self.duration)
    }
}

/// Chronological sequence of plan items
///
/// Order is meaningful and never changed by any operation here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plan {
    items: Vec<PlanItem>,
}

impl Plan {
    pub fn new(items: Vec<PlanItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[PlanItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<PlanItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PlanItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlanItem> {
        self.items.iter()
    }

    /// Flip `completed` on the item at `index`
    ///
    /// Returns false (and changes nothing) when `index` is out of range.
    pub fn toggle_complete(&mut self, index: usize) -> bool {
        debug!(index, len = self.items.len(), "Plan::toggle_complete: called");
        match self.items.get_mut(index) {
            Some(item) => {
                item.completed = !item.completed;
                debug!(index, completed = item.completed, "Plan::toggle_complete: toggled");
                true
            }
            None => {
                debug!(index, "Plan::toggle_complete: index out of range");
                false
            }
        }
    }

    /// Sum of all item durations in minutes
    pub fn total_minutes(&self) -> u32 {
        self.items.iter().map(|i| i.duration).sum()
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|i| i.completed).count()
    }

    /// Rewrite start times back-to-back from `start_hour:00`
    ///
    /// Wraps past midnight. Order and every other field are untouched.
    pub fn retime_from(&mut self, start_hour: u32) {
        debug!(start_hour, len = self.items.len(), "Plan::retime_from: called");
        let mut minute = (start_hour * 60) % MINUTES_PER_DAY;
        for item in &mut self.items {
            item.time = format!("{:02}:{:02}", minute / 60, minute % 60);
            minute = (minute + item.duration) % MINUTES_PER_DAY;
        }
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a PlanItem;
    type IntoIter = std::slice::Iter<'a, PlanItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl From<Vec<PlanItem>> for Plan {
    fn from(items: Vec<PlanItem>) -> Self {
        Self::new(items)
    }
}
