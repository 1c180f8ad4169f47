//! Tunables of the conflict engine.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::models::TimeWindow;

/// Proximity tolerance and time-alternative offset.
///
/// The defaults (±30 minutes, ±1 hour) are the platform's booking rules;
/// the `[conflicts]` section of `repository.toml` may override them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictPolicy {
    /// Half-width of the proximity window, in minutes.
    #[serde(default = "default_window_minutes")]
    pub window_minutes: i64,
    /// Offset of the earlier/later time alternatives, in minutes.
    #[serde(default = "default_time_shift_minutes")]
    pub time_shift_minutes: i64,
}

fn default_window_minutes() -> i64 {
    30
}

fn default_time_shift_minutes() -> i64 {
    60
}

impl Default for ConflictPolicy {
    fn default() -> Self {
        Self {
            window_minutes: default_window_minutes(),
            time_shift_minutes: default_time_shift_minutes(),
        }
    }
}

impl ConflictPolicy {
    pub fn window_around(&self, time: NaiveTime) -> TimeWindow {
        TimeWindow::around(time, self.window_minutes)
    }
}
