//! Read-only view of the session for a renderer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::playback::PlaybackState;
use crate::practice::{Phase, PoseStep};

/// Label shown under the timer when there is no following step.
pub const LAST_STEP_LABEL: &str = "Last pose";
/// Position text once the session has finished.
pub const DONE_LABEL: &str = "Done";

/// Everything the player screen shows, derived on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: PlaybackState,
    pub current_index: Option<usize>,
    pub step: Option<PoseStep>,
    /// `LEFT SIDE` / `RIGHT SIDE`, empty for two-sided steps.
    pub side_label: String,
    pub phase: Option<Phase>,
    pub seconds_left: u32,
    pub total_seconds_for_step: u32,
    /// `M:SS`.
    pub time_remaining: String,
    pub next_up: Option<String>,
    /// Fraction of the current hold still remaining.
    pub timer_ring: f64,
    /// `current_index / len`, 1.0 once finished.
    pub session_progress: f64,
    /// `current / len` (1-based), or `Done`.
    pub position: String,
    pub queue_len: usize,
    pub total_duration_seconds: u64,
    pub voice_enabled: bool,
    pub glyph: Option<String>,
    pub at: DateTime<Utc>,
}

/// Format seconds as `M:SS`.
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Format seconds as `Xm Ys`, the queue summary style.
pub fn format_total(secs: u64) -> String {
    format!("{}m {}s", secs / 60, secs % 60)
}

/// `Next: <name>` for the step after `index`, or the last-step marker.
pub fn next_up_label(steps: &[PoseStep], index: usize) -> String {
    match steps.get(index + 1) {
        Some(next) => format!("Next: {}", next.display_name()),
        None => LAST_STEP_LABEL.to_string(),
    }
}
