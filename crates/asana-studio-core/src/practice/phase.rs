//! Training phase of a step, by ordinal position in the queue.
//!
//! `ratio = index / len`: below 0.25 is warmup, below 0.75 is peak, the rest
//! is cooldown. Hold times do not weigh in.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Warmup,
    Peak,
    Cooldown,
}

impl Phase {
    /// Classify step `index` of a queue of `len` steps.
    ///
    /// Returns `None` for an empty queue. Integer comparison keeps the
    /// thresholds exact (`index * 4 < len` is `ratio < 0.25`).
    pub fn classify(index: usize, len: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }
        let scaled = index.saturating_mul(4);
        Some(if scaled < len {
            Phase::Warmup
        } else if scaled < len.saturating_mul(3) {
            Phase::Peak
        } else {
            Phase::Cooldown
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Warmup => "warmup",
            Phase::Peak => "peak",
            Phase::Cooldown => "cooldown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shorthand for [`Phase::classify`].
pub fn phase(index: usize, len: usize) -> Option<Phase> {
    Phase::classify(index, len)
}

/// Phase label for every position of a queue of `len` steps, used when an
/// imported sequence carries no phase tags of its own.
pub fn phase_labels(len: usize) -> Vec<Phase> {
    (0..len).filter_map(|i| Phase::classify(i, len)).collect()
}
