//! State-change notifications.
//!
//! Every engine command returns the events it produced, in order. The
//! session controller republishes them on an [`EventBus`] the presentation
//! layer subscribes to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::announce::Cue;
use crate::practice::{Phase, PoseId, Side};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    QueueChanged {
        len: usize,
        total_seconds: u64,
        at: DateTime<Utc>,
    },
    SessionStarted {
        session_id: Uuid,
        steps: usize,
        at: DateTime<Utc>,
    },
    /// A step became current, either by countdown or by next/prev.
    StepLoaded {
        index: usize,
        pose_id: PoseId,
        english_name: String,
        side: Side,
        hold_seconds: u32,
        phase: Phase,
        /// Display name of the following step, `None` on the last one.
        next_up: Option<String>,
        at: DateTime<Utc>,
    },
    Ticked {
        index: usize,
        seconds_left: u32,
        at: DateTime<Utc>,
    },
    Paused {
        index: usize,
        seconds_left: u32,
        at: DateTime<Utc>,
    },
    Resumed {
        index: usize,
        seconds_left: u32,
        at: DateTime<Utc>,
    },
    SessionFinished {
        session_id: Uuid,
        steps: usize,
        at: DateTime<Utc>,
    },
    SessionExited {
        session_id: Option<Uuid>,
        index: Option<usize>,
        at: DateTime<Utc>,
    },
    Announced {
        cue: Cue,
        text: String,
        at: DateTime<Utc>,
    },
    VoiceToggled {
        enabled: bool,
        at: DateTime<Utc>,
    },
}

/// Fan-out of [`Event`]s to any number of subscribers.
///
/// Publishing never blocks and never fails the caller: with no subscriber
/// attached the event is simply dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Returns the number of subscribers that received the event.
    pub fn publish(&self, event: Event) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
