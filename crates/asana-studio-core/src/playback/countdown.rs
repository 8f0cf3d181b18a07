//! Cancellable repeating countdown.
//!
//! The engine never waits. It owns one `Countdown`, which holds at most one
//! live [`CountdownHandle`]. The host schedules a repeating timer for that
//! handle and reports each firing back; firings for a handle that has since
//! been cancelled or replaced are discarded.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identity of one scheduled repeating countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountdownHandle(u64);

impl CountdownHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Countdown {
    period: Duration,
    active: Option<CountdownHandle>,
    next_id: u64,
}

impl Countdown {
    /// One virtual second of real time.
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

    pub fn new(period: Duration) -> Self {
        Self {
            period,
            active: None,
            next_id: 1,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn active(&self) -> Option<CountdownHandle> {
        self.active
    }

    pub fn is_armed(&self) -> bool {
        self.active.is_some()
    }

    /// Number of live countdowns: 0 or 1.
    pub fn active_count(&self) -> usize {
        usize::from(self.active.is_some())
    }

    pub fn is_current(&self, handle: CountdownHandle) -> bool {
        self.active == Some(handle)
    }

    /// Cancel any live countdown and schedule a fresh one.
    pub fn arm(&mut self) -> CountdownHandle {
        self.cancel();
        let handle = CountdownHandle(self.next_id);
        self.next_id += 1;
        self.active = Some(handle);
        handle
    }

    /// Cancel the live countdown, if any. Safe to call repeatedly.
    pub fn cancel(&mut self) -> Option<CountdownHandle> {
        self.active.take()
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERIOD)
    }
}
