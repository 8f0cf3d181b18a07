//! Playback engine implementation.
//!
//! A virtual-second state machine over a borrowed [`Queue`]. It does not use
//! internal threads or timers: the host fires the countdown it owns and the
//! engine only does the accounting.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Playing <-> Paused
//!           |           |
//!           +--> Finished <--+
//! (any) -- exit --> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = PlaybackEngine::default();
//! engine.start(&queue)?;
//! // once per virtual second:
//! let events = engine.tick(&queue);
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::countdown::{Countdown, CountdownHandle};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::practice::{Phase, Queue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// No session.
    #[default]
    Idle,
    Playing,
    Paused,
    /// The last step ran out. The session is gone until `start` or `exit`.
    Finished,
}

impl PlaybackState {
    /// Playing or Paused.
    pub fn is_active(&self) -> bool {
        matches!(self, PlaybackState::Playing | PlaybackState::Paused)
    }
}

/// One run-through of the queue. Exists only while Playing or Paused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackSession {
    pub id: Uuid,
    /// 0-based position in the queue.
    pub current_index: usize,
    /// Never exceeds `total_seconds_for_step`.
    pub seconds_left: u32,
    /// Hold time of the current step, captured when the step was loaded.
    pub total_seconds_for_step: u32,
    pub started_at: DateTime<Utc>,
}

/// Tunables the host passes in when building an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSettings {
    /// Real-time length of one virtual second.
    pub tick_period: Duration,
    pub voice_enabled: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            tick_period: Countdown::DEFAULT_PERIOD,
            voice_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlaybackEngine {
    state: PlaybackState,
    session: Option<PlaybackSession>,
    countdown: Countdown,
}

impl PlaybackEngine {
    pub fn new(tick_period: Duration) -> Self {
        Self {
            state: PlaybackState::Idle,
            session: None,
            countdown: Countdown::new(tick_period),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn current_index(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.current_index)
    }

    pub fn seconds_left(&self) -> u32 {
        self.session.as_ref().map(|s| s.seconds_left).unwrap_or(0)
    }

    /// Fraction of the current step's hold time still remaining, 0.0 ..= 1.0.
    pub fn timer_ring(&self) -> f64 {
        match &self.session {
            Some(s) if s.total_seconds_for_step > 0 => {
                f64::from(s.seconds_left) / f64::from(s.total_seconds_for_step)
            }
            _ => 0.0,
        }
    }

    /// `current_index / len`; 1.0 once finished.
    pub fn session_progress(&self, len: usize) -> f64 {
        if self.state == PlaybackState::Finished {
            return 1.0;
        }
        match &self.session {
            Some(s) if len > 0 => (s.current_index as f64 / len as f64).min(1.0),
            _ => 0.0,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a new session at the first step. Any previous session is
    /// discarded first.
    pub fn start(&mut self, queue: &Queue) -> Result<Vec<Event>> {
        if queue.is_empty() {
            return Err(CoreError::invalid("cannot start a practice with an empty queue"));
        }
        self.countdown.cancel();

        let session = PlaybackSession {
            id: Uuid::new_v4(),
            current_index: 0,
            seconds_left: 0,
            total_seconds_for_step: 0,
            started_at: Utc::now(),
        };
        let session_id = session.id;
        self.session = Some(session);
        self.state = PlaybackState::Playing;
        info!(%session_id, steps = queue.len(), "practice started");

        let mut events = vec![Event::SessionStarted {
            session_id,
            steps: queue.len(),
            at: Utc::now(),
        }];
        events.push(self.load_step(0, queue));
        if self.is_playing() {
            self.countdown.arm();
        }
        Ok(events)
    }

    /// Advance one virtual second. A no-op unless Playing with a live countdown.
    pub fn tick(&mut self, queue: &Queue) -> Vec<Event> {
        if !self.is_playing() || !self.countdown.is_armed() {
            return Vec::new();
        }
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };

        session.seconds_left = session.seconds_left.saturating_sub(1);
        if session.seconds_left > 0 {
            return vec![Event::Ticked {
                index: session.current_index,
                seconds_left: session.seconds_left,
                at: Utc::now(),
            }];
        }

        let next = session.current_index + 1;
        self.countdown.cancel();
        let event = self.load_step(next, queue);
        if self.is_playing() {
            self.countdown.arm();
        }
        vec![event]
    }

    /// Tick on behalf of a host timer. Firings for a handle that is no longer
    /// live are dropped.
    pub fn countdown_fired(&mut self, handle: CountdownHandle, queue: &Queue) -> Vec<Event> {
        if !self.countdown.is_current(handle) {
            debug!(handle = handle.id(), "stale countdown firing ignored");
            return Vec::new();
        }
        self.tick(queue)
    }

    pub fn pause(&mut self) -> Result<Vec<Event>> {
        if self.state != PlaybackState::Playing {
            return Err(self.rejected("pause"));
        }
        self.countdown.cancel();
        self.state = PlaybackState::Paused;
        let (index, seconds_left) = self.position();
        debug!(index, seconds_left, "paused");
        Ok(vec![Event::Paused {
            index,
            seconds_left,
            at: Utc::now(),
        }])
    }

    pub fn resume(&mut self) -> Result<Vec<Event>> {
        if self.state != PlaybackState::Paused {
            return Err(self.rejected("resume"));
        }
        self.state = PlaybackState::Playing;
        self.countdown.arm();
        let (index, seconds_left) = self.position();
        debug!(index, seconds_left, "resumed");
        Ok(vec![Event::Resumed {
            index,
            seconds_left,
            at: Utc::now(),
        }])
    }

    /// Skip to the following step; past the last one the session finishes.
    pub fn next(&mut self, queue: &Queue) -> Result<Vec<Event>> {
        let index = self.current_index().filter(|_| self.state.is_active());
        let Some(index) = index else {
            return Err(self.rejected("next"));
        };
        Ok(vec![self.jump(index + 1, queue)])
    }

    /// Go back one step, clamped at the first. The step restarts at full hold.
    pub fn prev(&mut self, queue: &Queue) -> Result<Vec<Event>> {
        let index = self.current_index().filter(|_| self.state.is_active());
        let Some(index) = index else {
            return Err(self.rejected("prev"));
        };
        Ok(vec![self.jump(index.saturating_sub(1), queue)])
    }

    /// Leave playback from any state.
    pub fn exit(&mut self) -> Vec<Event> {
        self.countdown.cancel();
        let session = self.session.take();
        self.state = PlaybackState::Idle;
        info!(session_id = ?session.as_ref().map(|s| s.id), "practice exited");
        vec![Event::SessionExited {
            session_id: session.as_ref().map(|s| s.id),
            index: session.as_ref().map(|s| s.current_index),
            at: Utc::now(),
        }]
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Load `index`, keeping Playing/Paused as it was.
    fn jump(&mut self, index: usize, queue: &Queue) -> Event {
        let was_playing = self.is_playing();
        self.countdown.cancel();
        let event = self.load_step(index, queue);
        if was_playing && self.is_playing() {
            self.countdown.arm();
        }
        event
    }

    /// Make `index` the current step, or finish when it is past the end.
    fn load_step(&mut self, index: usize, queue: &Queue) -> Event {
        let Some(step) = queue.get(index) else {
            return self.finish(queue.len());
        };
        if self.session.is_none() {
            return self.finish(queue.len());
        }

        let hold = step.hold_seconds().get();
        if let Some(session) = self.session.as_mut() {
            session.current_index = index;
            session.total_seconds_for_step = hold;
            session.seconds_left = hold;
        }

        let phase = Phase::classify(index, queue.len()).unwrap_or(Phase::Warmup);
        let next_up = queue.get(index + 1).map(|s| s.display_name());
        debug!(index, pose = step.english_name(), side = %step.side(), hold, %phase, "step loaded");

        Event::StepLoaded {
            index,
            pose_id: step.pose_id(),
            english_name: step.english_name().to_string(),
            side: step.side(),
            hold_seconds: hold,
            phase,
            next_up,
            at: Utc::now(),
        }
    }

    fn finish(&mut self, steps: usize) -> Event {
        self.countdown.cancel();
        self.state = PlaybackState::Finished;
        let session_id = self
            .session
            .take()
            .map(|s| s.id)
            .unwrap_or_else(Uuid::nil);
        info!(%session_id, steps, "practice complete");
        Event::SessionFinished {
            session_id,
            steps,
            at: Utc::now(),
        }
    }

    fn position(&self) -> (usize, u32) {
        self.session
            .as_ref()
            .map(|s| (s.current_index, s.seconds_left))
            .unwrap_or((0, 0))
    }

    fn rejected(&self, command: &str) -> CoreError {
        CoreError::invalid(format!("cannot {command} while {:?}", self.state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::practice::{HoldSeconds, PoseStep, Side};

    fn queue(holds: &[i64]) -> Queue {
        holds
            .iter()
            .enumerate()
            .map(|(i, h)| {
                PoseStep::new(i as i64, format!("Pose {i}"), Side::Both, HoldSeconds::clamped(*h))
            })
            .collect()
    }

    fn tick_n(engine: &mut PlaybackEngine, q: &Queue, n: usize) {
        for _ in 0..n {
            engine.tick(q);
        }
    }

    #[test]
    fn start_on_empty_queue_stays_idle() {
        let mut engine = PlaybackEngine::default();
        assert!(engine.start(&Queue::new()).is_err());
        assert_eq!(engine.state(), PlaybackState::Idle);
        assert!(engine.session().is_none());
        assert!(!engine.countdown().is_armed());
    }

    #[test]
    fn start_loads_first_step() {
        let q = queue(&[5, 5, 5]);
        let mut engine = PlaybackEngine::default();
        let events = engine.start(&q).unwrap();
        assert!(matches!(events[0], Event::SessionStarted { steps: 3, .. }));
        assert!(matches!(
            events[1],
            Event::StepLoaded { index: 0, hold_seconds: 5, phase: Phase::Warmup, .. }
        ));
        assert_eq!(engine.state(), PlaybackState::Playing);
        assert_eq!(engine.current_index(), Some(0));
        assert_eq!(engine.seconds_left(), 5);
        assert!(engine.countdown().is_armed());
    }

    #[test]
    fn countdown_advances_and_finishes() {
        let q = queue(&[5, 5, 5]);
        let mut engine = PlaybackEngine::default();
        engine.start(&q).unwrap();

        tick_n(&mut engine, &q, 5);
        assert_eq!(engine.current_index(), Some(1));
        assert_eq!(engine.seconds_left(), 5);

        tick_n(&mut engine, &q, 10);
        assert_eq!(engine.state(), PlaybackState::Finished);
        assert!(!engine.is_playing());
        assert!(engine.session().is_none());
        assert!(!engine.countdown().is_armed());
        assert_eq!(engine.session_progress(q.len()), 1.0);
    }

    #[test]
    fn pause_freezes_and_resume_continues() {
        let q = queue(&[10]);
        let mut engine = PlaybackEngine::default();
        engine.start(&q).unwrap();
        tick_n(&mut engine, &q, 3);
        engine.pause().unwrap();
        assert!(!engine.countdown().is_armed());

        tick_n(&mut engine, &q, 4);
        assert_eq!(engine.seconds_left(), 7);

        engine.resume().unwrap();
        engine.tick(&q);
        assert_eq!(engine.seconds_left(), 6);
    }

    #[test]
    fn pause_and_resume_reject_wrong_states() {
        let q = queue(&[10]);
        let mut engine = PlaybackEngine::default();
        assert!(engine.pause().is_err());
        assert!(engine.resume().is_err());
        engine.start(&q).unwrap();
        assert!(engine.resume().is_err());
        engine.pause().unwrap();
        assert!(engine.pause().is_err());
        assert_eq!(engine.state(), PlaybackState::Paused);
    }

    #[test]
    fn prev_at_first_step_reloads_full_hold() {
        let q = queue(&[20, 10]);
        let mut engine = PlaybackEngine::default();
        engine.start(&q).unwrap();
        tick_n(&mut engine, &q, 4);
        engine.prev(&q).unwrap();
        assert_eq!(engine.current_index(), Some(0));
        assert_eq!(engine.seconds_left(), 20);
        assert!(engine.is_playing());
    }

    #[test]
    fn next_while_paused_stays_paused_with_full_hold() {
        let q = queue(&[20, 10]);
        let mut engine = PlaybackEngine::default();
        engine.start(&q).unwrap();
        engine.tick(&q);
        engine.pause().unwrap();
        engine.next(&q).unwrap();
        assert_eq!(engine.state(), PlaybackState::Paused);
        assert_eq!(engine.current_index(), Some(1));
        assert_eq!(engine.seconds_left(), 10);
        assert!(!engine.countdown().is_armed());
    }

    #[test]
    fn next_past_last_step_finishes() {
        let q = queue(&[20, 10]);
        let mut engine = PlaybackEngine::default();
        engine.start(&q).unwrap();
        engine.next(&q).unwrap();
        let events = engine.next(&q).unwrap();
        assert!(matches!(events[0], Event::SessionFinished { steps: 2, .. }));
        assert_eq!(engine.state(), PlaybackState::Finished);
        assert!(engine.next(&q).is_err());
    }

    #[test]
    fn stale_firing_is_ignored() {
        let q = queue(&[20, 10]);
        let mut engine = PlaybackEngine::default();
        engine.start(&q).unwrap();
        let first = engine.countdown().active().unwrap();
        engine.next(&q).unwrap();
        assert!(engine.countdown_fired(first, &q).is_empty());
        assert_eq!(engine.seconds_left(), 10);

        let live = engine.countdown().active().unwrap();
        assert_eq!(engine.countdown_fired(live, &q).len(), 1);
        assert_eq!(engine.seconds_left(), 9);
    }

    #[test]
    fn exit_discards_session_from_any_state() {
        let q = queue(&[20]);
        let mut engine = PlaybackEngine::default();
        engine.start(&q).unwrap();
        engine.pause().unwrap();
        engine.exit();
        assert_eq!(engine.state(), PlaybackState::Idle);
        assert!(engine.session().is_none());
        assert!(!engine.countdown().is_armed());

        engine.exit();
        assert_eq!(engine.state(), PlaybackState::Idle);
    }

    #[test]
    fn restart_replaces_the_session() {
        let q = queue(&[20, 10]);
        let mut engine = PlaybackEngine::default();
        engine.start(&q).unwrap();
        let first = engine.session().unwrap().id;
        engine.next(&q).unwrap();
        engine.start(&q).unwrap();
        assert_ne!(engine.session().unwrap().id, first);
        assert_eq!(engine.current_index(), Some(0));
        assert_eq!(engine.countdown().active_count(), 1);
    }

    #[test]
    fn timer_ring_is_fraction_remaining() {
        let q = queue(&[10]);
        let mut engine = PlaybackEngine::default();
        engine.start(&q).unwrap();
        assert_eq!(engine.timer_ring(), 1.0);
        tick_n(&mut engine, &q, 5);
        assert!((engine.timer_ring() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn step_loaded_reports_next_up() {
        let q: Queue = vec![
            PoseStep::new(1, "Tree Pose", Side::Left, HoldSeconds::clamped(5)),
            PoseStep::new(1, "Tree Pose", Side::Right, HoldSeconds::clamped(5)),
        ]
        .into_iter()
        .collect();
        let mut engine = PlaybackEngine::default();
        let events = engine.start(&q).unwrap();
        match &events[1] {
            Event::StepLoaded { next_up, .. } => {
                assert_eq!(next_up.as_deref(), Some("Tree Pose (right)"))
            }
            other => panic!("Expected StepLoaded, got {other:?}"),
        }
        let events = engine.next(&q).unwrap();
        match &events[0] {
            Event::StepLoaded { next_up, .. } => assert!(next_up.is_none()),
            other => panic!("Expected StepLoaded, got {other:?}"),
        }
    }
}
