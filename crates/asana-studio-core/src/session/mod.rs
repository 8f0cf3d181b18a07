//! Session controller: the command surface the presentation layer drives.
//!
//! Owns the queue, the playback engine and the announcement scheduler.
//! Snapshots are computed from those on every call and never stored.

mod snapshot;

pub use snapshot::{
    format_clock, format_total, next_up_label, SessionSnapshot, DONE_LABEL, LAST_STEP_LABEL,
};

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::debug;

use crate::announce::{AnnouncementScheduler, SpeechParams, SpeechService};
use crate::error::{CoreError, Result};
use crate::events::{Event, EventBus};
use crate::playback::{CountdownHandle, PlaybackEngine, PlaybackSettings, PlaybackState};
use crate::practice::{Phase, PoseStep, Queue};
use crate::services::{CatalogPose, PoseAttributes, PoseRenderer, PracticeDraft};

pub struct SessionController {
    queue: Queue,
    engine: PlaybackEngine,
    announcer: AnnouncementScheduler,
    renderer: Option<Box<dyn PoseRenderer>>,
    glyph_size: u16,
    bus: EventBus,
}

impl SessionController {
    pub const DEFAULT_GLYPH_SIZE: u16 = 9;

    pub fn new(
        settings: PlaybackSettings,
        speech: Box<dyn SpeechService>,
        speech_params: SpeechParams,
    ) -> Self {
        let mut announcer = AnnouncementScheduler::new(speech, speech_params);
        announcer.set_enabled(settings.voice_enabled);
        Self {
            queue: Queue::new(),
            engine: PlaybackEngine::new(settings.tick_period),
            announcer,
            renderer: None,
            glyph_size: Self::DEFAULT_GLYPH_SIZE,
            bus: EventBus::default(),
        }
    }

    /// Attach a pose renderer; snapshots then carry a glyph of the current step.
    pub fn with_renderer(mut self, renderer: Box<dyn PoseRenderer>, size: u16) -> Self {
        self.renderer = Some(renderer);
        self.glyph_size = size;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn state(&self) -> PlaybackState {
        self.engine.state()
    }

    pub fn engine(&self) -> &PlaybackEngine {
        &self.engine
    }

    /// The live countdown the host should be firing, if any.
    pub fn countdown_handle(&self) -> Option<CountdownHandle> {
        self.engine.countdown().active()
    }

    pub fn voice_enabled(&self) -> bool {
        self.announcer.is_enabled()
    }

    pub fn total_duration_seconds(&self) -> u64 {
        self.queue.total_duration_seconds()
    }

    pub fn practice_draft(&self, name: impl Into<String>) -> PracticeDraft {
        self.queue.practice_draft(name)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.engine.state();
        let len = self.queue.len();
        let session = self.engine.session();
        let index = session.map(|s| s.current_index);
        let step = index.and_then(|i| self.queue.get(i)).cloned();

        let (seconds_left, total) = session
            .map(|s| (s.seconds_left, s.total_seconds_for_step))
            .unwrap_or((0, 0));
        let position = match (state, index) {
            (PlaybackState::Finished, _) => DONE_LABEL.to_string(),
            (_, Some(i)) => format!("{} / {}", i + 1, len),
            (_, None) => format!("0 / {len}"),
        };
        let glyph = match (&self.renderer, &step) {
            (Some(renderer), Some(step)) => {
                Some(renderer.render(&PoseAttributes::from(step), self.glyph_size))
            }
            _ => None,
        };

        SessionSnapshot {
            state,
            current_index: index,
            side_label: step.as_ref().map(PoseStep::side_label).unwrap_or_default(),
            phase: index.and_then(|i| Phase::classify(i, len)),
            seconds_left,
            total_seconds_for_step: total,
            time_remaining: format_clock(u64::from(seconds_left)),
            next_up: index.map(|i| next_up_label(self.queue.steps(), i)),
            timer_ring: self.engine.timer_ring(),
            session_progress: self.engine.session_progress(len),
            position,
            queue_len: len,
            total_duration_seconds: self.queue.total_duration_seconds(),
            voice_enabled: self.announcer.is_enabled(),
            glyph,
            step,
            at: Utc::now(),
        }
    }

    // ── Queue commands ───────────────────────────────────────────────

    pub fn add_pose(&mut self, pose: &CatalogPose) -> Result<()> {
        self.ensure_editable()?;
        self.queue.add_pose(pose);
        self.queue_changed();
        Ok(())
    }

    pub fn remove_step(&mut self, index: usize) -> Result<PoseStep> {
        self.ensure_editable()?;
        let removed = self.queue.remove_step(index)?;
        self.queue_changed();
        Ok(removed)
    }

    /// `Ok(false)` when the edit was not a positive integer.
    pub fn update_hold(&mut self, index: usize, raw: &str) -> Result<bool> {
        self.ensure_editable()?;
        let applied = self.queue.update_hold(index, raw)?;
        if applied {
            self.queue_changed();
        }
        Ok(applied)
    }

    /// `Ok(false)` when nothing moved.
    pub fn reorder(&mut self, from: Option<usize>, to: Option<usize>) -> Result<bool> {
        self.ensure_editable()?;
        let moved = self.queue.reorder(from, to)?;
        if moved {
            self.queue_changed();
        }
        Ok(moved)
    }

    pub fn load_from_external<I>(&mut self, steps: I) -> Result<()>
    where
        I: IntoIterator<Item = PoseStep>,
    {
        self.ensure_editable()?;
        self.queue.load_from_external(steps);
        self.queue_changed();
        Ok(())
    }

    pub fn clear_queue(&mut self) -> Result<()> {
        self.ensure_editable()?;
        self.queue.clear();
        self.queue_changed();
        Ok(())
    }

    // ── Playback commands ────────────────────────────────────────────

    pub fn start(&mut self) -> Result<()> {
        let events = self.engine.start(&self.queue)?;
        self.dispatch(events);
        Ok(())
    }

    /// Advance one virtual second.
    pub fn tick(&mut self) {
        let events = self.engine.tick(&self.queue);
        self.dispatch(events);
    }

    /// Host timer callback for `handle`; stale handles are ignored.
    pub fn countdown_fired(&mut self, handle: CountdownHandle) {
        let events = self.engine.countdown_fired(handle, &self.queue);
        self.dispatch(events);
    }

    pub fn pause(&mut self) -> Result<()> {
        let events = self.engine.pause()?;
        self.dispatch(events);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        let events = self.engine.resume()?;
        self.dispatch(events);
        Ok(())
    }

    /// Play/pause button.
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        match self.engine.state() {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => self.resume(),
            state => Err(CoreError::invalid(format!("nothing to toggle while {state:?}"))),
        }
    }

    pub fn next(&mut self) -> Result<()> {
        let events = self.engine.next(&self.queue)?;
        self.dispatch(events);
        Ok(())
    }

    pub fn prev(&mut self) -> Result<()> {
        let events = self.engine.prev(&self.queue)?;
        self.dispatch(events);
        Ok(())
    }

    pub fn exit(&mut self) {
        let events = self.engine.exit();
        self.dispatch(events);
    }

    pub fn set_voice_enabled(&mut self, enabled: bool) {
        if self.announcer.is_enabled() == enabled {
            return;
        }
        self.announcer.set_enabled(enabled);
        self.bus.publish(Event::VoiceToggled {
            enabled,
            at: Utc::now(),
        });
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// The engine indexes into the queue while a session is live.
    fn ensure_editable(&self) -> Result<()> {
        if self.engine.state().is_active() {
            return Err(CoreError::invalid(
                "the queue is read-only while a practice is running",
            ));
        }
        Ok(())
    }

    fn queue_changed(&mut self) {
        debug!(len = self.queue.len(), "queue changed");
        self.bus.publish(Event::QueueChanged {
            len: self.queue.len(),
            total_seconds: self.queue.total_duration_seconds(),
            at: Utc::now(),
        });
    }

    fn dispatch(&mut self, events: Vec<Event>) {
        for event in events {
            let announced = self.announcer.handle(&event);
            self.bus.publish(event);
            if let Some(announced) = announced {
                self.bus.publish(announced);
            }
        }
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("queue", &self.queue)
            .field("engine", &self.engine)
            .field("announcer", &self.announcer)
            .finish_non_exhaustive()
    }
}
