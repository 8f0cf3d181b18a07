//! Voice cues derived from playback events.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::speech::{SpeechParams, SpeechService};
use crate::events::Event;
use crate::practice::Side;

/// Spoken when five virtual seconds remain.
pub const FIVE_SECONDS_TEXT: &str = "Five seconds";
/// Spoken when three virtual seconds remain.
pub const THREE_TEXT: &str = "Three";
/// Spoken when the last step runs out.
pub const COMPLETE_TEXT: &str = "Practice complete. Namaste.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    StepEntry,
    FiveSeconds,
    Three,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub cue: Cue,
    pub text: String,
}

/// The cue an event calls for, if any. Pure.
///
/// Countdown cues match `seconds_left` exactly, so each fires at most once
/// per step.
pub fn announcement_for(event: &Event) -> Option<Announcement> {
    let (cue, text) = match event {
        Event::StepLoaded {
            english_name, side, ..
        } => {
            let text = match side {
                Side::Both => english_name.clone(),
                side => format!("{english_name}, {side} side"),
            };
            (Cue::StepEntry, text)
        }
        Event::Ticked { seconds_left: 5, .. } => (Cue::FiveSeconds, FIVE_SECONDS_TEXT.to_string()),
        Event::Ticked { seconds_left: 3, .. } => (Cue::Three, THREE_TEXT.to_string()),
        Event::SessionFinished { .. } => (Cue::Complete, COMPLETE_TEXT.to_string()),
        _ => return None,
    };
    Some(Announcement { cue, text })
}

/// Turns playback events into fire-and-forget speech requests.
pub struct AnnouncementScheduler {
    speech: Box<dyn SpeechService>,
    params: SpeechParams,
    enabled: bool,
}

impl AnnouncementScheduler {
    pub fn new(speech: Box<dyn SpeechService>, params: SpeechParams) -> Self {
        Self {
            speech,
            params,
            enabled: true,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turning voice off also silences anything mid-utterance.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled && !enabled {
            self.speech.cancel_current();
        }
        self.enabled = enabled;
    }

    pub fn params(&self) -> &SpeechParams {
        &self.params
    }

    /// Announce whatever `event` calls for. Returns an `Announced` event when
    /// a request was handed to the speech backend.
    ///
    /// Each request cancels the one in flight. Backend failures are logged
    /// and dropped.
    pub fn handle(&mut self, event: &Event) -> Option<Event> {
        if !self.enabled {
            return None;
        }
        let announcement = announcement_for(event)?;
        if !self.speech.is_available() {
            debug!(text = %announcement.text, "speech unavailable, cue skipped");
            return None;
        }

        self.speech.cancel_current();
        if let Err(e) = self.speech.speak(&announcement.text, &self.params) {
            warn!(error = %e, text = %announcement.text, "speech request failed");
            return None;
        }
        Some(Event::Announced {
            cue: announcement.cue,
            text: announcement.text,
            at: Utc::now(),
        })
    }
}

impl std::fmt::Debug for AnnouncementScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnouncementScheduler")
            .field("params", &self.params)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
