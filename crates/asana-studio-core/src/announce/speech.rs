//! Text-to-speech collaborator.

use serde::{Deserialize, Serialize};

use crate::error::SpeechError;

/// Voice parameters passed with every utterance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeechParams {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self {
            rate: 0.9,
            pitch: 1.0,
            volume: 0.8,
        }
    }
}

/// A speech backend. May be absent on the host; callers treat
/// unavailability as silence, never as failure.
pub trait SpeechService {
    fn is_available(&self) -> bool {
        true
    }

    /// Start speaking `text` without waiting for it to finish.
    fn speak(&mut self, text: &str, params: &SpeechParams) -> Result<(), SpeechError>;

    /// Stop whatever is being spoken. A no-op when nothing is.
    fn cancel_current(&mut self);
}

/// Backend for hosts without speech.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSpeech;

impl SpeechService for NullSpeech {
    fn is_available(&self) -> bool {
        false
    }

    fn speak(&mut self, _text: &str, _params: &SpeechParams) -> Result<(), SpeechError> {
        Err(SpeechError::Unavailable)
    }

    fn cancel_current(&mut self) {}
}
