//! # Asana Studio Core Library
//!
//! The practice session engine behind Asana Studio: an editable queue of
//! pose steps and a guided, timed playback of that queue with voice cues.
//! Hosts (the CLI, a desktop shell) drive it through [`SessionController`]
//! and render from [`SessionSnapshot`].
//!
//! ## Architecture
//!
//! - **Practice**: `PoseStep` values, the `Queue` with bilateral expansion
//!   and reordering, and the positional `Phase` classifier
//! - **Playback**: a virtual-second state machine that owns a single
//!   cancellable countdown; the host supplies real time by calling `tick()`
//! - **Announce**: voice cues derived from playback events, sent to an
//!   injected `SpeechService`
//! - **Services**: traits for the pose catalog, sequence generation,
//!   practice storage and pose rendering, implemented by the host
//!
//! The core performs no I/O of its own.

pub mod announce;
pub mod error;
pub mod events;
pub mod playback;
pub mod practice;
pub mod services;
pub mod session;

pub use announce::{AnnouncementScheduler, Cue, NullSpeech, SpeechParams, SpeechService};
pub use error::{CoreError, Result, ServiceError, SpeechError, ValidationError};
pub use events::{Event, EventBus};
pub use playback::{
    Countdown, CountdownHandle, PlaybackEngine, PlaybackSession, PlaybackSettings, PlaybackState,
};
pub use practice::{phase, HoldSeconds, Phase, PoseId, PoseStep, Queue, Side};
pub use services::{
    CatalogPose, PoseAttributes, PoseCatalog, PoseRenderer, PracticeDraft, PracticeStorage,
    SequenceGenerator,
};
pub use session::{format_clock, format_total, SessionController, SessionSnapshot};
