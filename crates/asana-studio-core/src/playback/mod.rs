mod countdown;
mod engine;

pub use countdown::{Countdown, CountdownHandle};
pub use engine::{PlaybackEngine, PlaybackSession, PlaybackSettings, PlaybackState};
