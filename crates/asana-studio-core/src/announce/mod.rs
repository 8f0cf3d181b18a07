mod scheduler;
mod speech;

pub use scheduler::{
    announcement_for, Announcement, AnnouncementScheduler, Cue, COMPLETE_TEXT,
    FIVE_SECONDS_TEXT, THREE_TEXT,
};
pub use speech::{NullSpeech, SpeechParams, SpeechService};
