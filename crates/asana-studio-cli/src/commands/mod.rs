pub mod config;
pub mod play;
pub mod pose;
pub mod practice;
pub mod queue;
pub mod sequence;

use asana_studio_core::{PoseStep, Queue, SessionController};

use crate::api::ApiClient;
use crate::config::Config;
use crate::speech;
use crate::store::QueueFile;

/// A controller holding the stored queue, plus the file it came from.
pub(crate) struct Workspace {
    pub config: Config,
    pub controller: SessionController,
    pub file: QueueFile,
}

impl Workspace {
    pub fn open(quiet: bool) -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load_or_default();
        let file = QueueFile::open()?;
        let mut controller = SessionController::new(
            config.playback_settings(),
            speech::from_config(&config.speech, quiet),
            config.speech_params(),
        );
        controller.load_from_external(file.load()?.steps().iter().cloned())?;
        Ok(Self {
            config,
            controller,
            file,
        })
    }

    pub fn queue(&self) -> &Queue {
        self.controller.queue()
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.file.save(self.controller.queue())
    }

    /// Replace the queue with loaded steps and persist it.
    pub fn replace(&mut self, steps: Vec<PoseStep>) -> Result<(), Box<dyn std::error::Error>> {
        self.controller.load_from_external(steps)?;
        self.save()?;
        println!(
            "Queue loaded: {} steps, {}",
            self.queue().len(),
            asana_studio_core::format_total(self.queue().total_duration_seconds())
        );
        Ok(())
    }

    pub fn api(&self) -> Result<ApiClient, Box<dyn std::error::Error>> {
        ApiClient::from_config(&self.config.api)
    }
}

/// Converts a 1-based position typed by the user into an index.
pub(crate) fn to_index(position: usize) -> Result<usize, String> {
    position
        .checked_sub(1)
        .ok_or_else(|| "positions start at 1".to_string())
}

pub(crate) fn print_steps(steps: &[PoseStep]) {
    if steps.is_empty() {
        println!("(empty)");
        return;
    }
    for (i, step) in steps.iter().enumerate() {
        let phase = asana_studio_core::phase(i, steps.len())
            .map(|p| p.as_str())
            .unwrap_or_default();
        println!(
            "{:>3}. {:<40} {:>4}s  {}",
            i + 1,
            step.display_name(),
            step.hold_seconds().get(),
            phase
        );
    }
}
