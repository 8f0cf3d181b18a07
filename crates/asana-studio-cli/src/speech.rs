//! Speech backends for the terminal host.

use std::io::{self, Write};
use std::process::{Child, Command, Stdio};

use asana_studio_core::{NullSpeech, SpeechError, SpeechParams, SpeechService};

use crate::config::SpeechConfig;

/// Prints announcements instead of speaking them.
#[derive(Debug, Default)]
pub struct ConsoleSpeech;

impl SpeechService for ConsoleSpeech {
    fn speak(&mut self, text: &str, _params: &SpeechParams) -> Result<(), SpeechError> {
        let mut out = io::stdout().lock();
        writeln!(out, "\n  >> {text}")?;
        out.flush()?;
        Ok(())
    }

    fn cancel_current(&mut self) {}
}

/// Runs an external text-to-speech program per utterance, e.g. `espeak`
/// or `say`. At most one child is alive; cancelling kills it.
#[derive(Debug)]
pub struct CommandSpeech {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
    available: bool,
}

impl CommandSpeech {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            child: None,
            available: true,
        }
    }

    fn expand_args(&self, params: &SpeechParams) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{rate}", &params.rate.to_string())
                    .replace("{pitch}", &params.pitch.to_string())
                    .replace("{volume}", &params.volume.to_string())
            })
            .collect()
    }

    fn is_speaking(&mut self) -> bool {
        matches!(self.child.as_mut().map(Child::try_wait), Some(Ok(None)))
    }
}

impl SpeechService for CommandSpeech {
    fn is_available(&self) -> bool {
        self.available
    }

    fn speak(&mut self, text: &str, params: &SpeechParams) -> Result<(), SpeechError> {
        if !self.available {
            return Err(SpeechError::Unavailable);
        }
        self.cancel_current();

        let spawned = Command::new(&self.program)
            .args(self.expand_args(params))
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(child) => {
                self.child = Some(child);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(program = %self.program, "speech program not found, voice disabled");
                self.available = false;
                Err(SpeechError::Unavailable)
            }
            Err(e) => Err(SpeechError::Backend(format!("{}: {e}", self.program))),
        }
    }

    fn cancel_current(&mut self) {
        if !self.is_speaking() {
            self.child = None;
            return;
        }
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                tracing::debug!(error = %e, "speech child already gone");
            }
            let _ = child.wait();
        }
    }
}

/// Picks the backend configured for this host.
pub fn from_config(config: &SpeechConfig, quiet: bool) -> Box<dyn SpeechService> {
    if quiet {
        return Box::new(NullSpeech);
    }
    match config.command.as_deref().map(str::trim) {
        Some(program) if !program.is_empty() => {
            Box::new(CommandSpeech::new(program, config.args.clone()))
        }
        _ => Box::new(ConsoleSpeech),
    }
}
