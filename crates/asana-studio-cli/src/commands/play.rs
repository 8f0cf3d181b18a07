//! Guided playback in the terminal.
//!
//! Real time comes from a tokio interval; each tick is delivered to the
//! controller together with the countdown handle it was armed for, so a
//! tick that races a pause or skip is dropped by the engine.

use std::io::Write;
use std::time::Duration;

use asana_studio_core::{PlaybackState, SessionController, SessionSnapshot};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{self, Instant, MissedTickBehavior};

use super::Workspace;
use crate::glyph::GlyphRenderer;

#[derive(Args)]
pub struct PlayArgs {
    /// Start with voice cues off
    #[arg(long)]
    pub no_voice: bool,
    /// Override the tick length in milliseconds
    #[arg(long)]
    pub tick_ms: Option<u64>,
    /// Hide the pose glyph
    #[arg(long)]
    pub no_glyph: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    TogglePause,
    Next,
    Prev,
    Voice,
    Quit,
}

impl Key {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "" | "p" | "space" => Some(Self::TogglePause),
            "n" | "next" => Some(Self::Next),
            "b" | "prev" => Some(Self::Prev),
            "v" | "voice" => Some(Self::Voice),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

pub async fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::open(true)?;
    if ws.queue().is_empty() {
        return Err("the queue is empty; add poses with `asana-studio queue add`".into());
    }

    let mut settings = ws.config.playback_settings();
    if let Some(ms) = args.tick_ms {
        settings.tick_period = Duration::from_millis(ms.max(1));
    }
    let mut controller = SessionController::new(
        settings,
        crate::speech::from_config(&ws.config.speech, false),
        ws.config.speech_params(),
    );
    if !args.no_glyph && ws.config.playback.glyph_size > 0 {
        controller = controller.with_renderer(Box::new(GlyphRenderer), ws.config.playback.glyph_size);
    }
    controller.load_from_external(ws.queue().steps().iter().cloned())?;
    controller.set_voice_enabled(settings.voice_enabled && !args.no_voice);

    println!(
        "{} steps, {}. Enter: pause/resume  n: next  b: back  v: voice  q: quit",
        controller.queue().len(),
        asana_studio_core::format_total(controller.total_duration_seconds())
    );
    controller.start()?;
    let mut screen = Screen::default();
    screen.draw(&controller.snapshot());

    let period = settings.tick_period;
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut armed = controller.countdown_handle();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = interval.tick(), if armed.is_some() => {
                if let Some(handle) = armed {
                    controller.countdown_fired(handle);
                }
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(input)) => match Key::parse(&input) {
                    Some(key) => handle_key(&mut controller, key),
                    None => tracing::debug!(input = %input.trim(), "unknown key"),
                },
                Ok(None) => stdin_open = false,
                Err(e) => {
                    tracing::warn!(error = %e, "stopped reading keys");
                    stdin_open = false;
                }
            },
            else => break,
        }

        let handle = controller.countdown_handle();
        if handle != armed {
            if handle.is_some() {
                interval.reset();
            }
            armed = handle;
        }

        let snapshot = controller.snapshot();
        screen.draw(&snapshot);
        if matches!(snapshot.state, PlaybackState::Finished | PlaybackState::Idle) {
            break;
        }
    }

    println!();
    Ok(())
}

fn handle_key(controller: &mut SessionController, key: Key) {
    let result = match key {
        Key::TogglePause => controller.toggle_play_pause(),
        Key::Next => controller.next(),
        Key::Prev => controller.prev(),
        Key::Voice => {
            controller.set_voice_enabled(!controller.voice_enabled());
            Ok(())
        }
        Key::Quit => {
            controller.exit();
            Ok(())
        }
    };
    if let Err(e) = result {
        tracing::debug!(error = %e, ?key, "key ignored");
    }
}

/// Redraws the status line in place and prints a header when the step changes.
#[derive(Debug, Default)]
struct Screen {
    shown_index: Option<usize>,
}

impl Screen {
    fn draw(&mut self, snap: &SessionSnapshot) {
        let mut out = std::io::stdout().lock();

        if snap.state == PlaybackState::Finished {
            let _ = writeln!(out, "\r{:<78}", "");
            let _ = writeln!(out, "Practice complete. Namaste.");
            let _ = out.flush();
            return;
        }
        if snap.state == PlaybackState::Idle {
            let _ = writeln!(out, "\nSession ended.");
            return;
        }

        if snap.current_index != self.shown_index {
            self.shown_index = snap.current_index;
            if let Some(step) = &snap.step {
                let _ = writeln!(out);
                if let Some(glyph) = &snap.glyph {
                    let _ = writeln!(out, "{glyph}");
                }
                let phase = snap.phase.map(|p| p.as_str()).unwrap_or_default();
                let _ = writeln!(out, "{}  [{}]  {}", step.english_name(), phase, snap.position);
                if let Some(sanskrit) = step.sanskrit_name() {
                    let _ = writeln!(out, "  {sanskrit}");
                }
                if !snap.side_label.is_empty() {
                    let _ = writeln!(out, "  {}", snap.side_label);
                }
            }
        }

        let status = match snap.state {
            PlaybackState::Paused => " paused",
            _ => "",
        };
        let _ = write!(
            out,
            "\r  {:>5} {} {:>3.0}%  {}{}{}   ",
            snap.time_remaining,
            bar(1.0 - snap.timer_ring, 20),
            snap.session_progress * 100.0,
            snap.next_up.as_deref().unwrap_or_default(),
            if snap.voice_enabled { "" } else { " (muted)" },
            status,
        );
        let _ = out.flush();
    }
}

fn bar(fraction: f64, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
