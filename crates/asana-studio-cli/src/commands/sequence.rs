use asana_studio_core::services::{NewSequence, SequenceGenerator};
use clap::Subcommand;

use super::{print_steps, Workspace};

#[derive(Subcommand)]
pub enum SequenceAction {
    /// List generation styles
    Styles,
    /// Generate a sequence
    Generate {
        #[arg(long, default_value = "vinyasa")]
        style: String,
        /// Target length in minutes
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(5..=180))]
        minutes: u32,
        /// Difficulty, 1-5
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=5))]
        difficulty: u8,
        /// Replace the queue with the result
        #[arg(long)]
        load: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List saved sequences
    List,
    /// Show a saved sequence
    Show {
        id: i64,
        /// Replace the queue with it
        #[arg(long)]
        load: bool,
    },
    /// Save the current queue as a sequence
    Save {
        name: String,
        #[arg(long, default_value = "custom")]
        style: String,
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=5))]
        difficulty: u8,
        #[arg(long)]
        description: Option<String>,
    },
}

pub async fn run(action: SequenceAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ws = Workspace::open(true)?;
    let api = ws.api()?;

    match action {
        SequenceAction::Styles => {
            for style in api.styles().await? {
                println!("{:<16} {}", style.id, style.name);
            }
        }
        SequenceAction::Generate {
            style,
            minutes,
            difficulty,
            load,
            json,
        } => {
            let generated = api.generate(&style, minutes, difficulty).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&generated)?);
            } else {
                println!(
                    "{} (level {}, ~{:.0} min, {} steps)",
                    generated.style_name,
                    generated.difficulty,
                    generated.duration_minutes,
                    generated.total_poses
                );
            }
            let steps = generated.into_steps();
            if load {
                ws.replace(steps)?;
            } else if !json {
                print_steps(&steps);
            }
        }
        SequenceAction::List => {
            for seq in SequenceGenerator::list(&api).await? {
                println!(
                    "{:>5}  {:<32} {:<12} {} poses",
                    seq.id,
                    seq.name,
                    seq.style.as_deref().unwrap_or("-"),
                    seq.pose_count
                );
            }
        }
        SequenceAction::Show { id, load } => {
            let saved = SequenceGenerator::get_by_id(&api, id).await?;
            println!("{} [{}]", saved.name, saved.id);
            if let Some(description) = &saved.description {
                println!("{description}");
            }
            let steps = saved.into_steps();
            if load {
                ws.replace(steps)?;
            } else {
                print_steps(&steps);
            }
        }
        SequenceAction::Save {
            name,
            style,
            difficulty,
            description,
        } => {
            if ws.queue().is_empty() {
                return Err("the queue is empty; nothing to save".into());
            }
            let draft = ws.controller.practice_draft(name.trim());
            let sequence = NewSequence {
                name: draft.name,
                description,
                style,
                difficulty,
                poses: draft.poses,
            };
            let id = api.save(&sequence).await?;
            println!("Sequence saved: {id}");
        }
    }
    Ok(())
}
