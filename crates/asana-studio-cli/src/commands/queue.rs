use std::path::PathBuf;

use asana_studio_core::services::PoseCatalog;
use asana_studio_core::{format_total, CatalogPose, PoseId};
use clap::Subcommand;

use super::{print_steps, to_index, Workspace};

#[derive(Subcommand)]
pub enum QueueAction {
    /// Add a catalog pose; bilateral poses add a left and a right step
    Add {
        /// Pose ID in the catalog
        pose_id: PoseId,
    },
    /// Add a pose from a catalog JSON record ("-" reads stdin)
    AddJson {
        file: PathBuf,
    },
    /// Remove the step at a position
    Remove {
        /// 1-based position
        position: usize,
    },
    /// Change the hold time of a step
    Hold {
        /// 1-based position
        position: usize,
        /// Seconds, clamped to 5..=600
        seconds: String,
    },
    /// Move a step to another position
    Move {
        from: usize,
        to: usize,
    },
    /// Show the queue
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove every step
    Clear,
    /// Print the queue as a plain-text practice sheet
    Export {
        #[arg(long, default_value = "My Practice")]
        title: String,
    },
    /// Replace the queue with steps from a JSON file ("-" reads stdin)
    Import {
        file: PathBuf,
    },
}

pub async fn run(action: QueueAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ws = Workspace::open(true)?;

    match action {
        QueueAction::Add { pose_id } => {
            let detail = ws.api()?.get_by_id(pose_id).await?;
            add(&mut ws, &detail.pose)?;
        }
        QueueAction::AddJson { file } => {
            let content = if file.as_os_str() == "-" {
                std::io::read_to_string(std::io::stdin())?
            } else {
                std::fs::read_to_string(&file)?
            };
            let pose: CatalogPose = serde_json::from_str(&content)?;
            add(&mut ws, &pose)?;
        }
        QueueAction::Remove { position } => {
            let removed = ws.controller.remove_step(to_index(position)?)?;
            ws.save()?;
            println!("Removed: {}", removed.display_name());
        }
        QueueAction::Hold { position, seconds } => {
            let index = to_index(position)?;
            if !ws.controller.update_hold(index, &seconds)? {
                return Err(format!("invalid hold time: '{seconds}' (expected a positive number of seconds)").into());
            }
            ws.save()?;
            if let Some(step) = ws.queue().get(index) {
                println!("{}: {}s", step.display_name(), step.hold_seconds().get());
            }
        }
        QueueAction::Move { from, to } => {
            ws.controller
                .reorder(Some(to_index(from)?), Some(to_index(to)?))?;
            ws.save()?;
            print_steps(ws.queue().steps());
        }
        QueueAction::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(ws.queue())?);
            } else {
                print_steps(ws.queue().steps());
                println!(
                    "\nTotal: {} ({} steps)",
                    format_total(ws.queue().total_duration_seconds()),
                    ws.queue().len()
                );
            }
        }
        QueueAction::Clear => {
            ws.controller.clear_queue()?;
            ws.save()?;
            println!("Queue cleared");
        }
        QueueAction::Export { title } => {
            println!("{}", ws.queue().export_text(&title));
        }
        QueueAction::Import { file } => {
            let steps = crate::store::read_steps(&file)?;
            ws.replace(steps)?;
        }
    }
    Ok(())
}

fn add(ws: &mut Workspace, pose: &CatalogPose) -> Result<(), Box<dyn std::error::Error>> {
    let before = ws.queue().len();
    ws.controller.add_pose(pose)?;
    ws.save()?;
    for step in &ws.queue().steps()[before..] {
        println!("Added: {} ({}s)", step.display_name(), step.hold_seconds().get());
    }
    Ok(())
}
