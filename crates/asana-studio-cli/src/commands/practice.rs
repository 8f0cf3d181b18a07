use asana_studio_core::services::PracticeStorage;
use asana_studio_core::format_total;
use clap::Subcommand;

use super::{print_steps, Workspace};

#[derive(Subcommand)]
pub enum PracticeAction {
    /// Save the current queue as a named practice
    Save { name: String },
    /// List saved practices
    List,
    /// Show a saved practice
    Show { id: i64 },
    /// Replace the queue with a saved practice
    Load { id: i64 },
    /// Overwrite a saved practice with the current queue
    Update {
        id: i64,
        /// New name; keeps the stored one when omitted
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a saved practice
    Delete { id: i64 },
}

fn require_name(name: &str) -> Result<&str, Box<dyn std::error::Error>> {
    let name = name.trim();
    if name.is_empty() {
        return Err("practice name must not be empty".into());
    }
    Ok(name)
}

pub async fn run(action: PracticeAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ws = Workspace::open(true)?;
    let api = ws.api()?;

    match action {
        PracticeAction::Save { name } => {
            let name = require_name(&name)?;
            if ws.queue().is_empty() {
                return Err("the queue is empty; nothing to save".into());
            }
            let id = api.create(&ws.controller.practice_draft(name)).await?;
            println!("Practice saved: {id}");
        }
        PracticeAction::List => {
            let practices = PracticeStorage::list(&api).await?;
            if practices.is_empty() {
                println!("No saved practices");
            }
            for p in practices {
                println!(
                    "{:>5}  {:<32} {:>3} poses  {}",
                    p.id,
                    p.name,
                    p.pose_count,
                    p.total_seconds.map(format_total).unwrap_or_default()
                );
            }
        }
        PracticeAction::Show { id } => {
            let practice = PracticeStorage::get_by_id(&api, id).await?;
            println!("{} [{}]", practice.name, practice.id);
            print_steps(&practice.into_steps());
        }
        PracticeAction::Load { id } => {
            let practice = PracticeStorage::get_by_id(&api, id).await?;
            ws.replace(practice.into_steps())?;
        }
        PracticeAction::Update { id, name } => {
            let name = match name {
                Some(name) => require_name(&name)?.to_string(),
                None => PracticeStorage::get_by_id(&api, id).await?.name,
            };
            api.update(id, &ws.controller.practice_draft(name)).await?;
            println!("Practice updated: {id}");
        }
        PracticeAction::Delete { id } => {
            PracticeStorage::delete(&api, id).await?;
            println!("Practice deleted: {id}");
        }
    }
    Ok(())
}
