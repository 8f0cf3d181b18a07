use asana_studio_core::services::{PoseCatalog, SearchFilters};
use asana_studio_core::PoseId;
use clap::Subcommand;

use crate::api::ApiClient;
use crate::config::Config;

#[derive(Subcommand)]
pub enum PoseAction {
    /// Search the pose catalog
    Search {
        /// Free-text query
        query: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        /// Difficulty, 1-5
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        difficulty: Option<u8>,
        /// Only poses practised on both sides
        #[arg(long)]
        bilateral: bool,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        per_page: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one pose
    Show {
        id: PoseId,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List categories with pose counts
    Categories,
    /// List tags with pose counts
    Tags,
}

pub async fn run(action: PoseAction) -> Result<(), Box<dyn std::error::Error>> {
    let api = ApiClient::from_config(&Config::load_or_default().api)?;

    match action {
        PoseAction::Search {
            query,
            category,
            tag,
            difficulty,
            bilateral,
            page,
            per_page,
            json,
        } => {
            let filters = SearchFilters {
                q: query,
                category,
                difficulty,
                tag,
                bilateral_only: bilateral.then_some(true),
                page,
                per_page,
            };
            let result = api.search(&filters).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }
            for pose in &result.items {
                println!(
                    "{:>5}  {:<36} {:<14} {}{}",
                    pose.id,
                    pose.english_name,
                    pose.category,
                    pose.difficulty.map(|d| format!("L{d}")).unwrap_or_default(),
                    if pose.is_bilateral { "  L/R" } else { "" }
                );
            }
            println!(
                "\nPage {}/{} ({} poses)",
                result.page,
                result.pages.max(1),
                result.total
            );
        }
        PoseAction::Show { id, json } => {
            let detail = api.get_by_id(id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
                return Ok(());
            }
            let pose = &detail.pose;
            println!("{} [{}]", pose.english_name, pose.id);
            if let Some(sanskrit) = &pose.sanskrit_name {
                println!("  Sanskrit:   {sanskrit}");
            }
            println!("  Category:   {}", pose.category);
            if let Some(difficulty) = pose.difficulty {
                println!("  Difficulty: {difficulty}");
            }
            println!("  Bilateral:  {}", if pose.is_bilateral { "yes" } else { "no" });
            if !pose.tags.is_empty() {
                println!("  Tags:       {}", pose.tags.join(", "));
            }
            if let Some(description) = &detail.description {
                println!("\n{description}");
            }
            if let Some(parent) = &detail.parent {
                println!("\nVariation of: {} [{}]", parent.english_name, parent.id);
            }
            if !detail.variations.is_empty() {
                println!("\nVariations:");
                for variation in &detail.variations {
                    println!("  {} [{}]", variation.english_name, variation.id);
                }
            }
        }
        PoseAction::Categories => {
            for entry in api.list_categories().await? {
                println!("{:<20} {}", entry.category, entry.count);
            }
        }
        PoseAction::Tags => {
            for entry in api.list_tags().await? {
                println!("{:<20} {}", entry.tag, entry.count);
            }
        }
    }
    Ok(())
}
