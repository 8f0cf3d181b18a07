use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod commands;
mod config;
mod glyph;
mod speech;
mod store;

#[derive(Parser)]
#[command(name = "asana-studio", version, about = "Guided yoga practice sessions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and edit the practice queue
    Queue {
        #[command(subcommand)]
        action: commands::queue::QueueAction,
    },
    /// Play the queue as a guided session
    Play(commands::play::PlayArgs),
    /// Browse the pose catalog
    Pose {
        #[command(subcommand)]
        action: commands::pose::PoseAction,
    },
    /// Generate, save and load sequences
    Sequence {
        #[command(subcommand)]
        action: commands::sequence::SequenceAction,
    },
    /// Saved practices
    Practice {
        #[command(subcommand)]
        action: commands::practice::PracticeAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ASANA_STUDIO_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Queue { action } => commands::queue::run(action).await,
        Commands::Play(args) => commands::play::run(args).await,
        Commands::Pose { action } => commands::pose::run(action).await,
        Commands::Sequence { action } => commands::sequence::run(action).await,
        Commands::Practice { action } => commands::practice::run(action).await,
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "asana-studio",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
