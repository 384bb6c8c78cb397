//! Storysmith CLI binary.
//!
//! This binary provides command-line access to Storysmith:
//! - Generate a single story for one segment and theme
//! - Generate the configured segment x theme matrix
//! - Inspect the merged configuration

use clap::Parser;
use storysmith::StorysmithConfig;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, print_summary, run_batch, run_single};

    // Load environment variables from .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flag
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut config = StorysmithConfig::load(cli.config.as_deref())?;
    if let Some(output) = cli.output {
        config = config.with_output_directory(output);
    }

    match cli.command {
        Commands::Run {
            segment,
            theme,
            seed,
        } => {
            let summary = run_single(&config, segment, theme, seed).await?;
            print_summary(&summary);
        }

        Commands::Batch { count, diversify } => {
            let summary = run_batch(&config, count, diversify).await?;
            print_summary(&summary);
        }

        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
