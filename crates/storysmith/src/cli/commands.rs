//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Storysmith - children's story generation with local models and retrieval
#[derive(Parser, Debug)]
#[command(name = "storysmith")]
#[command(about = "Generate children's stories with local models and web retrieval", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file layered over the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output directory (overrides output.directory)
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a single story
    Run {
        /// Audience segment, e.g. 3_6
        #[arg(long, default_value = "0_2")]
        segment: String,

        /// Story theme, e.g. friendship
        #[arg(long, default_value = "animals")]
        theme: String,

        /// Creative angle steering the queries and the story idea
        #[arg(long)]
        seed: Option<String>,
    },

    /// Generate stories for every configured segment and theme
    Batch {
        /// Stories per (segment, theme) pair (overrides batch.stories_per_combination)
        #[arg(long)]
        count: Option<u32>,

        /// Give each attempt a variation angle (overrides batch.diversify)
        #[arg(long)]
        diversify: bool,
    },

    /// Print the merged configuration as JSON
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["storysmith", "run"]).unwrap();
        match cli.command {
            Commands::Run {
                segment,
                theme,
                seed,
            } => {
                assert_eq!(segment, "0_2");
                assert_eq!(theme, "animals");
                assert!(seed.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "storysmith",
            "batch",
            "--count",
            "2",
            "--output",
            "/tmp/stories",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.output, Some(PathBuf::from("/tmp/stories")));
        assert!(matches!(
            cli.command,
            Commands::Batch {
                count: Some(2),
                diversify: false
            }
        ));
    }

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
