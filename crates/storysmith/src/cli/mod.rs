//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the storysmith binary.

mod commands;
mod run;

pub use commands::{Cli, Commands};
pub use run::{print_summary, run_batch, run_single};
