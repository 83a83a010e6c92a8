//! CLI module for lanzar
//!
//! Resolves launch arguments and prints the run configuration.

mod launch;
mod logging;

pub use launch::{format_summary, render, run_launch};
pub use logging::LogLevel;

use crate::config::LaunchArgs;
use crate::error::Result;

/// Execute the launcher based on the parsed arguments
pub fn run(args: LaunchArgs) -> Result<()> {
    let level = LogLevel::from_flags(args.quiet, args.verbose);
    run_launch(&args, level).map(|_| ())
}
