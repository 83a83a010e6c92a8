//! Lanzar CLI
//!
//! Parses and reconciles the launch arguments of a pretraining run.
//!
//! # Usage
//!
//! ```bash
//! # Derive the local batch size from the global one
//! lanzar --output_dir ./ckpt --global_batch_size 64 --sharding_degree 8
//!
//! # Derive the global batch size, dump the resolved config as JSON
//! lanzar --output_dir ./ckpt --local_batch_size 4 --dp_degree 2 --format json
//! ```

use lanzar::cli::run;
use lanzar::config::LaunchArgs;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = LaunchArgs::from_current_argv().unwrap_or_else(|e| e.exit());

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
