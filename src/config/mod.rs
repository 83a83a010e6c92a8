//! Launch argument parsing and validation
//!
//! This module provides the command-line surface of a pretraining run and
//! resolves it into a consistent [`RunConfig`].
//!
//! # Usage
//!
//! ```bash
//! lanzar --output_dir ./ckpt --global_batch_size 64 --sharding_degree 8
//! lanzar --output_dir ./ckpt --local_batch_size 4 --dp_degree 2 --micro_batch_size 2
//! lanzar --output_dir ./ckpt --local_batch_size 1 --check_accuracy true --format json
//! ```

mod args;
mod batch;
mod error;
mod resolve;
mod types;


pub use args::{parse_args, LaunchArgs};
pub use batch::{reconcile_batch_sizes, BatchSizes};
pub use error::ConfigError;
pub use resolve::{
    DataConfig, DropoutConfig, OptimizerConfig, ParallelConfig, PrecisionConfig, Resolved,
    RunConfig, ScheduleConfig, TEST_ITERS_FACTOR,
};
pub use types::{strtobool, Device, LrDecayStyle, OutputFormat, ProfilerOptions};
