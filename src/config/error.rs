//! Launch configuration error types
//!
//! Defines all validation error variants for launch arguments.

/// Validation error for launch arguments
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("global_batch_size or local_batch_size should be set.")]
    MissingBatchSize,

    #[error(
        "global_batch_size[{global}] should equal local_batch_size[{local}] times \
         dp_degree[{dp_degree}] times sharding_degree[{sharding_degree}]"
    )]
    InconsistentBatchSizes {
        global: usize,
        local: usize,
        dp_degree: usize,
        sharding_degree: usize,
    },

    #[error(
        "global_batch_size[{global}] should be divided by dp_degree[{dp_degree}] \
         times sharding_degree[{sharding_degree}]"
    )]
    GlobalNotDivisible {
        global: usize,
        dp_degree: usize,
        sharding_degree: usize,
    },

    #[error("local_batch_size[{local}] should be a multiple of micro_batch_size[{micro}]")]
    LocalNotMultipleOfMicro { local: usize, micro: usize },

    #[error("{field} must be > 0")]
    ZeroValue { field: &'static str },

    #[error("Batch size overflow computing {field}")]
    Overflow { field: &'static str },

    #[error("Invalid {field}: {value} (must be in [0.0, 1.0))")]
    InvalidProbability { field: &'static str, value: f32 },

    #[error("Invalid warmup_rate: {0} (must be in [0.0, 1.0])")]
    InvalidWarmupRate(f32),

    #[error("Invalid learning rate bounds: min_lr[{min_lr}] must be <= max_lr[{max_lr}] and max_lr > 0")]
    InvalidLearningRate { max_lr: f64, min_lr: f64 },

    #[error("min_target_length[{min}] must be <= max_target_length[{max}]")]
    InvalidTargetLength { min: usize, max: usize },

    #[error("invalid truth value '{0}'")]
    InvalidBool(String),

    #[error("Invalid profiler option '{0}' (expected key=value)")]
    InvalidProfilerOption(String),
}
