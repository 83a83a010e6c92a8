//! Resolution of raw launch arguments into a run configuration
//!
//! Reconciles batch sizes, derives step counts, and validates numeric ranges.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::args::LaunchArgs;
use super::batch::{reconcile_batch_sizes, BatchSizes};
use super::error::ConfigError;
use super::types::{Device, LrDecayStyle, ProfilerOptions};

/// Evaluation runs `eval_iters` batches; the final test pass runs this many times more.
pub const TEST_ITERS_FACTOR: usize = 10;

/// Fully resolved configuration of one training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub model_name_or_path: String,
    pub output_dir: PathBuf,
    pub batch: BatchSizes,
    pub optimizer: OptimizerConfig,
    pub schedule: ScheduleConfig,
    pub parallel: ParallelConfig,
    pub precision: PrecisionConfig,
    pub dropout: DropoutConfig,
    pub data: DataConfig,
    pub to_static: bool,
    pub save_total_limit: usize,
    pub seed: u64,
    pub check_accuracy: bool,
    pub device: Device,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiler_options: Option<ProfilerOptions>,
}

/// Adam optimizer hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    pub weight_decay: f32,
    pub grad_clip: f32,
    pub adam_beta1: f32,
    pub adam_beta2: f32,
    pub adam_epsilon: f64,
}

/// Step counts and learning-rate schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub max_lr: f64,
    pub min_lr: f64,
    pub warmup_rate: f32,
    pub lr_decay_style: LrDecayStyle,
    pub max_steps: usize,
    pub save_steps: usize,
    pub decay_steps: usize,
    pub logging_freq: usize,
    pub eval_freq: usize,
    pub eval_iters: usize,
    pub test_iters: usize,
}

/// Parallelism degrees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelConfig {
    pub dp_degree: usize,
    pub sharding_degree: usize,
    pub mp_degree: usize,
    pub pp_degree: usize,
    pub sharding_stage: u8,
    pub sharding_offload: bool,
    pub use_recompute: bool,
}

/// Mixed precision settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecisionConfig {
    pub use_pure_fp16: bool,
    pub scale_loss: f32,
}

/// Dropout probabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropoutConfig {
    pub hidden_dropout_prob: f32,
    pub attention_probs_dropout_prob: f32,
}

/// Dataset and sequence-length options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    pub dataset_name: String,
    pub max_seq_length: usize,
    pub max_source_length: usize,
    pub min_target_length: usize,
    pub max_target_length: usize,
    pub ignore_pad_token_for_loss: bool,
}

/// A resolved configuration plus the adjustments made while resolving it
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub config: RunConfig,
    pub warnings: Vec<String>,
}

impl LaunchArgs {
    /// Reconcile, derive and validate into a [`RunConfig`].
    pub fn resolve(&self) -> Result<Resolved, ConfigError> {
        let batch = reconcile_batch_sizes(
            self.global_batch_size,
            self.local_batch_size,
            self.dp_degree,
            self.sharding_degree,
            self.micro_batch_size,
        )?;

        for (field, value) in [("mp_degree", self.mp_degree), ("pp_degree", self.pp_degree)] {
            if value == 0 {
                return Err(ConfigError::ZeroValue { field });
            }
        }

        // Written positively so NaN fails
        if !(self.max_lr > 0.0 && self.min_lr >= 0.0 && self.min_lr <= self.max_lr) {
            return Err(ConfigError::InvalidLearningRate {
                max_lr: self.max_lr,
                min_lr: self.min_lr,
            });
        }
        if !(0.0..=1.0).contains(&self.warmup_rate) {
            return Err(ConfigError::InvalidWarmupRate(self.warmup_rate));
        }
        check_probability("adam_beta1", self.adam_beta1)?;
        check_probability("adam_beta2", self.adam_beta2)?;
        check_probability("hidden_dropout_prob", self.hidden_dropout_prob)?;
        check_probability(
            "attention_probs_dropout_prob",
            self.attention_probs_dropout_prob,
        )?;
        if self.min_target_length > self.max_target_length {
            return Err(ConfigError::InvalidTargetLength {
                min: self.min_target_length,
                max: self.max_target_length,
            });
        }

        let check_accuracy = self.check_accuracy.unwrap_or(false);
        let mut warnings = Vec::new();
        let mut dropout = DropoutConfig {
            hidden_dropout_prob: self.hidden_dropout_prob,
            attention_probs_dropout_prob: self.attention_probs_dropout_prob,
        };
        if check_accuracy {
            if dropout.hidden_dropout_prob != 0.0 {
                dropout.hidden_dropout_prob = 0.0;
                warnings.push(
                    "The hidden_dropout_prob should set to 0 for accuracy checking.".to_string(),
                );
            }
            if dropout.attention_probs_dropout_prob != 0.0 {
                dropout.attention_probs_dropout_prob = 0.0;
                warnings.push(
                    "The attention_probs_dropout_prob should set to 0 for accuracy checking."
                        .to_string(),
                );
            }
        }

        let config = RunConfig {
            model_name_or_path: self.model_name_or_path.clone(),
            output_dir: self.output_dir.clone(),
            batch,
            optimizer: OptimizerConfig {
                weight_decay: self.weight_decay,
                grad_clip: self.grad_clip,
                adam_beta1: self.adam_beta1,
                adam_beta2: self.adam_beta2,
                adam_epsilon: self.adam_epsilon,
            },
            schedule: ScheduleConfig {
                max_lr: self.max_lr,
                min_lr: self.min_lr,
                warmup_rate: self.warmup_rate,
                lr_decay_style: self.lr_decay_style,
                max_steps: self.max_steps,
                save_steps: self.save_steps,
                decay_steps: self.decay_steps,
                logging_freq: self.logging_freq,
                eval_freq: self.eval_freq,
                eval_iters: self.eval_iters,
                test_iters: self.eval_iters.saturating_mul(TEST_ITERS_FACTOR),
            },
            parallel: ParallelConfig {
                dp_degree: self.dp_degree,
                sharding_degree: self.sharding_degree,
                mp_degree: self.mp_degree,
                pp_degree: self.pp_degree,
                sharding_stage: self.sharding_stage,
                sharding_offload: self.sharding_offload.unwrap_or(false),
                use_recompute: self.use_recompute.unwrap_or(false),
            },
            precision: PrecisionConfig {
                use_pure_fp16: self.use_pure_fp16.unwrap_or(false),
                scale_loss: self.scale_loss,
            },
            dropout,
            data: DataConfig {
                dataset_name: self.dataset_name.clone(),
                max_seq_length: self.max_seq_length,
                max_source_length: self.max_source_length,
                min_target_length: self.min_target_length,
                max_target_length: self.max_target_length,
                ignore_pad_token_for_loss: self.ignore_pad_token_for_loss,
            },
            to_static: self.to_static,
            save_total_limit: self.save_total_limit,
            seed: self.seed,
            check_accuracy,
            device: self.device,
            profiler_options: self.profiler_options.clone(),
        };

        Ok(Resolved { config, warnings })
    }
}

fn check_probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { field, value })
    }
}

impl RunConfig {
    /// Name/value pairs in flag order, for the text summary; derived
    /// values (`test_iters`, `accumulate_steps`) come last.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let opt = |o: &Option<ProfilerOptions>| {
            o.as_ref()
                .map_or_else(|| "None".to_string(), ToString::to_string)
        };
        vec![
            ("model_name_or_path", self.model_name_or_path.clone()),
            ("global_batch_size", self.batch.global.to_string()),
            ("local_batch_size", self.batch.local.to_string()),
            ("micro_batch_size", self.batch.micro.to_string()),
            ("output_dir", self.output_dir.display().to_string()),
            ("weight_decay", self.optimizer.weight_decay.to_string()),
            ("grad_clip", self.optimizer.grad_clip.to_string()),
            ("max_lr", self.schedule.max_lr.to_string()),
            ("min_lr", self.schedule.min_lr.to_string()),
            ("warmup_rate", self.schedule.warmup_rate.to_string()),
            ("adam_beta1", self.optimizer.adam_beta1.to_string()),
            ("adam_beta2", self.optimizer.adam_beta2.to_string()),
            ("adam_epsilon", self.optimizer.adam_epsilon.to_string()),
            ("max_steps", self.schedule.max_steps.to_string()),
            ("save_steps", self.schedule.save_steps.to_string()),
            ("decay_steps", self.schedule.decay_steps.to_string()),
            ("logging_freq", self.schedule.logging_freq.to_string()),
            ("eval_freq", self.schedule.eval_freq.to_string()),
            ("eval_iters", self.schedule.eval_iters.to_string()),
            ("sharding_degree", self.parallel.sharding_degree.to_string()),
            ("dp_degree", self.parallel.dp_degree.to_string()),
            ("mp_degree", self.parallel.mp_degree.to_string()),
            ("pp_degree", self.parallel.pp_degree.to_string()),
            ("use_recompute", self.parallel.use_recompute.to_string()),
            ("sharding_stage", self.parallel.sharding_stage.to_string()),
            ("sharding_offload", self.parallel.sharding_offload.to_string()),
            ("use_pure_fp16", self.precision.use_pure_fp16.to_string()),
            ("scale_loss", self.precision.scale_loss.to_string()),
            (
                "hidden_dropout_prob",
                self.dropout.hidden_dropout_prob.to_string(),
            ),
            (
                "attention_probs_dropout_prob",
                self.dropout.attention_probs_dropout_prob.to_string(),
            ),
            ("to_static", self.to_static.to_string()),
            ("save_total_limit", self.save_total_limit.to_string()),
            ("seed", self.seed.to_string()),
            ("check_accuracy", self.check_accuracy.to_string()),
            ("device", self.device.to_string()),
            ("lr_decay_style", self.schedule.lr_decay_style.to_string()),
            ("profiler_options", opt(&self.profiler_options)),
            ("max_seq_length", self.data.max_seq_length.to_string()),
            ("max_source_length", self.data.max_source_length.to_string()),
            ("min_target_length", self.data.min_target_length.to_string()),
            ("max_target_length", self.data.max_target_length.to_string()),
            (
                "ignore_pad_token_for_loss",
                self.data.ignore_pad_token_for_loss.to_string(),
            ),
            ("dataset_name", self.data.dataset_name.clone()),
            ("test_iters", self.schedule.test_iters.to_string()),
            ("accumulate_steps", self.batch.accumulate_steps.to_string()),
        ]
    }
}
