//! Launch arguments for a distributed pretraining run
//!
//! Long flags keep the snake_case spelling used by the training scripts,
//! e.g. `--global_batch_size 64 --sharding_degree 8`.

use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

use super::types::{strtobool, Device, LrDecayStyle, OutputFormat, ProfilerOptions};

/// Lanzar: launch arguments for LLaMA-style pretraining
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "lanzar")]
#[command(author = "PAIML")]
#[command(version)]
#[command(
    about = "Parse, reconcile and print the launch configuration of a distributed pretraining run"
)]
#[command(rename_all = "snake_case")]
pub struct LaunchArgs {
    /// Model name or local path of the pretrained weights
    #[arg(long, default_value = "facebookresearch/tiny-random-llama")]
    pub model_name_or_path: String,

    /// Global batch size for all training processes. If only data parallelism
    /// is used, it should be device_num * micro_batch_size
    #[arg(long)]
    pub global_batch_size: Option<usize>,

    /// Batch size per device for one step training
    #[arg(long)]
    pub local_batch_size: Option<usize>,

    /// Batch size per device for one forward/backward pass
    #[arg(long, default_value_t = 1)]
    pub micro_batch_size: usize,

    /// Output directory where training logs and checkpoints are written
    #[arg(long)]
    pub output_dir: PathBuf,

    /// Weight decay if we apply some
    #[arg(long, default_value_t = 0.0)]
    pub weight_decay: f32,

    /// Grad clip for the parameters
    #[arg(long, default_value_t = 0.0)]
    pub grad_clip: f32,

    /// Initial max learning rate for Adam
    #[arg(long, default_value_t = 1e-4)]
    pub max_lr: f64,

    /// Initial min learning rate for Adam
    #[arg(long, default_value_t = 1e-5)]
    pub min_lr: f64,

    /// Fraction of decay steps used for linear warmup
    #[arg(long, default_value_t = 0.01)]
    pub warmup_rate: f32,

    /// Exponential decay rate for the 1st moment estimates
    #[arg(long, default_value_t = 0.9)]
    pub adam_beta1: f32,

    /// Exponential decay rate for the 2nd moment estimates
    #[arg(long, default_value_t = 0.999)]
    pub adam_beta2: f32,

    /// Epsilon for the Adam optimizer
    #[arg(long, default_value_t = 1e-8)]
    pub adam_epsilon: f64,

    /// Total number of training steps to perform
    #[arg(long, default_value_t = 1000)]
    pub max_steps: usize,

    /// Save a checkpoint every N update steps
    #[arg(long, default_value_t = 100)]
    pub save_steps: usize,

    /// Steps over which the learning rate decays; past it min_lr is used
    #[arg(long, default_value_t = 800)]
    pub decay_steps: usize,

    /// Log every N update steps
    #[arg(long, default_value_t = 1)]
    pub logging_freq: usize,

    /// Evaluate every N update steps
    #[arg(long, default_value_t = 100)]
    pub eval_freq: usize,

    /// Number of batches used per evaluation
    #[arg(long, default_value_t = 10)]
    pub eval_iters: usize,

    /// Sharding degree. Shares the parameters across many cards
    #[arg(long, default_value_t = 8)]
    pub sharding_degree: usize,

    /// Data parallelism degree
    #[arg(long, default_value_t = 1)]
    pub dp_degree: usize,

    /// Model parallelism degree. Splits the linear layers across cards
    #[arg(long, default_value_t = 1)]
    pub mp_degree: usize,

    /// Pipeline parallelism degree. Splits the model layers into stages
    #[arg(long, default_value_t = 1)]
    pub pp_degree: usize,

    /// Recompute activations to save memory (a bare flag means false)
    #[arg(long, num_args = 0..=1, default_missing_value = "false", value_parser = strtobool)]
    pub use_recompute: Option<bool>,

    /// Sharding stage. 1: optimizer states, 2: also gradients, 3: also parameters
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub sharding_stage: u8,

    /// CPU offload for sharding stage 2/3 (a bare flag means false)
    #[arg(long, num_args = 0..=1, default_missing_value = "false", value_parser = strtobool)]
    pub sharding_offload: Option<bool>,

    /// Pure fp16 precision training (a bare flag means false)
    #[arg(long, num_args = 0..=1, default_missing_value = "false", value_parser = strtobool)]
    pub use_pure_fp16: Option<bool>,

    /// Loss scaling for fp16 training
    #[arg(long, default_value_t = 32768.0)]
    pub scale_loss: f32,

    /// Hidden dropout probability
    #[arg(long, default_value_t = 0.1)]
    pub hidden_dropout_prob: f32,

    /// Attention probabilities dropout probability
    #[arg(long, default_value_t = 0.1)]
    pub attention_probs_dropout_prob: f32,

    /// Compile the model to a static graph
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        value_parser = strtobool
    )]
    pub to_static: bool,

    /// Maximum number of checkpoints kept on disk
    #[arg(long, default_value_t = 3)]
    pub save_total_limit: usize,

    /// Random seed for initialization
    #[arg(long, default_value_t = 1234)]
    pub seed: u64,

    /// Check accuracy of the training process (a bare flag means false)
    #[arg(long, num_args = 0..=1, default_missing_value = "false", value_parser = strtobool)]
    pub check_accuracy: Option<bool>,

    /// Device to train on (cpu, gpu, xpu, npu)
    #[arg(long, default_value = "gpu")]
    pub device: Device,

    /// Learning rate decay style (cosine, linear, none)
    #[arg(long, default_value = "cosine")]
    pub lr_decay_style: LrDecayStyle,

    /// Profiler options in the form "key1=value1;key2=value2"
    #[arg(short = 'p', long)]
    pub profiler_options: Option<ProfilerOptions>,

    /// Max sequence length for finetuning
    #[arg(long, default_value_t = 512)]
    pub max_seq_length: usize,

    /// Max total input length after tokenization; longer inputs are truncated
    #[arg(long, default_value_t = 1024)]
    pub max_source_length: usize,

    /// Min total target length when generating
    #[arg(long, default_value_t = 0)]
    pub min_target_length: usize,

    /// Max total target length after tokenization
    #[arg(long, default_value_t = 142)]
    pub max_target_length: usize,

    /// Ignore padded label tokens in the loss computation
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        value_parser = strtobool
    )]
    pub ignore_pad_token_for_loss: bool,

    /// Dataset name
    #[arg(long, default_value = "squad")]
    pub dataset_name: String,

    /// Output format for the resolved configuration (text, json, yaml)
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl LaunchArgs {
    /// Parse from the process argv, or from the argv substituted by an
    /// active [`crate::testing::ArgvGuard`] on this thread.
    pub fn from_current_argv() -> Result<Self, clap::Error> {
        Self::try_parse_from(crate::testing::argv::current_argv())
    }
}

/// Parse launch arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<LaunchArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    LaunchArgs::try_parse_from(args)
}
