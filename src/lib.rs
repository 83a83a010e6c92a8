//! Lanzar: launch arguments and test support for distributed pretraining runs
//!
//! - [`config`]: the command-line surface of a run, batch-size
//!   reconciliation and the resolved [`config::RunConfig`]
//! - [`cli`]: the `lanzar` binary's behaviour
//! - [`testing`]: reference softmax / cross-entropy, vocabulary fixtures,
//!   YAML test configs, argv construction and scoped argv substitution

pub mod cli;
pub mod config;
pub mod error;
pub mod testing;

pub use error::{Error, Result};
