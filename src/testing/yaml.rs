//! Per-test YAML configuration
//!
//! The file is keyed by test name; each entry holds a `default` block and
//! optionally a `slow` block used when slow tests are enabled:
//!
//! ```yaml
//! llama_pretrain:
//!   default:
//!     local_batch_size: 1
//!     max_steps: 2
//!   slow:
//!     local_batch_size: 4
//!     max_steps: 1000
//! ```

use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

use super::env::is_slow_test;
use crate::error::{Error, Result};

/// Sub-block used when slow tests are disabled.
pub const DEFAULT_BLOCK: &str = "default";
/// Sub-block used when slow tests are enabled.
pub const SLOW_BLOCK: &str = "slow";

/// Load the block for `key`, choosing `slow` or `default` from `RUN_SLOW_TEST`.
///
/// Returns `Ok(None)` when the chosen sub-block is absent or empty.
pub fn load_test_config(path: impl AsRef<Path>, key: &str) -> Result<Option<Mapping>> {
    load_test_config_for(path, key, is_slow_test()?)
}

/// Like [`load_test_config`] with the slow/default choice made by the caller.
pub fn load_test_config_for(
    path: impl AsRef<Path>,
    key: &str,
    slow: bool,
) -> Result<Option<Mapping>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| Error::io(format!("reading test config {}", path.display()), e))?;
    let document: Value = serde_yaml::from_str(&content).map_err(|e| Error::YamlParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let block = document.get(key).ok_or_else(|| Error::MissingTestKey {
        key: key.to_string(),
        path: path.to_path_buf(),
    })?;

    let sub_key = if slow { SLOW_BLOCK } else { DEFAULT_BLOCK };
    match block.get(sub_key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Mapping(config)) => Ok(Some(config.clone())),
        Some(other) => Err(Error::unsupported(format!(
            "`{key}.{sub_key}` must be a mapping, found {}",
            value_kind(other)
        ))),
    }
}

/// Human-readable name of a YAML value's kind
pub(crate) fn value_kind(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Sequence(_) => "sequence".to_string(),
        Value::Mapping(_) => "mapping".to_string(),
        Value::Tagged(tagged) => format!("tagged value {}", tagged.tag),
    }
}
