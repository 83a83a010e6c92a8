//! Error types with actionable diagnostics.
//!
//! Every failure in this crate is fatal to the caller: launch-argument
//! validation aborts the run, and test-support helpers abort the test.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for lanzar operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the launcher and the test-support helpers.
#[derive(Error, Debug)]
pub enum Error {
    /// Launch arguments failed validation.
    #[error("Invalid launch configuration: {0}")]
    Config(#[from] ConfigError),

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// YAML document could not be parsed.
    #[error("Invalid YAML in {path}:\n  {message}\n  → Check YAML syntax at the indicated line")]
    YamlParse { path: PathBuf, message: String },

    /// Output serialization failed.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Test configuration has no block for the requested test.
    #[error("<{key}> should be the top key in configuration file {path}")]
    MissingTestKey { key: String, path: PathBuf },

    /// Boolean environment variable holds an unrecognised value.
    #[error("If set, {key} must be yes, no, true, false, 0 or 1 (case insensitive), got '{value}'")]
    InvalidEnvBool { key: String, value: String },

    /// No ancestor directory named like `tests` was found.
    #[error("No `tests` directory found above {start}")]
    TestsDirNotFound { start: PathBuf },

    /// A value of an unsupported type was handed to a test helper.
    #[error("Not supported: {type_name}")]
    UnsupportedType { type_name: String },

    /// Array shapes do not line up.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Hard label outside the class axis that is not the ignore index.
    #[error("Label {label} out of range for axis of length {axis_len} (ignore_index = {ignore_index})")]
    LabelOutOfRange {
        label: i64,
        axis_len: usize,
        ignore_index: i64,
    },

    /// Axis does not exist for an array of the given rank.
    #[error("Axis {axis} is invalid for an array of rank {ndim}")]
    InvalidAxis { axis: isize, ndim: usize },
}

impl Error {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an unsupported-type error.
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
        }
    }

    /// Check if this error stems from user input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::YamlParse { .. }
                | Self::MissingTestKey { .. }
                | Self::InvalidEnvBool { .. }
        )
    }

    /// Get the error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "E001",
            Self::YamlParse { .. } => "E002",
            Self::MissingTestKey { .. } => "E003",
            Self::InvalidEnvBool { .. } => "E004",
            Self::TestsDirNotFound { .. } => "E010",
            Self::UnsupportedType { .. } => "E020",
            Self::ShapeMismatch { .. } => "E030",
            Self::LabelOutOfRange { .. } => "E031",
            Self::InvalidAxis { .. } => "E032",
            Self::Io { .. } => "E050",
            Self::Serialization { .. } => "E051",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn all_variants() -> Vec<Error> {
        vec![
            Error::Config(ConfigError::MissingBatchSize),
            Error::io("read", std::io::Error::other("boom")),
            Error::YamlParse {
                path: "".into(),
                message: "".into(),
            },
            Error::Serialization {
                message: "".into(),
            },
            Error::MissingTestKey {
                key: "".into(),
                path: "".into(),
            },
            Error::InvalidEnvBool {
                key: "".into(),
                value: "".into(),
            },
            Error::TestsDirNotFound { start: "".into() },
            Error::unsupported("tuple"),
            Error::ShapeMismatch {
                expected: vec![],
                actual: vec![],
            },
            Error::LabelOutOfRange {
                label: 0,
                axis_len: 0,
                ignore_index: -1,
            },
            Error::InvalidAxis { axis: 0, ndim: 0 },
        ]
    }

    #[test]
    fn test_error_codes_are_unique() {
        let codes: HashSet<_> = all_variants().iter().map(Error::code).collect();
        assert_eq!(codes.len(), all_variants().len());
    }

    #[test]
    fn test_env_bool_message_names_key() {
        let err = Error::InvalidEnvBool {
            key: "RUN_SLOW_TEST".to_string(),
            value: "maybe".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("RUN_SLOW_TEST"));
        assert!(msg.contains("yes, no, true, false, 0 or 1"));
        assert!(msg.contains("maybe"));
        assert!(err.is_user_error());
    }

    #[test]
    fn test_unsupported_names_type() {
        let err = Error::unsupported("yaml tagged value !Point");
        assert_eq!(err.to_string(), "Not supported: yaml tagged value !Point");
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_config_error_converts() {
        let err: Error = ConfigError::MissingBatchSize.into();
        assert_eq!(err.code(), "E001");
        assert!(err.to_string().contains("global_batch_size or local_batch_size"));
    }
}
