//! Environment-driven test gating
//!
//! Slow tests are skipped unless `RUN_SLOW_TEST` holds a truthy value:
//!
//! ```bash
//! RUN_SLOW_TEST=true cargo test
//! ```

use std::env::{self, VarError};
use std::sync::LazyLock;

use crate::config::strtobool;
use crate::error::{Error, Result};

/// Environment variable enabling slow tests.
pub const RUN_SLOW_TEST: &str = "RUN_SLOW_TEST";

/// Read a boolean environment variable, falling back to `default` when unset.
///
/// Accepts `yes, no, true, false, 0, 1` (and `y, n, t, f, on, off`),
/// case-insensitively.
pub fn get_bool_from_env(key: &str, default: bool) -> Result<bool> {
    let invalid = |value: String| Error::InvalidEnvBool {
        key: key.to_string(),
        value,
    };

    match env::var(key) {
        Err(VarError::NotPresent) => Ok(default),
        Err(VarError::NotUnicode(raw)) => Err(invalid(raw.to_string_lossy().into_owned())),
        Ok(value) => strtobool(&value).map_err(|_| invalid(value)),
    }
}

/// Whether slow tests are requested, read fresh from the environment.
pub fn is_slow_test() -> Result<bool> {
    get_bool_from_env(RUN_SLOW_TEST, false)
}

static SLOW_TESTS: LazyLock<std::result::Result<bool, String>> =
    LazyLock::new(|| is_slow_test().map_err(|e| e.to_string()));

/// Whether slow tests run in this process. Read once, on first use.
///
/// # Panics
///
/// Panics with the parse error when `RUN_SLOW_TEST` is set to something
/// that is not a truth value.
pub fn slow_tests_enabled() -> bool {
    match &*SLOW_TESTS {
        Ok(enabled) => *enabled,
        Err(message) => panic!("{message}"),
    }
}

/// Return early from a test unless slow tests are enabled.
///
/// Use `skip_unless_slow!()` in tests returning `()`, and
/// `skip_unless_slow!(Ok(()))` in tests returning a `Result`.
#[macro_export]
macro_rules! skip_unless_slow {
    () => {
        $crate::skip_unless_slow!(())
    };
    ($ret:expr) => {
        if !$crate::testing::slow_tests_enabled() {
            eprintln!(
                "skipped: test spends too much time (set {}=true to run it)",
                $crate::testing::RUN_SLOW_TEST
            );
            return $ret;
        }
    };
}
