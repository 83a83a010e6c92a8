//! Building argv from test configs and substituting it for a scope
//!
//! The process argv cannot be rewritten, so substitution is a per-thread
//! override consulted by [`current_argv`]. Every test runs on its own
//! thread, which keeps concurrent tests from seeing each other's argv.

use serde_yaml::{Mapping, Value};
use std::cell::RefCell;
use std::env;
use std::ffi::OsString;
use std::marker::PhantomData;

use super::yaml::value_kind;
use crate::error::{Error, Result};

/// Program name used when no test name is available.
pub const DEFAULT_PROGRAM: &str = "tests/mod.rs";

thread_local! {
    static ARGV_OVERRIDE: RefCell<Option<Vec<OsString>>> = const { RefCell::new(None) };
}

/// Name of the running test, taken from the test harness thread name.
pub fn current_test_name() -> String {
    std::thread::current()
        .name()
        .filter(|name| *name != "main")
        .map_or_else(|| DEFAULT_PROGRAM.to_string(), ToString::to_string)
}

/// Build `[program, --key, value, ...]` from a flat config mapping.
///
/// Null values produce a bare `--key`; nested values are rejected.
pub fn construct_argv(config: &Mapping) -> Result<Vec<String>> {
    let mut argv = Vec::with_capacity(1 + 2 * config.len());
    argv.push(current_test_name());

    for (key, value) in config {
        let key = scalar_text(key)?
            .ok_or_else(|| Error::unsupported("null config key"))?;
        argv.push(format!("--{key}"));
        if let Some(value) = scalar_text(value)? {
            argv.push(value);
        }
    }

    Ok(argv)
}

fn scalar_text(value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::String(s) => Ok(Some(s.clone())),
        other => Err(Error::unsupported(value_kind(other))),
    }
}

/// The argv seen by this thread: the active substitution, or the real one.
pub fn current_argv() -> Vec<OsString> {
    ARGV_OVERRIDE
        .with(|slot| slot.borrow().clone())
        .unwrap_or_else(|| env::args_os().collect())
}

/// Substitutes this thread's argv until dropped.
///
/// Guards nest: dropping one restores whatever was active when it was
/// created, including during unwinding.
#[must_use = "the argv substitution ends when the guard is dropped"]
pub struct ArgvGuard {
    previous: Option<Vec<OsString>>,
    // Restoration must happen on the thread that installed the override
    _not_send: PhantomData<*const ()>,
}

impl ArgvGuard {
    /// Substitute argv built from a config mapping.
    pub fn new(config: &Mapping) -> Result<Self> {
        Ok(Self::with_args(construct_argv(config)?))
    }

    /// Substitute an explicit argv.
    pub fn with_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let argv: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let previous = ARGV_OVERRIDE.with(|slot| slot.replace(Some(argv)));
        Self {
            previous,
            _not_send: PhantomData,
        }
    }
}

impl Drop for ArgvGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        ARGV_OVERRIDE.with(|slot| *slot.borrow_mut() = previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_construct_argv_order_and_rendering() {
        let config = mapping("max_steps: 2\nmax_lr: 0.0001\nuse_recompute: true\ndevice: cpu\n");
        let argv = construct_argv(&config).unwrap();
        assert_eq!(
            &argv[1..],
            &[
                "--max_steps",
                "2",
                "--max_lr",
                "0.0001",
                "--use_recompute",
                "true",
                "--device",
                "cpu"
            ]
        );
    }

    #[test]
    fn test_construct_argv_program_is_test_name() {
        let argv = construct_argv(&Mapping::new()).unwrap();
        assert_eq!(argv.len(), 1);
        assert!(argv[0].contains("test_construct_argv_program_is_test_name") || argv[0] == DEFAULT_PROGRAM);
    }

    #[test]
    fn test_construct_argv_null_is_bare_flag() {
        let argv = construct_argv(&mapping("to_static:\nseed: 1\n")).unwrap();
        assert_eq!(&argv[1..], &["--to_static", "--seed", "1"]);
    }

    #[test]
    fn test_construct_argv_rejects_nested() {
        let err = construct_argv(&mapping("layers: [1, 2]\n")).unwrap_err();
        assert_eq!(err.to_string(), "Not supported: sequence");

        let err = construct_argv(&mapping("opt: {a: 1}\n")).unwrap_err();
        assert_eq!(err.to_string(), "Not supported: mapping");
    }

    #[test]
    fn test_guard_substitutes_and_restores() {
        let real: Vec<OsString> = env::args_os().collect();
        {
            let _guard = ArgvGuard::with_args(["prog", "--seed", "7"]);
            assert_eq!(current_argv(), vec!["prog", "--seed", "7"]);
        }
        assert_eq!(current_argv(), real);
    }

    #[test]
    fn test_guards_nest() {
        let _outer = ArgvGuard::with_args(["outer"]);
        {
            let _inner = ArgvGuard::with_args(["inner", "-v"]);
            assert_eq!(current_argv(), vec!["inner", "-v"]);
        }
        assert_eq!(current_argv(), vec!["outer"]);
    }

    #[test]
    fn test_guard_restores_on_panic() {
        let real: Vec<OsString> = env::args_os().collect();
        let result = std::panic::catch_unwind(|| {
            let _guard = ArgvGuard::with_args(["prog"]);
            panic!("test body failed");
        });
        assert!(result.is_err());
        assert_eq!(current_argv(), real);
    }

    #[test]
    fn test_substitution_is_thread_local() {
        let _guard = ArgvGuard::with_args(["here"]);
        let other = std::thread::spawn(current_argv).join().unwrap();
        assert_ne!(other, vec![OsString::from("here")]);
    }
}
