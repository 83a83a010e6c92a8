//! Locating the `tests` directory from anywhere below it.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Walk up from `start` to the closest directory whose name ends with
/// `tests`, then join `append_path` onto it.
///
/// Relative `start` paths are taken from the current directory.
pub fn get_tests_dir(start: impl AsRef<Path>, append_path: Option<&str>) -> Result<PathBuf> {
    let start = start.as_ref();
    let absolute = if start.is_absolute() {
        start.to_path_buf()
    } else {
        env::current_dir()
            .map_err(|e| Error::io("resolving current directory", e))?
            .join(start)
    };

    let tests_dir = absolute
        .ancestors()
        .find(|dir| {
            dir.file_name()
                .is_some_and(|name| name.to_string_lossy().ends_with("tests"))
        })
        .ok_or_else(|| Error::TestsDirNotFound {
            start: absolute.clone(),
        })?;

    Ok(match append_path {
        Some(path) => tests_dir.join(path),
        None => tests_dir.to_path_buf(),
    })
}

/// [`get_tests_dir`] anchored at the calling source file.
///
/// ```no_run
/// let fixtures = lanzar::tests_dir!("fixtures").unwrap();
/// ```
#[macro_export]
macro_rules! tests_dir {
    () => {
        $crate::testing::get_tests_dir(
            ::std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(file!()),
            None,
        )
    };
    ($append:expr) => {
        $crate::testing::get_tests_dir(
            ::std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(file!()),
            Some($append),
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_walks_up_to_tests_dir() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("repo/tests/models/llama");
        fs::create_dir_all(&nested).unwrap();

        let found = get_tests_dir(nested.join("test_modeling.rs"), None).unwrap();
        assert_eq!(found, root.path().join("repo/tests"));
    }

    #[test]
    fn test_suffix_match() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("unit_tests/a");
        fs::create_dir_all(&nested).unwrap();

        let found = get_tests_dir(&nested, None).unwrap();
        assert_eq!(found, root.path().join("unit_tests"));
    }

    #[test]
    fn test_append_path() {
        let root = TempDir::new().unwrap();
        let found = get_tests_dir(root.path().join("tests/x"), Some("fixtures/dict.txt")).unwrap();
        assert_eq!(found, root.path().join("tests/fixtures/dict.txt"));
    }

    #[test]
    fn test_not_found() {
        let err = get_tests_dir("/definitely/not/here", None).unwrap_err();
        assert!(matches!(err, Error::TestsDirNotFound { .. }));
    }
}
