//! Test-support helpers
//!
//! Reference numerics and fixtures shared by unit and integration tests:
//!
//! - [`numeric`]: stable softmax and cross-entropy oracles
//! - [`vocab`]: vocabulary files and the fixture dictionary
//! - [`env`]: `RUN_SLOW_TEST` gating and boolean environment variables
//! - [`paths`]: locating the `tests` directory
//! - [`yaml`]: per-test YAML configuration
//! - [`argv`]: argv construction and scoped substitution
//! - [`simplify`]: rounding nested outputs for comparisons

pub mod argv;
pub mod env;
pub mod numeric;
pub mod paths;
pub mod simplify;
pub mod vocab;
pub mod yaml;

pub use argv::{construct_argv, current_argv, current_test_name, ArgvGuard};
pub use env::{get_bool_from_env, is_slow_test, slow_tests_enabled, RUN_SLOW_TEST};
pub use numeric::{
    cross_entropy, normalize_axis, softmax, softmax_with_cross_entropy, stable_softmax,
    wrap_axis, Target, DEFAULT_IGNORE_INDEX, SOFTMAX_CLIP,
};
pub use paths::get_tests_dir;
pub use simplify::{nested_simplify, Simplify, DEFAULT_DECIMALS};
pub use vocab::{create_test_data, get_vocab_list};
pub use yaml::{load_test_config, load_test_config_for};
