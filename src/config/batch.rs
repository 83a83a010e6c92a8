//! Batch-size reconciliation
//!
//! The global batch is split across `dp_degree × sharding_degree` ranks, and
//! each rank's local batch is consumed `micro_batch_size` samples at a time.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Fully resolved batch sizing for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSizes {
    /// Samples per optimizer step across all ranks
    pub global: usize,
    /// Samples per optimizer step on one rank
    pub local: usize,
    /// Samples per forward/backward pass
    pub micro: usize,
    /// Micro batches accumulated per optimizer step
    pub accumulate_steps: usize,
}

/// Derive whichever of global/local batch size is missing, or check both agree.
///
/// Invariant on success: `global == local * dp_degree * sharding_degree` and
/// `local % micro_batch_size == 0`.
pub fn reconcile_batch_sizes(
    global: Option<usize>,
    local: Option<usize>,
    dp_degree: usize,
    sharding_degree: usize,
    micro_batch_size: usize,
) -> Result<BatchSizes, ConfigError> {
    if dp_degree == 0 {
        return Err(ConfigError::ZeroValue { field: "dp_degree" });
    }
    if sharding_degree == 0 {
        return Err(ConfigError::ZeroValue {
            field: "sharding_degree",
        });
    }
    if micro_batch_size == 0 {
        return Err(ConfigError::ZeroValue {
            field: "micro_batch_size",
        });
    }

    let ranks = dp_degree
        .checked_mul(sharding_degree)
        .ok_or(ConfigError::Overflow {
            field: "dp_degree * sharding_degree",
        })?;

    let (global, local) = match (global, local) {
        (None, None) => return Err(ConfigError::MissingBatchSize),
        (Some(global), Some(local)) => {
            if local.checked_mul(ranks) != Some(global) {
                return Err(ConfigError::InconsistentBatchSizes {
                    global,
                    local,
                    dp_degree,
                    sharding_degree,
                });
            }
            (global, local)
        }
        (Some(global), None) => {
            if global % ranks != 0 {
                return Err(ConfigError::GlobalNotDivisible {
                    global,
                    dp_degree,
                    sharding_degree,
                });
            }
            (global, global / ranks)
        }
        (None, Some(local)) => {
            let global = local.checked_mul(ranks).ok_or(ConfigError::Overflow {
                field: "global_batch_size",
            })?;
            (global, local)
        }
    };

    if local == 0 {
        return Err(ConfigError::ZeroValue {
            field: "local_batch_size",
        });
    }
    if local % micro_batch_size != 0 {
        return Err(ConfigError::LocalNotMultipleOfMicro {
            local,
            micro: micro_batch_size,
        });
    }

    Ok(BatchSizes {
        global,
        local,
        micro: micro_batch_size,
        accumulate_steps: local / micro_batch_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_local_from_global() {
        let sizes = reconcile_batch_sizes(Some(32), None, 2, 4, 2).unwrap();
        assert_eq!(sizes.local, 4);
        assert_eq!(sizes.global, 32);
        assert_eq!(sizes.accumulate_steps, 2);
    }

    #[test]
    fn test_derive_global_from_local() {
        let sizes = reconcile_batch_sizes(None, Some(3), 2, 8, 1).unwrap();
        assert_eq!(sizes.global, 48);
        assert_eq!(sizes.accumulate_steps, 3);
    }

    #[test]
    fn test_both_consistent() {
        let sizes = reconcile_batch_sizes(Some(8), Some(1), 1, 8, 1).unwrap();
        assert_eq!(
            sizes,
            BatchSizes {
                global: 8,
                local: 1,
                micro: 1,
                accumulate_steps: 1
            }
        );
    }

    #[test]
    fn test_both_inconsistent() {
        let err = reconcile_batch_sizes(Some(16), Some(1), 1, 8, 1).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InconsistentBatchSizes {
                global: 16,
                local: 1,
                dp_degree: 1,
                sharding_degree: 8
            }
        );
    }

    #[test]
    fn test_both_inconsistent_with_remainder() {
        // 17 / 2 floors to 8 == 1 * 8, but 2 * 8 != 17
        let err = reconcile_batch_sizes(Some(17), Some(2), 1, 8, 1).unwrap_err();
        assert!(matches!(err, ConfigError::InconsistentBatchSizes { .. }));
    }

    #[test]
    fn test_neither_given() {
        let err = reconcile_batch_sizes(None, None, 1, 1, 1).unwrap_err();
        assert_eq!(err, ConfigError::MissingBatchSize);
    }

    #[test]
    fn test_global_not_divisible() {
        let err = reconcile_batch_sizes(Some(10), None, 1, 4, 1).unwrap_err();
        assert!(matches!(err, ConfigError::GlobalNotDivisible { global: 10, .. }));
        assert!(err.to_string().contains("global_batch_size[10]"));
    }

    #[test]
    fn test_local_not_multiple_of_micro() {
        let err = reconcile_batch_sizes(None, Some(6), 1, 1, 4).unwrap_err();
        assert_eq!(err, ConfigError::LocalNotMultipleOfMicro { local: 6, micro: 4 });
    }

    #[test]
    fn test_zero_degrees_rejected() {
        assert_eq!(
            reconcile_batch_sizes(Some(8), None, 0, 1, 1).unwrap_err(),
            ConfigError::ZeroValue { field: "dp_degree" }
        );
        assert_eq!(
            reconcile_batch_sizes(Some(8), None, 1, 0, 1).unwrap_err(),
            ConfigError::ZeroValue {
                field: "sharding_degree"
            }
        );
        assert_eq!(
            reconcile_batch_sizes(Some(8), None, 1, 1, 0).unwrap_err(),
            ConfigError::ZeroValue {
                field: "micro_batch_size"
            }
        );
    }

    #[test]
    fn test_zero_local_rejected() {
        let err = reconcile_batch_sizes(Some(0), None, 1, 1, 1).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ZeroValue {
                field: "local_batch_size"
            }
        );
    }

    #[test]
    fn test_overflow_reported() {
        let err = reconcile_batch_sizes(None, Some(usize::MAX), 2, 1, 1).unwrap_err();
        assert!(matches!(err, ConfigError::Overflow { .. }));
    }
}
