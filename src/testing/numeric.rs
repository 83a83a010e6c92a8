//! Reference softmax and cross-entropy
//!
//! Straightforward, loop-based implementations used as an oracle when
//! checking the numerical output of optimized kernels.

use ndarray::{Array, Array1, ArrayD, ArrayView1, Axis, Dimension, Zip};

use crate::error::{Error, Result};

/// Lower bound for max-shifted logits, so that `ln(exp(shift))` stays finite.
pub const SOFTMAX_CLIP: f32 = -64.0;

/// Label value excluded from the hard-label loss.
pub const DEFAULT_IGNORE_INDEX: i64 = -1;

/// Softmax of a vector, shifted by its max and clipped at [`SOFTMAX_CLIP`].
pub fn stable_softmax(x: ArrayView1<'_, f32>) -> Array1<f32> {
    let max = x.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    // f32::max discards the NaN produced by inf - inf
    let exps = x.mapv(|v| (v - max).max(SOFTMAX_CLIP).exp());
    let sum = exps.sum();
    exps / sum
}

/// Softmax along the last axis.
pub fn softmax<D: Dimension>(logits: &Array<f32, D>) -> Result<Array<f32, D>> {
    let ndim = logits.ndim();
    if ndim == 0 {
        return Err(Error::InvalidAxis { axis: -1, ndim });
    }

    let mut probs = logits.clone();
    for mut lane in probs.lanes_mut(Axis(ndim - 1)) {
        let row = stable_softmax(lane.view());
        lane.assign(&row);
    }
    Ok(probs)
}

/// Labels for [`cross_entropy`]
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// Probability distributions with the same shape as the softmax output
    Soft(&'a ArrayD<f32>),
    /// Class indices; the class axis is dropped from (or size 1 in) the shape
    Hard(&'a ArrayD<i64>),
}

/// Map a possibly negative axis onto `0..ndim`.
pub fn normalize_axis(axis: isize, ndim: usize) -> Result<usize> {
    let rank = ndim as isize;
    if rank == 0 || axis < -rank || axis >= rank {
        return Err(Error::InvalidAxis { axis, ndim });
    }
    Ok(axis.rem_euclid(rank) as usize)
}

/// Map any axis onto `0..ndim` modulo the rank, so `axis = ndim` wraps to 0.
pub fn wrap_axis(axis: isize, ndim: usize) -> Result<usize> {
    if ndim == 0 {
        return Err(Error::InvalidAxis { axis, ndim });
    }
    Ok(axis.rem_euclid(ndim as isize) as usize)
}

/// Cross-entropy of softmax probabilities against soft or hard labels.
///
/// Soft labels give `Σ -label · ln(p)` over `axis`, keeping that axis with
/// length 1; `axis` must lie in `-ndim..ndim`. Hard labels give
/// `-ln(p[label])` per position, shaped like the labels, and zero wherever
/// `label == ignore_index`; their `axis` is taken modulo the rank.
pub fn cross_entropy(
    probs: &ArrayD<f32>,
    target: Target<'_>,
    axis: isize,
    ignore_index: i64,
) -> Result<ArrayD<f32>> {
    match target {
        Target::Soft(labels) => {
            soft_cross_entropy(probs, labels, normalize_axis(axis, probs.ndim())?)
        }
        Target::Hard(labels) => {
            hard_cross_entropy(probs, labels, wrap_axis(axis, probs.ndim())?, ignore_index)
        }
    }
}

/// Softmax over the last axis followed by [`cross_entropy`].
pub fn softmax_with_cross_entropy(
    logits: &ArrayD<f32>,
    target: Target<'_>,
    axis: isize,
    ignore_index: i64,
) -> Result<ArrayD<f32>> {
    let probs = softmax(logits)?;
    cross_entropy(&probs, target, axis, ignore_index)
}

fn soft_cross_entropy(probs: &ArrayD<f32>, labels: &ArrayD<f32>, axis: usize) -> Result<ArrayD<f32>> {
    if probs.shape() != labels.shape() {
        return Err(Error::ShapeMismatch {
            expected: probs.shape().to_vec(),
            actual: labels.shape().to_vec(),
        });
    }

    let terms = Zip::from(labels)
        .and(probs)
        .map_collect(|&label, &p| -label * p.ln());
    Ok(terms.sum_axis(Axis(axis)).insert_axis(Axis(axis)))
}

fn hard_cross_entropy(
    probs: &ArrayD<f32>,
    labels: &ArrayD<i64>,
    axis: usize,
    ignore_index: i64,
) -> Result<ArrayD<f32>> {
    let shape = probs.shape();
    let outer: usize = shape[..axis].iter().product();
    let axis_len = shape[axis];
    let inner: usize = shape[axis + 1..].iter().product();

    if labels.len() != outer * inner {
        return Err(Error::ShapeMismatch {
            expected: vec![outer, 1, inner],
            actual: labels.shape().to_vec(),
        });
    }

    // Logical (row-major) order, i.e. probs viewed as (outer, axis_len, inner)
    let flat_probs: Vec<f32> = probs.iter().copied().collect();
    let flat_labels: Vec<i64> = labels.iter().copied().collect();
    let mut losses = vec![0.0f32; flat_labels.len()];

    for i in 0..outer {
        for j in 0..inner {
            let pos = i * inner + j;
            let label = flat_labels[pos];
            if label == ignore_index {
                continue;
            }
            let class = usize::try_from(label)
                .ok()
                .filter(|&k| k < axis_len)
                .ok_or(Error::LabelOutOfRange {
                    label,
                    axis_len,
                    ignore_index,
                })?;
            losses[pos] -= flat_probs[(i * axis_len + class) * inner + j].ln();
        }
    }

    ArrayD::from_shape_vec(labels.raw_dim(), losses).map_err(|_| Error::ShapeMismatch {
        expected: labels.shape().to_vec(),
        actual: vec![outer * inner],
    })
}
