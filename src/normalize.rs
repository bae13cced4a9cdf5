//! Percentile-based contrast normalization.
//!
//! Raw sample values are mapped to a 0-1 display range using low/high
//! percentile cutoffs, which suppresses the influence of outlier voxels on
//! the rendered contrast.

use crate::volume::Volume;

use rayon::prelude::*;

pub const DEFAULT_LOW_PERCENTILE: f32 = 1.0;
pub const DEFAULT_HIGH_PERCENTILE: f32 = 99.0;

/// Guards the display mapping against a zero-width range when low == high.
const EPSILON: f32 = 1e-6;

/// Contrast limits in raw sample units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Clim {
    pub low: f32,
    pub high: f32,
}

impl Clim {
    /// Map a raw sample into the 0-1 display range by clamped linear scaling.
    ///
    /// A degenerate range (`low == high`) yields 0, not NaN.
    #[inline]
    pub fn apply(&self, value: f32) -> f32 {
        ((value - self.low) / (self.high - self.low + EPSILON)).clamp(0.0, 1.0)
    }
}

/// Compute contrast limits at the given percentiles of the volume's samples.
///
/// Percentiles are fractions in 0-100 and each is clamped into that range
/// individually. Callers must pass them in non-decreasing order; an inverted
/// pair is not checked and produces an inverted display mapping.
pub fn compute_normalization(volume: &Volume, low_percentile: f32, high_percentile: f32) -> Clim {
    let mut samples: Vec<f32> = volume.data().iter().copied().collect();
    if samples.is_empty() {
        return Clim::default();
    }
    samples.par_sort_unstable_by(f32::total_cmp);

    Clim {
        low: percentile(&samples, low_percentile),
        high: percentile(&samples, high_percentile),
    }
}

/// Normalize a whole volume into a freshly allocated 0-1 array.
pub fn apply(volume: &Volume, clim: Clim) -> ndarray::Array3<f32> {
    let mut normalized = volume.data().clone();
    normalized.par_mapv_inplace(|v| clim.apply(v));
    normalized
}

/// Percentile by linear interpolation between closest ranks, over an
/// ascending-sorted sample set.
fn percentile(sorted: &[f32], fraction: f32) -> f32 {
    let rank = (fraction / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f32;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f32;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}
