//! Best-fit rotational axis from per-face and per-edge axis cues
//!
//! Axis direction is unsigned: a cylinder's axis and its reverse describe the
//! same axis, so cues are sign-aligned to a seed before they are summed and
//! alignment is measured with the absolute dot product.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Strict alignment cone half-angle (degrees)
pub const STRICT_TOLERANCE_DEG: f64 = 8.0;

/// Relaxed alignment cone half-angle (degrees)
pub const RELAXED_TOLERANCE_DEG: f64 = 15.0;

/// Axis reported when no cues are available
pub const DEFAULT_AXIS: [f64; 3] = [0.0, 0.0, 1.0];

/// Sum magnitude below which cues are considered to have cancelled out
const CANCELLATION_EPSILON: f64 = 1e-9;

/// Result of fitting a rotational axis to a set of cues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisFit {
    /// Whether any cue was available
    pub available: bool,

    /// Best-fit unit axis (DEFAULT_AXIS when unavailable)
    pub best_axis: [f64; 3],

    /// Fraction of cues within the strict cone
    pub aligned_ratio_strict: f64,

    /// Fraction of cues within the relaxed cone
    pub aligned_ratio_relaxed: f64,

    /// Average angular deviation of the cues from the axis (degrees)
    pub mean_misalignment_degrees: f64,

    /// Number of cues the fit was computed from
    pub cue_count: usize,
}

impl AxisFit {
    /// Sentinel fit for an empty cue list; fails every downstream axis check
    pub fn unavailable() -> Self {
        Self {
            available: false,
            best_axis: DEFAULT_AXIS,
            aligned_ratio_strict: 0.0,
            aligned_ratio_relaxed: 0.0,
            mean_misalignment_degrees: 90.0,
            cue_count: 0,
        }
    }

    pub fn axis(&self) -> Vector3<f64> {
        Vector3::from(self.best_axis)
    }
}

/// Fit the best rotational axis to a sequence of unit cues
pub fn fit_axis(cues: &[Vector3<f64>]) -> AxisFit {
    let Some(seed) = cues.first().copied() else {
        return AxisFit::unavailable();
    };

    let sum = cues.iter().fold(Vector3::zeros(), |acc, cue| {
        if cue.dot(&seed) < 0.0 {
            acc - cue
        } else {
            acc + cue
        }
    });

    let best = if sum.norm() <= CANCELLATION_EPSILON {
        seed
    } else {
        sum.normalize()
    };

    let strict_cos = STRICT_TOLERANCE_DEG.to_radians().cos();
    let relaxed_cos = RELAXED_TOLERANCE_DEG.to_radians().cos();

    let mut strict = 0usize;
    let mut relaxed = 0usize;
    let mut misalignment = 0.0;

    for cue in cues {
        let cos_angle = best.dot(cue).abs().clamp(0.0, 1.0);
        if cos_angle >= strict_cos {
            strict += 1;
        }
        if cos_angle >= relaxed_cos {
            relaxed += 1;
        }
        misalignment += cos_angle.acos().to_degrees();
    }

    let n = cues.len() as f64;
    AxisFit {
        available: true,
        best_axis: [best.x, best.y, best.z],
        aligned_ratio_strict: strict as f64 / n,
        aligned_ratio_relaxed: relaxed as f64 / n,
        mean_misalignment_degrees: misalignment / n,
        cue_count: cues.len(),
    }
}
