//! Inclusive value ranges and the range-tolerance scoring function.
//!
//! Every sub-score in the suitability model comes from [`parameter_score`], which awards 1.0
//! inside a crop's optimal range and decays linearly (then more steeply) outside it.
use crate::error::{EngineResult, SuitabilityError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The default tolerance, as a fraction of the optimal bound
pub const DEFAULT_TOLERANCE: f64 = 0.2;

/// An inclusive range of values (e.g. a crop's optimal pH).
///
/// Written as `[min, max]` in input files. Construction checks that both ends are finite and
/// that `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct ValueRange {
    min: f64,
    max: f64,
}

impl ValueRange {
    /// Create a new range, checking that it is valid
    pub fn new(min: f64, max: f64) -> EngineResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(SuitabilityError::InvalidInput(format!(
                "Range bounds must be finite (got {min}, {max})"
            )));
        }
        if min > max {
            return Err(SuitabilityError::InvalidInput(format!(
                "Range minimum {min} is greater than maximum {max}"
            )));
        }

        Ok(Self { min, max })
    }

    /// The lower bound
    pub fn min(&self) -> f64 {
        self.min
    }

    /// The upper bound
    pub fn max(&self) -> f64 {
        self.max
    }

    /// The midpoint of the range
    pub fn mean(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Whether `value` lies within the range (inclusive)
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Whether this range lies entirely within `other`
    pub fn is_within(&self, other: &ValueRange) -> bool {
        other.contains(self.min) && other.contains(self.max)
    }
}

impl TryFrom<(f64, f64)> for ValueRange {
    type Error = String;

    fn try_from((min, max): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(min, max).map_err(|err| err.to_string())
    }
}

impl From<ValueRange> for (f64, f64) {
    fn from(range: ValueRange) -> Self {
        (range.min, range.max)
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

/// Score a measured value against an optimal range.
///
/// Returns 1.0 inside the range. Outside it, the score falls linearly to 0.5 at the edge of the
/// tolerance band (`tolerance` times the nearest optimal bound), then decays towards zero:
/// below the band it is proportional to `value`, above it it reaches zero at twice the upper
/// tolerance bound.
///
/// The tolerance is relative to the optimal bound rather than the value, so a minimum at or near
/// zero leaves no room below the band. When the lower (or upper) tolerance bound is not positive
/// the score beyond it is zero.
///
/// # Arguments
///
/// * `value` - The measured value
/// * `optimal` - The optimal range for the parameter
/// * `tolerance` - Width of the tolerance band as a fraction of the optimal bound
///
/// # Returns
///
/// A score between 0.0 and 1.0, or an error if `value` or `tolerance` cannot be scored.
pub fn parameter_score(value: f64, optimal: &ValueRange, tolerance: f64) -> EngineResult<f64> {
    if !value.is_finite() {
        return Err(SuitabilityError::InvalidInput(format!(
            "Cannot score non-finite value {value}"
        )));
    }
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(SuitabilityError::InvalidInput(format!(
            "Tolerance must be a non-negative number (got {tolerance})"
        )));
    }

    let (min_opt, max_opt) = (optimal.min, optimal.max);
    if optimal.contains(value) {
        return Ok(1.0);
    }

    let min_tol = min_opt - min_opt * tolerance;
    let max_tol = max_opt + max_opt * tolerance;

    let score = if value < min_opt {
        if value >= min_tol {
            0.5 + 0.5 * (value - min_tol) / (min_opt - min_tol)
        } else if min_tol <= 0.0 {
            0.0
        } else {
            0.5 * value / min_tol
        }
    } else if value <= max_tol {
        0.5 + 0.5 * (max_tol - value) / (max_tol - max_opt)
    } else if max_tol <= 0.0 {
        0.0
    } else {
        0.5 * (2.0 * max_tol - value) / max_tol
    };

    Ok(score.max(0.0))
}
