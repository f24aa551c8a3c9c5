//! Alpha diff and verdict.
//!
//! A pixel is *different* when `|candidate − reference| >= sensitivity`;
//! smaller deltas are treated as antialiasing noise. The verdict is `Match`
//! when the number of different pixels is at most `tolerance`.
//!
//! Both thresholds are runtime values ([`DiffThresholds`]) so each exercise
//! can be calibrated. Dimensions are checked before any pixel is read: a
//! size mismatch yields [`DimensionMismatch`] and no count.

use crate::raster::sample::{DimensionMismatch, RasterSample};

/// Default minimum alpha delta for a pixel to count as different.
pub const DEFAULT_SENSITIVITY: u8 = 100;

/// Default maximum number of different pixels for a `Match`.
pub const DEFAULT_TOLERANCE: usize = 50;

/// Thresholds for a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiffThresholds {
    /// Minimum alpha delta counted as a difference. `0` counts every pixel.
    pub sensitivity: u8,
    /// Maximum different-pixel count still judged a match.
    pub tolerance: usize,
}

impl Default for DiffThresholds {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Binary outcome of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Match,
    Mismatch,
}

impl Outcome {
    /// Stable lowercase name, used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Mismatch => "mismatch",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict with the mismatch count that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Verdict {
    pub outcome: Outcome,
    pub mismatch_count: usize,
}

impl Verdict {
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self.outcome, Outcome::Match)
    }
}

/// Count pixels whose alpha delta is at least `sensitivity`.
///
/// # Errors
///
/// Returns [`DimensionMismatch`] if the rasters differ in size.
pub fn count_mismatches(
    candidate: &RasterSample,
    reference: &RasterSample,
    sensitivity: u8,
) -> Result<usize, DimensionMismatch> {
    candidate.ensure_same_dimensions(reference)?;
    Ok(candidate
        .alpha()
        .iter()
        .zip(reference.alpha())
        .filter(|(&a, &b)| a.abs_diff(b) >= sensitivity)
        .count())
}

/// Judge a mismatch count against a tolerance.
#[must_use]
pub const fn judge(mismatch_count: usize, tolerance: usize) -> Verdict {
    let outcome = if mismatch_count <= tolerance {
        Outcome::Match
    } else {
        Outcome::Mismatch
    };
    Verdict {
        outcome,
        mismatch_count,
    }
}

/// Count mismatches and judge them in one step.
///
/// # Errors
///
/// Returns [`DimensionMismatch`] if the rasters differ in size.
pub fn compare(
    candidate: &RasterSample,
    reference: &RasterSample,
    thresholds: &DiffThresholds,
) -> Result<Verdict, DimensionMismatch> {
    let count = count_mismatches(candidate, reference, thresholds.sensitivity)?;
    Ok(judge(count, thresholds.tolerance))
}

/// Diagnostic mask: `255` where a pixel counts as different, `0` elsewhere.
///
/// # Errors
///
/// Returns [`DimensionMismatch`] if the rasters differ in size.
pub fn mismatch_mask(
    candidate: &RasterSample,
    reference: &RasterSample,
    sensitivity: u8,
) -> Result<RasterSample, DimensionMismatch> {
    candidate.ensure_same_dimensions(reference)?;
    let (width, height) = candidate.dimensions();
    let alpha: Vec<u8> = candidate
        .alpha()
        .iter()
        .zip(reference.alpha())
        .map(|(&a, &b)| if a.abs_diff(b) >= sensitivity { 255 } else { 0 })
        .collect();
    // Same dimensions as `candidate`, so the length always matches.
    RasterSample::new(width, height, alpha).map_err(|_| DimensionMismatch {
        candidate: candidate.dimensions(),
        reference: reference.dimensions(),
    })
}
