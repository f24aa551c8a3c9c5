//! Grading configuration: overridable knobs resolved into a fixed policy.
//!
//! A [`GradingConfig`] holds optional overrides (typically loaded from an
//! exercise's JSON file). [`GradingConfig::resolve`] fills in defaults and
//! validates, producing the [`GradingPolicy`] the runner actually uses.
//!
//! The policy is recorded in every report as canonical JSON, committing the
//! verdict to the thresholds and canvas geometry that produced it.

use serde::Deserialize;

use turtle_kernel::proof::canon::{canonical_json_bytes, CanonError};
use turtle_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};
use turtle_kernel::raster::diff::{DiffThresholds, DEFAULT_SENSITIVITY, DEFAULT_TOLERANCE};

use crate::canvas::DEFAULT_PEN_WIDTH;

/// Width of the exported drawing window.
pub const DEFAULT_CANVAS_WIDTH: usize = 1150;

/// Height of the exported drawing window.
pub const DEFAULT_CANVAS_HEIGHT: usize = 700;

/// Error loading or resolving a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The JSON document is malformed or has unknown fields.
    Parse { detail: String },
    /// A value is out of range.
    InvalidValue { field: &'static str, detail: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse { detail } => write!(f, "config parse error: {detail}"),
            Self::InvalidValue { field, detail } => {
                write!(f, "invalid config value for {field}: {detail}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Per-exercise overrides. `None` uses the default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GradingConfig {
    /// Minimum alpha delta counted as different. Default 100.
    pub sensitivity: Option<u8>,
    /// Maximum different-pixel count judged a match. Default 50.
    pub tolerance: Option<usize>,
    /// Snapshot width in pixels. Default 1150.
    pub canvas_width: Option<usize>,
    /// Snapshot height in pixels. Default 700.
    pub canvas_height: Option<usize>,
    /// Stroke width in pixels. Default 3.0.
    pub pen_width: Option<f64>,
}

impl GradingConfig {
    /// Parse overrides from JSON. Unknown fields are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON or unknown fields.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        serde_json::from_slice(bytes).map_err(|e| ConfigError::Parse {
            detail: e.to_string(),
        })
    }

    /// Fill in defaults and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero canvas dimension or
    /// a pen width that is not finite and positive.
    pub fn resolve(&self) -> Result<GradingPolicy, ConfigError> {
        let canvas_width = self.canvas_width.unwrap_or(DEFAULT_CANVAS_WIDTH);
        let canvas_height = self.canvas_height.unwrap_or(DEFAULT_CANVAS_HEIGHT);
        let pen_width = self.pen_width.unwrap_or(DEFAULT_PEN_WIDTH);

        if canvas_width == 0 {
            return Err(ConfigError::InvalidValue {
                field: "canvas_width",
                detail: "must be positive".into(),
            });
        }
        if canvas_height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "canvas_height",
                detail: "must be positive".into(),
            });
        }
        if !(pen_width.is_finite() && pen_width > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "pen_width",
                detail: format!("{pen_width} is not a positive finite number"),
            });
        }

        Ok(GradingPolicy {
            thresholds: DiffThresholds {
                sensitivity: self.sensitivity.unwrap_or(DEFAULT_SENSITIVITY),
                tolerance: self.tolerance.unwrap_or(DEFAULT_TOLERANCE),
            },
            canvas_width,
            canvas_height,
            pen_width,
        })
    }
}

/// Resolved, validated grading parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradingPolicy {
    pub thresholds: DiffThresholds,
    pub canvas_width: usize,
    pub canvas_height: usize,
    pub pen_width: f64,
}

impl Default for GradingPolicy {
    fn default() -> Self {
        Self {
            thresholds: DiffThresholds::default(),
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            pen_width: DEFAULT_PEN_WIDTH,
        }
    }
}

impl GradingPolicy {
    /// Policy as a JSON value. The pen width is a decimal string so the
    /// value stays integer-only for canonicalization.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "canvas": {
                "height": self.canvas_height,
                "pen_width": self.pen_width.to_string(),
                "width": self.canvas_width,
            },
            "schema_version": "grading_policy.v1",
            "thresholds": {
                "sensitivity": self.thresholds.sensitivity,
                "tolerance": self.thresholds.tolerance,
            },
        })
    }

    /// Canonical JSON bytes of the policy.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if canonicalization fails.
    pub fn snapshot_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json_value())
    }

    /// Content digest of [`Self::snapshot_bytes`].
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if canonicalization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        let bytes = self.snapshot_bytes()?;
        Ok(canonical_hash(HashDomain::GradingPolicy, &bytes))
    }
}
