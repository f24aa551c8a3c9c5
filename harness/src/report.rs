//! Grade report: the verdict plus everything needed to audit it.
//!
//! # Directory layout
//!
//! ```text
//! <dir>/
//!   verification_report.json   canonical JSON, see [`GradeReport::to_json_value`]
//!   candidate.raster.json      the submission's snapshot (raster.v1)
//!   overlay.raster.json        candidate composited over reference (raster.v1)
//! ```
//!
//! The report commits to both rasters by digest. [`verify_report_dir`]
//! re-reads the directory and fails closed if either raster file no longer
//! matches the digest the report recorded.

use std::path::Path;

use turtle_kernel::proof::canon::canonical_json_bytes;
use turtle_kernel::proof::hash::{canonical_hash, raster_digest, ContentHash, HashDomain};
use turtle_kernel::raster::diff::{Outcome, Verdict};
use turtle_kernel::raster::sample::RasterSample;

use crate::artifact::{read_raster_file, write_atomic, write_raster_file, ArtifactError};
use crate::config::GradingPolicy;

pub const REPORT_FILENAME: &str = "verification_report.json";
pub const CANDIDATE_FILENAME: &str = "candidate.raster.json";
pub const OVERLAY_FILENAME: &str = "overlay.raster.json";

/// Schema tag of the report document.
pub const REPORT_SCHEMA_VERSION: &str = "grade_report.v1";

/// Result of grading one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeReport {
    pub verdict: Verdict,
    pub entries_replayed: usize,
    /// Digest of the submission's command log text.
    pub log_digest: ContentHash,
    pub policy: GradingPolicy,
    pub reference_digest: ContentHash,
    /// The submission's snapshot.
    pub candidate: RasterSample,
    /// Diagnostic composite of the candidate over the reference.
    pub overlay: RasterSample,
}

impl GradeReport {
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.verdict.outcome
    }

    #[must_use]
    pub const fn is_match(&self) -> bool {
        self.verdict.is_match()
    }

    /// Report document as a JSON value.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "candidate_digest": raster_digest(&self.candidate).as_str(),
            "entries_replayed": self.entries_replayed,
            "log_digest": self.log_digest.as_str(),
            "mismatch_count": self.verdict.mismatch_count,
            "outcome": self.verdict.outcome.as_str(),
            "overlay_digest": raster_digest(&self.overlay).as_str(),
            "policy": self.policy.to_json_value(),
            "reference_digest": self.reference_digest.as_str(),
            "schema_version": REPORT_SCHEMA_VERSION,
        })
    }

    /// Canonical JSON bytes of the report document.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Canon`] if canonicalization fails.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        canonical_json_bytes(&self.to_json_value()).map_err(|e| ArtifactError::Canon {
            detail: e.to_string(),
        })
    }

    /// Content digest of the report document.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Canon`] if canonicalization fails.
    pub fn digest(&self) -> Result<ContentHash, ArtifactError> {
        let bytes = self.canonical_bytes()?;
        Ok(canonical_hash(HashDomain::GradeReport, &bytes))
    }
}

/// Write the report and its rasters into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns [`ArtifactError`] on serialization or I/O failure.
pub fn write_report_dir(report: &GradeReport, dir: &Path) -> Result<(), ArtifactError> {
    std::fs::create_dir_all(dir).map_err(|e| ArtifactError::Io {
        detail: format!("create_dir_all {}: {e}", dir.display()),
    })?;
    write_raster_file(&report.candidate, &dir.join(CANDIDATE_FILENAME))?;
    write_raster_file(&report.overlay, &dir.join(OVERLAY_FILENAME))?;
    write_atomic(&dir.join(REPORT_FILENAME), &report.canonical_bytes()?)
}

/// Re-read a report directory and check the rasters against the report.
///
/// Returns the parsed report document.
///
/// # Errors
///
/// Returns [`ArtifactError`] if any file is missing or malformed, or if a
/// raster digest disagrees with the one the report recorded.
pub fn verify_report_dir(dir: &Path) -> Result<serde_json::Value, ArtifactError> {
    let path = dir.join(REPORT_FILENAME);
    let bytes = std::fs::read(&path).map_err(|e| ArtifactError::Io {
        detail: format!("read {}: {e}", path.display()),
    })?;
    let doc: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| ArtifactError::Parse {
            detail: e.to_string(),
        })?;

    let schema_version = doc["schema_version"].as_str().unwrap_or("");
    if schema_version != REPORT_SCHEMA_VERSION {
        return Err(ArtifactError::SchemaMismatch {
            found: schema_version.to_string(),
        });
    }

    for field in ["log_digest", "reference_digest"] {
        stored_digest(&doc, field)?;
    }
    for (field, filename) in [
        ("candidate_digest", CANDIDATE_FILENAME),
        ("overlay_digest", OVERLAY_FILENAME),
    ] {
        let stored = stored_digest(&doc, field)?;
        let raster = read_raster_file(&dir.join(filename))?;
        let recomputed = raster_digest(&raster);
        if recomputed != stored {
            return Err(ArtifactError::DigestMismatch {
                stored: stored.to_string(),
                recomputed: recomputed.to_string(),
            });
        }
    }
    Ok(doc)
}

/// Read a `sha256:<hex>` digest field from the report document.
fn stored_digest(doc: &serde_json::Value, field: &str) -> Result<ContentHash, ArtifactError> {
    let raw = doc[field].as_str().ok_or_else(|| ArtifactError::Parse {
        detail: format!("{field} is not a string"),
    })?;
    match ContentHash::parse(raw) {
        Some(hash) if hash.algorithm() == "sha256" => Ok(hash),
        _ => Err(ArtifactError::Parse {
            detail: format!("{field} is not a sha256 digest: {raw:?}"),
        }),
    }
}
