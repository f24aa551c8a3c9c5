//! Raster artifacts: persist a [`RasterSample`] as canonical JSON.
//!
//! # Format (`raster.v1`)
//!
//! ```text
//! {"alpha_hex":"00ff..","digest":"sha256:..","height":H,"schema_version":"raster.v1","width":W}
//! ```
//!
//! `digest` is [`raster_digest`] of the decoded raster. Reference rasters
//! are precomputed once per exercise and stored in this format.
//!
//! # Fail-closed semantics
//!
//! Reading rejects unknown or missing fields, a wrong schema version, bad
//! hex, a buffer that does not match the dimensions, and a stored digest
//! that does not match the recomputed one.

use std::path::Path;

use serde::{Deserialize, Serialize};

use turtle_kernel::proof::canon::canonical_json_bytes;
use turtle_kernel::proof::hash::raster_digest;
use turtle_kernel::raster::sample::RasterSample;

/// Schema tag written into every raster artifact.
pub const RASTER_SCHEMA_VERSION: &str = "raster.v1";

/// Error writing or reading an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactError {
    /// Filesystem failure.
    Io { detail: String },
    /// The document is not valid JSON of the expected shape.
    Parse { detail: String },
    /// `schema_version` is not recognized.
    SchemaMismatch { found: String },
    /// `alpha_hex` is not valid hex.
    BadHex { detail: String },
    /// The decoded buffer does not fit the declared dimensions.
    InvalidRaster { detail: String },
    /// The stored digest does not match the content.
    DigestMismatch { stored: String, recomputed: String },
    /// Canonical JSON serialization failed.
    Canon { detail: String },
}

impl std::fmt::Display for ArtifactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
            Self::Parse { detail } => write!(f, "artifact parse error: {detail}"),
            Self::SchemaMismatch { found } => write!(f, "unsupported schema version: {found}"),
            Self::BadHex { detail } => write!(f, "invalid alpha_hex: {detail}"),
            Self::InvalidRaster { detail } => write!(f, "invalid raster: {detail}"),
            Self::DigestMismatch { stored, recomputed } => {
                write!(
                    f,
                    "digest mismatch: stored={stored}, recomputed={recomputed}"
                )
            }
            Self::Canon { detail } => write!(f, "canonical JSON error: {detail}"),
        }
    }
}

impl std::error::Error for ArtifactError {}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RasterArtifactV1 {
    alpha_hex: String,
    digest: String,
    height: u64,
    schema_version: String,
    width: u64,
}

/// Encode a raster as canonical JSON artifact bytes.
///
/// # Errors
///
/// Returns [`ArtifactError::Canon`] if serialization fails.
pub fn raster_to_artifact_bytes(raster: &RasterSample) -> Result<Vec<u8>, ArtifactError> {
    let doc = RasterArtifactV1 {
        alpha_hex: hex::encode(raster.alpha()),
        digest: raster_digest(raster).as_str().to_string(),
        height: raster.height() as u64,
        schema_version: RASTER_SCHEMA_VERSION.into(),
        width: raster.width() as u64,
    };
    let value = serde_json::to_value(&doc).map_err(|e| ArtifactError::Canon {
        detail: e.to_string(),
    })?;
    canonical_json_bytes(&value).map_err(|e| ArtifactError::Canon {
        detail: e.to_string(),
    })
}

/// Decode and verify artifact bytes.
///
/// # Errors
///
/// Returns [`ArtifactError`] on any validation failure.
pub fn raster_from_artifact_bytes(bytes: &[u8]) -> Result<RasterSample, ArtifactError> {
    let doc: RasterArtifactV1 = serde_json::from_slice(bytes).map_err(|e| ArtifactError::Parse {
        detail: e.to_string(),
    })?;
    if doc.schema_version != RASTER_SCHEMA_VERSION {
        return Err(ArtifactError::SchemaMismatch {
            found: doc.schema_version,
        });
    }

    let alpha = hex::decode(&doc.alpha_hex).map_err(|e| ArtifactError::BadHex {
        detail: e.to_string(),
    })?;
    let width = usize::try_from(doc.width).map_err(|e| ArtifactError::InvalidRaster {
        detail: format!("width: {e}"),
    })?;
    let height = usize::try_from(doc.height).map_err(|e| ArtifactError::InvalidRaster {
        detail: format!("height: {e}"),
    })?;
    let raster = RasterSample::new(width, height, alpha).map_err(|e| {
        ArtifactError::InvalidRaster {
            detail: e.to_string(),
        }
    })?;

    let recomputed = raster_digest(&raster);
    if recomputed.as_str() != doc.digest {
        return Err(ArtifactError::DigestMismatch {
            stored: doc.digest,
            recomputed: recomputed.as_str().to_string(),
        });
    }
    Ok(raster)
}

/// Write a raster artifact file, creating parent directories.
///
/// # Errors
///
/// Returns [`ArtifactError`] on serialization or I/O failure.
pub fn write_raster_file(raster: &RasterSample, path: &Path) -> Result<(), ArtifactError> {
    let bytes = raster_to_artifact_bytes(raster)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ArtifactError::Io {
            detail: format!("create_dir_all {}: {e}", parent.display()),
        })?;
    }
    write_atomic(path, &bytes)
}

/// Read and verify a raster artifact file.
///
/// # Errors
///
/// Returns [`ArtifactError`] on I/O or validation failure.
pub fn read_raster_file(path: &Path) -> Result<RasterSample, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|e| ArtifactError::Io {
        detail: format!("read {}: {e}", path.display()),
    })?;
    raster_from_artifact_bytes(&bytes)
}

/// Write to a sibling temp file, then rename over `path`.
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> Result<(), ArtifactError> {
    let dir = path.parent().ok_or_else(|| ArtifactError::Io {
        detail: format!("{} has no parent directory", path.display()),
    })?;
    let temp_name = format!(
        ".tmp_{}",
        path.file_name().unwrap_or_default().to_string_lossy()
    );
    let temp_path = dir.join(temp_name);

    std::fs::write(&temp_path, content).map_err(|e| ArtifactError::Io {
        detail: format!("write {}: {e}", temp_path.display()),
    })?;
    std::fs::rename(&temp_path, path).map_err(|e| ArtifactError::Io {
        detail: format!("rename {} -> {}: {e}", temp_path.display(), path.display()),
    })
}
