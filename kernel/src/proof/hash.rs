//! Canonical hashing: SHA-256 with typed domain separation.
//!
//! **Exactly one place defines canonical hashing.** Digests are rendered as
//! `"sha256:<hex_digest>"` and wrapped in [`ContentHash`].

use sha2::{Digest, Sha256};

use crate::carrier::command_log::CommandLog;
use crate::carrier::log_writer::{log_to_text, LogWriteError};
pub use crate::proof::hash_domain::HashDomain;
use crate::raster::sample::RasterSample;

/// A content-addressed hash with algorithm identifier.
///
/// Format: `"algorithm:hex_digest"` (e.g., `"sha256:abcdef..."`)
///
/// Invariant: the inner string always contains exactly one `:` separator,
/// with non-empty substrings on both sides (enforced by [`ContentHash::parse`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash {
    /// Full string in `"algorithm:hex_digest"` format.
    full: String,
    /// Byte offset of the `:` separator (cached from parse).
    colon: usize,
}

impl ContentHash {
    /// Parse from `"algorithm:hex"` format.
    ///
    /// Returns `None` if the format is invalid (missing colon,
    /// empty algorithm, or empty digest).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let colon = s.find(':')?;
        if colon == 0 || colon == s.len() - 1 || s[colon + 1..].contains(':') {
            return None;
        }
        Some(Self {
            full: s.to_string(),
            colon,
        })
    }

    /// The algorithm portion (e.g., "sha256").
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.full[..self.colon]
    }

    /// The hex digest portion.
    #[must_use]
    pub fn hex_digest(&self) -> &str {
        &self.full[self.colon + 1..]
    }

    /// The full string representation (`"algorithm:hex_digest"`).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full)
    }
}

/// Compute the canonical hash of a byte slice with domain separation.
///
/// Formula: `sha256(domain_bytes || data)`, rendered `"sha256:<hex>"`.
#[must_use]
pub fn canonical_hash(domain: HashDomain, data: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(domain.as_bytes());
    hasher.update(data);
    let hex_digest = hex::encode(hasher.finalize());
    let full = format!("sha256:{hex_digest}");
    ContentHash { colon: 6, full }
}

/// Content digest of a raster.
///
/// Formula: `sha256(RasterAlpha || width:u64le || height:u64le || alpha)`.
/// Dimensions are committed so two rasters with the same bytes but a
/// different shape never share a digest.
#[must_use]
pub fn raster_digest(raster: &RasterSample) -> ContentHash {
    let (width, height) = raster.dimensions();
    let mut data = Vec::with_capacity(16 + raster.alpha().len());
    data.extend_from_slice(&(width as u64).to_le_bytes());
    data.extend_from_slice(&(height as u64).to_le_bytes());
    data.extend_from_slice(raster.alpha());
    canonical_hash(HashDomain::RasterAlpha, &data)
}

/// Content digest of a command log's text encoding.
///
/// # Errors
///
/// Returns [`LogWriteError`] if the log holds a non-finite value.
pub fn log_digest(log: &CommandLog) -> Result<ContentHash, LogWriteError> {
    let text = log_to_text(log)?;
    Ok(canonical_hash(HashDomain::CommandLogText, text.as_bytes()))
}
