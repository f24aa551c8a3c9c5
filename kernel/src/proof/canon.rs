//! Canonical JSON bytes: the single serialization-for-hashing implementation.
//!
//! Every report, policy snapshot, and raster artifact that gets hashed is
//! produced here.
//!
//! # Canonicalization rules
//!
//! 1. Object keys are sorted lexicographically (byte order).
//! 2. Compact form, no whitespace: `{"a":1,"b":2}`.
//! 3. Numbers must be integers (`i64` or `u64`). Floats are rejected so the
//!    bytes never depend on float formatting.
//! 4. Output is UTF-8.
//!
//! `serde_json::Map` is a `BTreeMap` in this workspace (the `preserve_order`
//! feature is never enabled), which gives rule 1; `to_vec` gives rule 2.

/// Error type for canonical JSON serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonError {
    /// A JSON number was not an integer.
    NonIntegerNumber { path: String, raw: String },
    /// `serde_json` failed to serialize the value.
    Serialize { detail: String },
}

impl std::fmt::Display for CanonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonIntegerNumber { path, raw } => {
                write!(f, "non-integer number at {path}: {raw}")
            }
            Self::Serialize { detail } => write!(f, "JSON serialization failed: {detail}"),
        }
    }
}

impl std::error::Error for CanonError {}

/// Produce canonical JSON bytes from a `serde_json::Value`.
///
/// # Errors
///
/// Returns [`CanonError::NonIntegerNumber`] if any number is not an integer.
pub fn canonical_json_bytes(value: &serde_json::Value) -> Result<Vec<u8>, CanonError> {
    check_integers(value, "$")?;
    serde_json::to_vec(value).map_err(|e| CanonError::Serialize {
        detail: e.to_string(),
    })
}

fn check_integers(value: &serde_json::Value, path: &str) -> Result<(), CanonError> {
    match value {
        serde_json::Value::Number(n) if !(n.is_i64() || n.is_u64()) => {
            Err(CanonError::NonIntegerNumber {
                path: path.into(),
                raw: n.to_string(),
            })
        }
        serde_json::Value::Array(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| check_integers(item, &format!("{path}[{i}]"))),
        serde_json::Value::Object(map) => map
            .iter()
            .try_for_each(|(key, item)| check_integers(item, &format!("{path}.{key}"))),
        _ => Ok(()),
    }
}
