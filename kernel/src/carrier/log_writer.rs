//! Command log text writer: serializes a [`CommandLog`] to the sentinel-framed
//! line format.
//!
//! # Layout
//!
//! ```text
//!                                   -- empty line, detaches the sentinel
//! #KSI_META_OUTPUT_0a859a#          -- sentinel, one line
//! x y heading pen op operand...     -- one record per entry
//! ```
//!
//! Numbers use Rust's shortest round-trip decimal form (`{}` on `f64`), which
//! never uses exponent notation and parses back bit-exactly. Non-finite
//! values are rejected instead of written.

use std::fmt::Write as _;
use std::path::Path;

use crate::carrier::command_log::{CommandLog, LogEntry};

/// Reserved line marking the start of the log payload inside program output.
pub const LOG_SENTINEL: &str = "#KSI_META_OUTPUT_0a859a#";

/// Error during log serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogWriteError {
    /// A snapshot field or operand is NaN or infinite.
    NonFiniteValue { entry_index: usize, field: String },
    /// Writing the log file failed.
    Io { detail: String },
}

impl std::fmt::Display for LogWriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteValue { entry_index, field } => {
                write!(f, "entry {entry_index}: non-finite {field}")
            }
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
        }
    }
}

impl std::error::Error for LogWriteError {}

/// Serialize one entry to its record line (no trailing newline).
///
/// # Errors
///
/// Returns [`LogWriteError::NonFiniteValue`] if any number is not finite.
pub fn entry_to_line(entry_index: usize, entry: &LogEntry) -> Result<String, LogWriteError> {
    let snapshot = &entry.snapshot;
    let mut line = String::new();

    let fields = [
        ("x", snapshot.position.x),
        ("y", snapshot.position.y),
        ("heading", snapshot.heading),
    ];
    for (name, value) in fields {
        check_finite(entry_index, name, value)?;
        let _ = write!(line, "{value} ");
    }
    line.push_str(snapshot.pen.flag());
    line.push(' ');
    line.push_str(entry.operation.tag());

    for value in entry.operation.operands() {
        check_finite(entry_index, entry.operation.tag(), value)?;
        let _ = write!(line, " {value}");
    }
    Ok(line)
}

/// Serialize a log to text: a leading newline, the sentinel line, then one
/// line per entry.
///
/// The leading newline keeps the sentinel on its own line when the program
/// printed text without a trailing newline. Every line, including the last,
/// ends with `\n`.
///
/// # Errors
///
/// Returns [`LogWriteError::NonFiniteValue`] if any entry carries a
/// non-finite number.
pub fn log_to_text(log: &CommandLog) -> Result<String, LogWriteError> {
    let mut out = String::with_capacity(LOG_SENTINEL.len() + 2 + log.len() * 48);
    out.push('\n');
    out.push_str(LOG_SENTINEL);
    out.push('\n');
    for (i, entry) in log.iter().enumerate() {
        out.push_str(&entry_to_line(i, entry)?);
        out.push('\n');
    }
    Ok(out)
}

/// Serialize a log and write it to `path` in one step.
///
/// # Errors
///
/// Returns [`LogWriteError`] on non-finite values or I/O failure.
pub fn write_log_file(log: &CommandLog, path: &Path) -> Result<(), LogWriteError> {
    let text = log_to_text(log)?;
    std::fs::write(path, text).map_err(|e| LogWriteError::Io {
        detail: format!("{}: {e}", path.display()),
    })
}

fn check_finite(entry_index: usize, field: &str, value: f64) -> Result<(), LogWriteError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LogWriteError::NonFiniteValue {
            entry_index,
            field: field.into(),
        })
    }
}
