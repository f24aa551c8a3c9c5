//! Command log text reader: parses the sentinel-framed line format back into
//! a [`CommandLog`].
//!
//! Fail-closed: a record with the wrong field count, an unparsable or
//! non-finite number, an unknown pen flag, or an unknown operation tag
//! aborts the whole parse. No partial logs are returned.
//!
//! Three entry points share one parsing path ([`parse_lines`]):
//!
//! - [`parse_lines`] -- in-memory lines; blank and sentinel lines are skipped
//! - [`read_log_file`] -- a persisted log file
//! - [`extract_log`] -- arbitrary program output containing the sentinel

use std::path::Path;

use crate::carrier::command_log::{CommandLog, LogEntry, Operation, PenState, TurtleSnapshot};
use crate::carrier::log_writer::LOG_SENTINEL;
use crate::geometry::vector::Vec2;

/// Fields before the operands: `x y heading pen op`.
const FIXED_FIELD_COUNT: usize = 5;

/// Error during log parsing. `line` is 1-based within the parsed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogParseError {
    /// The record does not have the field count its operation requires.
    FieldCount {
        line: usize,
        expected: usize,
        actual: usize,
    },
    /// A numeric field is not a finite decimal number.
    InvalidNumber {
        line: usize,
        field: String,
        raw: String,
    },
    /// The pen field is neither `u` nor `d`.
    InvalidPenFlag { line: usize, raw: String },
    /// The operation tag is not one the interpreter recognizes.
    UnsupportedOperation { line: usize, tag: String },
    /// Program output contains no sentinel line.
    MissingSentinel,
    /// Reading the log file failed.
    Io { detail: String },
}

impl std::fmt::Display for LogParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldCount {
                line,
                expected,
                actual,
            } => write!(
                f,
                "line {line}: expected {expected} fields, found {actual}"
            ),
            Self::InvalidNumber { line, field, raw } => {
                write!(f, "line {line}: invalid number for {field}: {raw:?}")
            }
            Self::InvalidPenFlag { line, raw } => {
                write!(f, "line {line}: invalid pen flag {raw:?}")
            }
            Self::UnsupportedOperation { line, tag } => {
                write!(f, "line {line}: unsupported operation {tag:?}")
            }
            Self::MissingSentinel => write!(f, "no log sentinel in program output"),
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
        }
    }
}

impl std::error::Error for LogParseError {}

/// Parse a sequence of lines into a [`CommandLog`].
///
/// Blank lines and sentinel lines are skipped. Fields are separated by any
/// whitespace, so `\r\n` line endings are accepted.
///
/// # Errors
///
/// Returns [`LogParseError`] for the first malformed record.
pub fn parse_lines<I, S>(lines: I) -> Result<CommandLog, LogParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut log = CommandLog::new();
    for (i, raw) in lines.into_iter().enumerate() {
        let line = raw.as_ref().trim();
        if line.is_empty() || line == LOG_SENTINEL {
            continue;
        }
        log.push(parse_record(i + 1, line)?);
    }
    Ok(log)
}

/// Parse a single record line.
///
/// # Errors
///
/// Returns [`LogParseError`] if the record is malformed.
pub fn parse_record(line_no: usize, line: &str) -> Result<LogEntry, LogParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < FIXED_FIELD_COUNT {
        return Err(LogParseError::FieldCount {
            line: line_no,
            expected: FIXED_FIELD_COUNT,
            actual: fields.len(),
        });
    }

    let tag = fields[4];
    let arity = Operation::arity(tag).ok_or_else(|| LogParseError::UnsupportedOperation {
        line: line_no,
        tag: tag.into(),
    })?;
    let expected = FIXED_FIELD_COUNT + arity;
    if fields.len() != expected {
        return Err(LogParseError::FieldCount {
            line: line_no,
            expected,
            actual: fields.len(),
        });
    }

    let x = parse_number(line_no, "x", fields[0])?;
    let y = parse_number(line_no, "y", fields[1])?;
    let heading = parse_number(line_no, "heading", fields[2])?;
    let pen = PenState::from_flag(fields[3]).ok_or_else(|| LogParseError::InvalidPenFlag {
        line: line_no,
        raw: fields[3].into(),
    })?;

    let operands = fields[FIXED_FIELD_COUNT..]
        .iter()
        .map(|raw| parse_number(line_no, tag, raw))
        .collect::<Result<Vec<f64>, _>>()?;

    // Arity was checked above, so `from_parts` only fails on a tag/arity
    // table disagreement.
    let operation =
        Operation::from_parts(tag, &operands).ok_or_else(|| LogParseError::UnsupportedOperation {
            line: line_no,
            tag: tag.into(),
        })?;

    Ok(LogEntry::new(
        TurtleSnapshot {
            position: Vec2::new(x, y),
            heading,
            pen,
        },
        operation,
    ))
}

/// Read and parse a persisted log file.
///
/// The whole file is read before parsing; the sentinel line is optional.
///
/// # Errors
///
/// Returns [`LogParseError::Io`] if the file cannot be read, otherwise any
/// record error from [`parse_lines`].
pub fn read_log_file(path: &Path) -> Result<CommandLog, LogParseError> {
    let text = std::fs::read_to_string(path).map_err(|e| LogParseError::Io {
        detail: format!("{}: {e}", path.display()),
    })?;
    parse_lines(text.lines())
}

/// Locate the log inside arbitrary program output and parse it.
///
/// Everything up to and including the last sentinel line is ignored, so the
/// program may print freely before emitting its log.
///
/// # Errors
///
/// Returns [`LogParseError::MissingSentinel`] if no sentinel line exists,
/// otherwise any record error from [`parse_lines`]. Line numbers in errors
/// are relative to the start of `output`.
pub fn extract_log(output: &str) -> Result<CommandLog, LogParseError> {
    let lines: Vec<&str> = output.lines().collect();
    let sentinel_index = lines
        .iter()
        .rposition(|line| line.trim() == LOG_SENTINEL)
        .ok_or(LogParseError::MissingSentinel)?;

    let mut log = CommandLog::new();
    for (i, raw) in lines.iter().enumerate().skip(sentinel_index + 1) {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        log.push(parse_record(i + 1, line)?);
    }
    Ok(log)
}

fn parse_number(line: usize, field: &str, raw: &str) -> Result<f64, LogParseError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(LogParseError::InvalidNumber {
            line,
            field: field.into(),
            raw: raw.into(),
        }),
    }
}
