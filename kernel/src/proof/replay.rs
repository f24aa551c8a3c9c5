//! `replay()`: drive a [`Renderer`] through a [`CommandLog`].
//!
//! # Forced state
//!
//! Before each entry's operation, the renderer is forced into the entry's
//! recorded snapshot (position, heading, pen). The operation is then issued
//! from that state. A renderer therefore never accumulates drift from its
//! own arithmetic: entry `i` starts exactly where the turtle was when
//! operation `i` was recorded.
//!
//! The forced position change must not draw. Renderers implement
//! [`Renderer::set_position`] as a pen-up jump.

use crate::carrier::command_log::{CommandLog, Operation, PenState, TurtleSnapshot};
use crate::carrier::log_reader::{parse_lines, LogParseError};
use crate::geometry::vector::Vec2;
use crate::raster::sample::RasterSample;

/// Error raised by a rendering backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The requested snapshot size is zero or too large.
    InvalidDimensions { width: usize, height: usize },
    /// The renderer was asked to move to or through a non-finite point.
    NonFiniteGeometry { detail: String },
    /// Any other backend failure.
    Backend { detail: String },
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid snapshot dimensions {width}x{height}")
            }
            Self::NonFiniteGeometry { detail } => write!(f, "non-finite geometry: {detail}"),
            Self::Backend { detail } => write!(f, "renderer failure: {detail}"),
        }
    }
}

impl std::error::Error for RenderError {}

/// A drawing backend that replay can control.
///
/// Headings are canonical radians (counter-clockwise from +x). Movement
/// with the pen down draws; `set_position` never draws.
pub trait Renderer {
    /// Jump to `position` without drawing.
    ///
    /// # Errors
    ///
    /// Backend-specific.
    fn set_position(&mut self, position: Vec2) -> Result<(), RenderError>;

    /// Face `heading`.
    ///
    /// # Errors
    ///
    /// Backend-specific.
    fn set_heading(&mut self, heading: f64) -> Result<(), RenderError>;

    /// Raise or lower the pen.
    ///
    /// # Errors
    ///
    /// Backend-specific.
    fn set_pen(&mut self, pen: PenState) -> Result<(), RenderError>;

    /// Move `distance` along the current heading.
    ///
    /// # Errors
    ///
    /// Backend-specific.
    fn forward(&mut self, distance: f64) -> Result<(), RenderError>;

    /// Move in a straight line to `target`.
    ///
    /// # Errors
    ///
    /// Backend-specific.
    fn goto(&mut self, target: Vec2) -> Result<(), RenderError>;

    /// Rasterize everything drawn so far into a `width × height` alpha grid.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidDimensions`] for an unusable size.
    fn snapshot(&self, width: usize, height: usize) -> Result<RasterSample, RenderError>;
}

/// Error during replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// The renderer failed while replaying entry `entry_index` (0-based).
    Render {
        entry_index: usize,
        source: RenderError,
    },
    /// The log text could not be parsed (only from [`replay_lines`]).
    Parse(LogParseError),
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render {
                entry_index,
                source,
            } => write!(f, "entry {entry_index}: {source}"),
            Self::Parse(e) => write!(f, "log parse failed: {e}"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<LogParseError> for ReplayError {
    fn from(e: LogParseError) -> Self {
        Self::Parse(e)
    }
}

/// What a successful replay did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplaySummary {
    /// Number of entries issued to the renderer.
    pub entries_replayed: usize,
    /// State after the last entry, `None` for an empty log.
    pub final_state: Option<TurtleSnapshot>,
}

/// Replay every entry of `log` into `renderer`, in order.
///
/// # Errors
///
/// Returns [`ReplayError::Render`] on the first renderer failure. Entries
/// after the failing one are not issued.
pub fn replay(log: &CommandLog, renderer: &mut dyn Renderer) -> Result<ReplaySummary, ReplayError> {
    for (entry_index, entry) in log.iter().enumerate() {
        replay_entry(&entry.snapshot, &entry.operation, renderer).map_err(|source| {
            ReplayError::Render {
                entry_index,
                source,
            }
        })?;
    }
    Ok(ReplaySummary {
        entries_replayed: log.len(),
        final_state: log.final_state(),
    })
}

/// Parse log lines and replay them.
///
/// Nothing reaches the renderer unless the whole input parses.
///
/// # Errors
///
/// Returns [`ReplayError::Parse`] for malformed input and
/// [`ReplayError::Render`] for renderer failures.
pub fn replay_lines<I, S>(
    lines: I,
    renderer: &mut dyn Renderer,
) -> Result<ReplaySummary, ReplayError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let log = parse_lines(lines)?;
    replay(&log, renderer)
}

fn replay_entry(
    snapshot: &TurtleSnapshot,
    operation: &Operation,
    renderer: &mut dyn Renderer,
) -> Result<(), RenderError> {
    renderer.set_position(snapshot.position)?;
    renderer.set_heading(snapshot.heading)?;
    renderer.set_pen(snapshot.pen)?;

    match *operation {
        Operation::Forward { distance } => renderer.forward(distance),
        Operation::Goto { target } => renderer.goto(target),
        Operation::Home { heading } => {
            renderer.goto(Vec2::ZERO)?;
            renderer.set_heading(heading)
        }
        Operation::Turn { delta } => renderer.set_heading(snapshot.heading - delta),
        Operation::SetHeading { heading } => renderer.set_heading(heading),
        Operation::PenUp => renderer.set_pen(PenState::Up),
        Operation::PenDown => renderer.set_pen(PenState::Down),
    }
}
