//! `CommandLog`: append-only record of turtle operations for replay.
//!
//! # Snapshot convention
//!
//! Every [`LogEntry`] carries the turtle state observed **before** its
//! operation was applied. Two consumers depend on this:
//!
//! - `undo()` restores the turtle to the popped entry's snapshot, which is
//!   exactly the state the operation started from.
//! - Replay forces the renderer into the snapshot and then applies the
//!   operation, so the renderer ends where the turtle ended.
//!
//! Pen transitions are logged as entries of their own, and every snapshot
//! also carries the pen state, so replay never depends on the pen history.
//!
//! # Text encoding
//!
//! ```text
//! x y heading pen op operand...
//! ```
//!
//! `heading` is canonical radians, `pen` is `d` or `u`. See
//! [`crate::carrier::log_writer`] and [`crate::carrier::log_reader`].

use crate::geometry::vector::Vec2;

/// Pen state of a turtle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PenState {
    /// Movement leaves no trace.
    Up,
    /// Movement draws a line segment.
    #[default]
    Down,
}

impl PenState {
    /// Wire flag used in the text encoding.
    #[must_use]
    pub const fn flag(self) -> &'static str {
        match self {
            Self::Up => "u",
            Self::Down => "d",
        }
    }

    /// Parse a wire flag. Returns `None` for anything but `u` / `d`.
    #[must_use]
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "u" => Some(Self::Up),
            "d" => Some(Self::Down),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_down(self) -> bool {
        matches!(self, Self::Down)
    }
}

/// Turtle state attached to a log entry.
///
/// `heading` is canonical: radians, counter-clockwise from the +x axis,
/// independent of the turtle's angle unit and coordinate mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurtleSnapshot {
    pub position: Vec2,
    pub heading: f64,
    pub pen: PenState,
}

impl TurtleSnapshot {
    /// State of a fresh turtle: origin, heading 0, pen down.
    pub const INITIAL: Self = Self {
        position: Vec2::ZERO,
        heading: 0.0,
        pen: PenState::Down,
    };

    /// All numeric fields are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.heading.is_finite()
    }
}

/// A recorded turtle operation.
///
/// Operands are stored in canonical form (radians for angles), so the log
/// never depends on the unit the program was written in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    /// Move along the heading. Negative distances move backward.
    Forward { distance: f64 },
    /// Clockwise turn by `delta` radians (`heading -= delta`).
    Turn { delta: f64 },
    /// Set the canonical heading.
    SetHeading { heading: f64 },
    /// Move to an absolute position; heading unchanged.
    Goto { target: Vec2 },
    /// Move to the origin and face the mode's home heading.
    Home { heading: f64 },
    PenUp,
    PenDown,
}

/// Every wire tag the reader accepts, with its operand count.
pub const OPERATION_ARITY: &[(&str, usize)] = &[
    ("fd", 1),
    ("rt", 1),
    ("seth", 1),
    ("goto", 2),
    ("home", 1),
    ("penup", 0),
    ("pendown", 0),
];

impl Operation {
    /// Wire tag of this operation.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Forward { .. } => "fd",
            Self::Turn { .. } => "rt",
            Self::SetHeading { .. } => "seth",
            Self::Goto { .. } => "goto",
            Self::Home { .. } => "home",
            Self::PenUp => "penup",
            Self::PenDown => "pendown",
        }
    }

    /// Operands in wire order.
    #[must_use]
    pub fn operands(&self) -> Vec<f64> {
        match *self {
            Self::Forward { distance } => vec![distance],
            Self::Turn { delta } => vec![delta],
            Self::SetHeading { heading } | Self::Home { heading } => vec![heading],
            Self::Goto { target } => vec![target.x, target.y],
            Self::PenUp | Self::PenDown => Vec::new(),
        }
    }

    /// Number of operands a tag takes. `None` for unknown tags.
    #[must_use]
    pub fn arity(tag: &str) -> Option<usize> {
        OPERATION_ARITY
            .iter()
            .find(|(known, _)| *known == tag)
            .map(|&(_, arity)| arity)
    }

    /// Rebuild an operation from its tag and operands.
    ///
    /// Returns `None` if the tag is unknown or the operand count does not
    /// match [`Operation::arity`].
    #[must_use]
    pub fn from_parts(tag: &str, operands: &[f64]) -> Option<Self> {
        let op = match (tag, operands) {
            ("fd", &[distance]) => Self::Forward { distance },
            ("rt", &[delta]) => Self::Turn { delta },
            ("seth", &[heading]) => Self::SetHeading { heading },
            ("goto", &[x, y]) => Self::Goto {
                target: Vec2::new(x, y),
            },
            ("home", &[heading]) => Self::Home { heading },
            ("penup", &[]) => Self::PenUp,
            ("pendown", &[]) => Self::PenDown,
            _ => return None,
        };
        Some(op)
    }

    /// Apply this operation to a snapshot, producing the resulting state.
    ///
    /// This is the single definition of operation semantics: the turtle
    /// uses it to advance and tests use it to predict replay results.
    #[must_use]
    pub fn apply(&self, before: &TurtleSnapshot) -> TurtleSnapshot {
        let mut after = *before;
        match *self {
            Self::Forward { distance } => {
                after.position = before.position + Vec2::from_angle(before.heading) * distance;
            }
            Self::Turn { delta } => after.heading = before.heading - delta,
            Self::SetHeading { heading } => after.heading = heading,
            Self::Goto { target } => after.position = target,
            Self::Home { heading } => {
                after.position = Vec2::ZERO;
                after.heading = heading;
            }
            Self::PenUp => after.pen = PenState::Up,
            Self::PenDown => after.pen = PenState::Down,
        }
        after
    }
}

/// One immutable record: the pre-operation snapshot and the operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogEntry {
    pub snapshot: TurtleSnapshot,
    pub operation: Operation,
}

impl LogEntry {
    #[must_use]
    pub const fn new(snapshot: TurtleSnapshot, operation: Operation) -> Self {
        Self {
            snapshot,
            operation,
        }
    }

    /// State after applying the operation to the snapshot.
    #[must_use]
    pub fn result(&self) -> TurtleSnapshot {
        self.operation.apply(&self.snapshot)
    }
}

/// Ordered, append-only sequence of [`LogEntry`] values.
///
/// Insertion order is execution order and is never changed. `Clone` is a
/// deep copy: entries are plain values, so a cloned log shares nothing
/// with its source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandLog {
    entries: Vec<LogEntry>,
}

impl CommandLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the end of the log.
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Remove and return the last entry. `None` on an empty log.
    pub fn undo(&mut self) -> Option<LogEntry> {
        self.entries.pop()
    }

    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    /// State after the last entry, or `None` for an empty log.
    #[must_use]
    pub fn final_state(&self) -> Option<TurtleSnapshot> {
        self.entries.last().map(LogEntry::result)
    }
}

impl<'a> IntoIterator for &'a CommandLog {
    type Item = &'a LogEntry;
    type IntoIter = std::slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<LogEntry> for CommandLog {
    fn from_iter<I: IntoIterator<Item = LogEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
