//! `VirtualTurtle`: state machine that records every operation into its own
//! [`CommandLog`].
//!
//! Each operation has exactly one canonical method; the familiar turtle
//! vocabulary (`fd`, `rt`, `setpos`, `pu`, ...) delegates to it. All state
//! changes go through `record()`, which snapshots the pre-operation state,
//! applies [`Operation::apply`], and appends the entry.
//!
//! # Numeric policy
//!
//! Non-finite inputs, and finite inputs whose result would be non-finite,
//! are rejected with [`TurtleError`]. A rejected call leaves both the state
//! and the log unchanged.

use crate::carrier::command_log::{CommandLog, LogEntry, Operation, PenState, TurtleSnapshot};
use crate::geometry::vector::Vec2;
use crate::turtle::settings::{AngleUnit, CoordinateMode};

/// Typed failure for turtle operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurtleError {
    /// An argument was NaN or infinite.
    NonFiniteInput { operation: String },
    /// The arguments were finite but the resulting state would not be.
    NonFiniteResult { operation: String },
}

impl std::fmt::Display for TurtleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteInput { operation } => {
                write!(f, "{operation}: non-finite argument")
            }
            Self::NonFiniteResult { operation } => {
                write!(f, "{operation}: result is not finite")
            }
        }
    }
}

impl std::error::Error for TurtleError {}

/// A recording turtle.
///
/// `Clone` produces a fully independent turtle: state, settings, and its own
/// copy of the log. Mutating the clone is never observable on the original.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualTurtle {
    state: TurtleSnapshot,
    unit: AngleUnit,
    mode: CoordinateMode,
    log: CommandLog,
}

impl Default for VirtualTurtle {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualTurtle {
    /// Standard mode, degrees, at the origin facing east, pen down.
    #[must_use]
    pub fn new() -> Self {
        Self::with_mode(CoordinateMode::Standard)
    }

    /// A fresh turtle at the given mode's home pose. Nothing is logged.
    #[must_use]
    pub fn with_mode(mode: CoordinateMode) -> Self {
        Self {
            state: TurtleSnapshot {
                heading: mode.home_heading(),
                ..TurtleSnapshot::INITIAL
            },
            unit: AngleUnit::Degrees,
            mode,
            log: CommandLog::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Canonical operations
    // -----------------------------------------------------------------------

    /// Move `distance` along the heading. Negative values move backward.
    ///
    /// # Errors
    ///
    /// Returns [`TurtleError`] if `distance` or the new position is not finite.
    pub fn forward(&mut self, distance: f64) -> Result<(), TurtleError> {
        check_inputs("forward", &[distance])?;
        self.record("forward", Operation::Forward { distance })
    }

    /// Turn clockwise by `angle`, expressed in the configured unit.
    ///
    /// # Errors
    ///
    /// Returns [`TurtleError`] if `angle` or the new heading is not finite.
    pub fn turn(&mut self, angle: f64) -> Result<(), TurtleError> {
        check_inputs("turn", &[angle])?;
        let delta = self.unit.to_radians(angle);
        self.record("turn", Operation::Turn { delta })
    }

    /// Move to an absolute position without changing heading.
    ///
    /// # Errors
    ///
    /// Returns [`TurtleError`] if either coordinate is not finite.
    pub fn move_to(&mut self, x: f64, y: f64) -> Result<(), TurtleError> {
        check_inputs("goto", &[x, y])?;
        self.record(
            "goto",
            Operation::Goto {
                target: Vec2::new(x, y),
            },
        )
    }

    /// Face `angle`, in the configured unit and coordinate mode.
    ///
    /// Exact inverse of [`heading`](Self::heading).
    ///
    /// # Errors
    ///
    /// Returns [`TurtleError`] if `angle` is not finite.
    pub fn set_heading(&mut self, angle: f64) -> Result<(), TurtleError> {
        check_inputs("setheading", &[angle])?;
        let heading = self.unit.to_radians(angle) + self.mode.zero_offset();
        self.record("setheading", Operation::SetHeading { heading })
    }

    /// Return to the origin and face the mode's home heading.
    pub fn home(&mut self) {
        self.record_infallible(Operation::Home {
            heading: self.mode.home_heading(),
        });
    }

    pub fn pen_up(&mut self) {
        self.record_infallible(Operation::PenUp);
    }

    pub fn pen_down(&mut self) {
        self.record_infallible(Operation::PenDown);
    }

    /// Heading in the configured unit, relative to the mode's zero direction.
    #[must_use]
    pub fn heading(&self) -> f64 {
        self.unit
            .from_radians(self.state.heading - self.mode.zero_offset())
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.state.position
    }

    #[must_use]
    pub fn xcor(&self) -> f64 {
        self.state.position.x
    }

    #[must_use]
    pub fn ycor(&self) -> f64 {
        self.state.position.y
    }

    #[must_use]
    pub fn is_down(&self) -> bool {
        self.state.pen.is_down()
    }

    #[must_use]
    pub fn pen(&self) -> PenState {
        self.state.pen
    }

    /// Distance from the turtle to `point`.
    #[must_use]
    pub fn distance_to(&self, point: Vec2) -> f64 {
        self.state.position.distance(point)
    }

    /// Current state in canonical form.
    #[must_use]
    pub fn snapshot(&self) -> TurtleSnapshot {
        self.state
    }

    #[must_use]
    pub fn angle_unit(&self) -> AngleUnit {
        self.unit
    }

    pub fn set_angle_unit(&mut self, unit: AngleUnit) {
        self.unit = unit;
    }

    #[must_use]
    pub fn mode(&self) -> CoordinateMode {
        self.mode
    }

    /// Switch coordinate mode and return home, which is logged.
    pub fn set_mode(&mut self, mode: CoordinateMode) {
        self.mode = mode;
        self.home();
    }

    /// Remove the last log entry and restore the state it was taken from.
    ///
    /// Returns the removed entry, or `None` if the log is empty (in which
    /// case nothing changes).
    pub fn undo(&mut self) -> Option<LogEntry> {
        let entry = self.log.undo()?;
        self.state = entry.snapshot;
        Some(entry)
    }

    #[must_use]
    pub fn log(&self) -> &CommandLog {
        &self.log
    }

    /// Consume the turtle, handing its log to the caller.
    #[must_use]
    pub fn into_log(self) -> CommandLog {
        self.log
    }

    // -----------------------------------------------------------------------
    // Vocabulary aliases
    // -----------------------------------------------------------------------

    /// Alias for [`forward`](Self::forward).
    ///
    /// # Errors
    ///
    /// See [`forward`](Self::forward).
    pub fn fd(&mut self, distance: f64) -> Result<(), TurtleError> {
        self.forward(distance)
    }

    /// Move backward: `forward(-distance)`.
    ///
    /// # Errors
    ///
    /// See [`forward`](Self::forward).
    pub fn back(&mut self, distance: f64) -> Result<(), TurtleError> {
        self.forward(-distance)
    }

    /// Alias for [`back`](Self::back).
    ///
    /// # Errors
    ///
    /// See [`forward`](Self::forward).
    pub fn bk(&mut self, distance: f64) -> Result<(), TurtleError> {
        self.back(distance)
    }

    /// Alias for [`back`](Self::back).
    ///
    /// # Errors
    ///
    /// See [`forward`](Self::forward).
    pub fn backward(&mut self, distance: f64) -> Result<(), TurtleError> {
        self.back(distance)
    }

    /// Alias for [`turn`](Self::turn).
    ///
    /// # Errors
    ///
    /// See [`turn`](Self::turn).
    pub fn right(&mut self, angle: f64) -> Result<(), TurtleError> {
        self.turn(angle)
    }

    /// Alias for [`turn`](Self::turn).
    ///
    /// # Errors
    ///
    /// See [`turn`](Self::turn).
    pub fn rt(&mut self, angle: f64) -> Result<(), TurtleError> {
        self.turn(angle)
    }

    /// Counter-clockwise turn: `turn(-angle)`.
    ///
    /// # Errors
    ///
    /// See [`turn`](Self::turn).
    pub fn left(&mut self, angle: f64) -> Result<(), TurtleError> {
        self.turn(-angle)
    }

    /// Alias for [`left`](Self::left).
    ///
    /// # Errors
    ///
    /// See [`turn`](Self::turn).
    pub fn lt(&mut self, angle: f64) -> Result<(), TurtleError> {
        self.left(angle)
    }

    /// Alias for [`move_to`](Self::move_to).
    ///
    /// # Errors
    ///
    /// See [`move_to`](Self::move_to).
    pub fn goto(&mut self, x: f64, y: f64) -> Result<(), TurtleError> {
        self.move_to(x, y)
    }

    /// [`move_to`](Self::move_to) taking a point.
    ///
    /// # Errors
    ///
    /// See [`move_to`](Self::move_to).
    pub fn setpos(&mut self, point: Vec2) -> Result<(), TurtleError> {
        self.move_to(point.x, point.y)
    }

    /// Alias for [`setpos`](Self::setpos).
    ///
    /// # Errors
    ///
    /// See [`move_to`](Self::move_to).
    pub fn setposition(&mut self, point: Vec2) -> Result<(), TurtleError> {
        self.setpos(point)
    }

    /// Move horizontally to `x`, keeping `y`.
    ///
    /// # Errors
    ///
    /// See [`move_to`](Self::move_to).
    pub fn setx(&mut self, x: f64) -> Result<(), TurtleError> {
        self.move_to(x, self.state.position.y)
    }

    /// Move vertically to `y`, keeping `x`.
    ///
    /// # Errors
    ///
    /// See [`move_to`](Self::move_to).
    pub fn sety(&mut self, y: f64) -> Result<(), TurtleError> {
        self.move_to(self.state.position.x, y)
    }

    /// Alias for [`set_heading`](Self::set_heading).
    ///
    /// # Errors
    ///
    /// See [`set_heading`](Self::set_heading).
    pub fn seth(&mut self, angle: f64) -> Result<(), TurtleError> {
        self.set_heading(angle)
    }

    /// Alias for [`set_heading`](Self::set_heading).
    ///
    /// # Errors
    ///
    /// See [`set_heading`](Self::set_heading).
    pub fn setheading(&mut self, angle: f64) -> Result<(), TurtleError> {
        self.set_heading(angle)
    }

    pub fn penup(&mut self) {
        self.pen_up();
    }

    pub fn pu(&mut self) {
        self.pen_up();
    }

    pub fn up(&mut self) {
        self.pen_up();
    }

    pub fn pendown(&mut self) {
        self.pen_down();
    }

    pub fn pd(&mut self) {
        self.pen_down();
    }

    pub fn down(&mut self) {
        self.pen_down();
    }

    #[must_use]
    pub fn pos(&self) -> Vec2 {
        self.position()
    }

    #[must_use]
    pub fn isdown(&self) -> bool {
        self.is_down()
    }

    pub fn degrees(&mut self) {
        self.set_angle_unit(AngleUnit::Degrees);
    }

    pub fn radians(&mut self) {
        self.set_angle_unit(AngleUnit::Radians);
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn record(&mut self, name: &str, operation: Operation) -> Result<(), TurtleError> {
        let after = operation.apply(&self.state);
        if !after.is_finite() {
            return Err(TurtleError::NonFiniteResult {
                operation: name.into(),
            });
        }
        self.log.push(LogEntry::new(self.state, operation));
        self.state = after;
        Ok(())
    }

    /// Record an operation whose operands are constants of the mode.
    fn record_infallible(&mut self, operation: Operation) {
        let after = operation.apply(&self.state);
        self.log.push(LogEntry::new(self.state, operation));
        self.state = after;
    }
}

fn check_inputs(operation: &str, values: &[f64]) -> Result<(), TurtleError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(TurtleError::NonFiniteInput {
            operation: operation.into(),
        })
    }
}
