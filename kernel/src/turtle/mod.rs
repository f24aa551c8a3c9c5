//! Turtle module: the virtual turtle a drawing program runs against.
//!
//! Depends on `geometry` and `carrier`. The turtle owns its
//! [`CommandLog`](crate::carrier::command_log::CommandLog); there is no
//! shared or global log.

pub mod settings;
pub mod virtual_turtle;

pub use settings::{AngleUnit, CoordinateMode};
pub use virtual_turtle::{TurtleError, VirtualTurtle};
