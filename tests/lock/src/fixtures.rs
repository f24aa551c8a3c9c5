//! Drawing programs and a small grading policy used across lock tests.
//!
//! Each program is written against [`VirtualTurtle`] the way a submission
//! would be, so fixtures exercise the full recording path.
//!
//! # Panics
//!
//! The programs only use finite inputs; every `expect` is a fixture bug.

use turtle_harness::config::GradingPolicy;
use turtle_kernel::carrier::command_log::CommandLog;
use turtle_kernel::turtle::{CoordinateMode, VirtualTurtle};

/// Canvas used by lock tests: large enough for every fixture, small enough
/// to grade quickly.
#[must_use]
pub fn lock_policy() -> GradingPolicy {
    GradingPolicy {
        canvas_width: 240,
        canvas_height: 160,
        ..GradingPolicy::default()
    }
}

/// Closed square, clockwise from the origin.
///
/// # Panics
///
/// Never for finite `side`.
#[must_use]
pub fn square(side: f64) -> CommandLog {
    let mut t = VirtualTurtle::new();
    for _ in 0..4 {
        t.fd(side).expect("finite");
        t.rt(90.0).expect("finite");
    }
    t.into_log()
}

/// Five-pointed star.
///
/// # Panics
///
/// Never for finite `size`.
#[must_use]
pub fn star(size: f64) -> CommandLog {
    let mut t = VirtualTurtle::new();
    t.pu();
    t.goto(-size / 2.0, size / 6.0).expect("finite");
    t.pd();
    for _ in 0..5 {
        t.fd(size).expect("finite");
        t.rt(144.0).expect("finite");
    }
    t.into_log()
}

/// Square spiral drawn in radians with pen lifts between arms.
///
/// # Panics
///
/// Never.
#[must_use]
pub fn broken_spiral() -> CommandLog {
    let mut t = VirtualTurtle::new();
    t.radians();
    for arm in 1..=12 {
        if arm % 3 == 0 {
            t.penup();
        }
        t.forward(f64::from(arm) * 5.0).expect("finite");
        t.pendown();
        t.left(std::f64::consts::FRAC_PI_2).expect("finite");
    }
    t.home();
    t.into_log()
}

/// Triangle drawn in logo mode (zero heading points north).
///
/// # Panics
///
/// Never.
#[must_use]
pub fn logo_triangle() -> CommandLog {
    let mut t = VirtualTurtle::with_mode(CoordinateMode::Logo);
    t.seth(30.0).expect("finite");
    for _ in 0..3 {
        t.fd(60.0).expect("finite");
        t.rt(120.0).expect("finite");
    }
    t.into_log()
}

/// Every fixture program with a stable name.
#[must_use]
pub fn all_programs() -> Vec<(&'static str, CommandLog)> {
    vec![
        ("square", square(50.0)),
        ("star", star(100.0)),
        ("broken_spiral", broken_spiral()),
        ("logo_triangle", logo_triangle()),
    ]
}
