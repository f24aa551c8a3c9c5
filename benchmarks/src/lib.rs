//! Shared inputs for turtle benchmark suites.

use turtle_kernel::carrier::command_log::CommandLog;
use turtle_kernel::raster::sample::RasterSample;
use turtle_kernel::turtle::VirtualTurtle;

/// Regular polygon with `sides` edges and the given perimeter.
///
/// # Panics
///
/// Panics if `sides` is zero. Benchmark setup failures are fatal.
#[must_use]
pub fn polygon(sides: u32, perimeter: f64) -> CommandLog {
    assert!(sides > 0, "polygon needs at least one side");
    let mut t = VirtualTurtle::new();
    let edge = perimeter / f64::from(sides);
    let angle = 360.0 / f64::from(sides);
    for _ in 0..sides {
        t.fd(edge).expect("finite edge");
        t.rt(angle).expect("finite angle");
    }
    t.into_log()
}

/// Deterministic pseudo-random raster (xorshift), so runs are comparable.
///
/// # Panics
///
/// Panics if `width * height` overflows.
#[must_use]
pub fn noise_raster(width: usize, height: usize, seed: u64) -> RasterSample {
    let mut state = seed | 1;
    RasterSample::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state.to_le_bytes()[0]
    })
    .expect("raster dimensions")
}
