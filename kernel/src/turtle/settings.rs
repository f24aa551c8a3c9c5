//! Presentation settings: angle unit and coordinate mode.
//!
//! Neither setting changes how state is stored. Headings are always kept in
//! canonical radians; these types only convert at the API boundary.

use std::f64::consts::FRAC_PI_2;

/// Unit in which the program passes and reads angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

impl AngleUnit {
    /// Convert an angle in this unit to radians.
    #[must_use]
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            Self::Degrees => angle.to_radians(),
            Self::Radians => angle,
        }
    }

    /// Convert radians to an angle in this unit.
    #[must_use]
    pub fn from_radians(self, radians: f64) -> f64 {
        match self {
            Self::Degrees => radians.to_degrees(),
            Self::Radians => radians,
        }
    }
}

/// Coordinate convention: where heading zero points.
///
/// | mode       | zero heading | home heading (canonical) |
/// |------------|--------------|--------------------------|
/// | `Standard` | east (+x)    | 0                        |
/// | `Logo`     | north (+y)   | π/2                      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoordinateMode {
    #[default]
    Standard,
    Logo,
}

impl CoordinateMode {
    /// Canonical heading that this mode reports as zero.
    #[must_use]
    pub const fn zero_offset(self) -> f64 {
        match self {
            Self::Standard => 0.0,
            Self::Logo => FRAC_PI_2,
        }
    }

    /// Canonical heading after `home()`.
    #[must_use]
    pub const fn home_heading(self) -> f64 {
        self.zero_offset()
    }
}
