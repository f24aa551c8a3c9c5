//! Raster module: alpha grids, the pixel differ, and the verdict.
//!
//! No other kernel module is imported here.

pub mod diff;
pub mod sample;
