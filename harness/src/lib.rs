//! Turtle Harness: grading orchestration on top of the kernel.
//!
//! The harness replays a submission's command log into a concrete raster
//! renderer, compares the snapshot with a reference raster through the
//! kernel's image differ, and packages the verdict as an auditable report.
//!
//! The harness does NOT implement replay or diff logic. It delegates to the
//! kernel and owns only rendering, configuration, and persistence.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod artifact;
pub mod canvas;
pub mod config;
pub mod report;
pub mod runner;
