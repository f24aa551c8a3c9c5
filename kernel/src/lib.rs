//! Turtle Kernel: the deterministic core of the drawing verifier.
//!
//! # API Surface
//!
//! - [`turtle::VirtualTurtle`] -- record a drawing program as a [`carrier::command_log::CommandLog`]
//! - [`carrier::log_writer::log_to_text`] / [`carrier::log_reader::parse_lines`] -- the sentinel-framed text format
//! - [`proof::replay::replay`] -- drive a [`proof::replay::Renderer`] through a log with forced state
//! - [`raster::diff::compare`] -- alpha diff of two rasters into a [`raster::diff::Verdict`]
//!
//! # Module Dependency Direction
//!
//! `geometry` ← `carrier` ← `turtle`, and `carrier` + `raster` ← `proof`.
//!
//! One-way only. No cycles. `raster` depends on nothing internal.
//! `proof` owns hashing, canonical JSON, and replay.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod carrier;
pub mod geometry;
pub mod proof;
pub mod raster;
pub mod turtle;
