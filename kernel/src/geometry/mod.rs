//! Geometry module: the immutable 2D vector shared by every other layer.
//!
//! This is the foundational layer. No other kernel module is imported here.

pub mod vector;
