//! Carrier module: the command log and its text encoding.
//!
//! Depends only on `geometry`. `turtle` and `proof` build on top of it.

pub mod command_log;
pub mod log_reader;
pub mod log_writer;
