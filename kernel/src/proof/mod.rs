//! Proof module: canonical hashing, canonical JSON, replay.
//!
//! Depends on `carrier`, `geometry`, and `raster`. Nothing depends on `proof` within the kernel.

pub mod canon;
pub mod hash;
pub mod hash_domain;
pub mod replay;
