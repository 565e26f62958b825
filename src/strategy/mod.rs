//! Scanning strategies built on the core reader
//!
//! - Parallel: independent readers over shared immutable buffers (rayon)

#[cfg(feature = "parallel")]
pub mod parallel;
