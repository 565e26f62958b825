//! XML Reader Module
//!
//! - Events: structured token types
//! - TokenReader: classifier/adapter over the raw scanner

pub mod events;
pub mod slice;
