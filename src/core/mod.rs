//! Core XML tokenizing primitives
//!
//! This module contains the fundamental building blocks:
//! - Scanner: SIMD-accelerated raw token splitting using memchr
//! - Entities: entity decoding with Cow (zero-copy when possible)
//! - Entity table: predefined XML plus HTML 4 named entities
//! - Element: O(1) tag classifiers and name/attribute-section extraction
//! - Attributes: allocation-free attribute visiting

pub mod attributes;
pub mod element;
pub mod entities;
pub mod entity_table;
pub mod scanner;
