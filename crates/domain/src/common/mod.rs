//! Common utility functions shared across the domain crate.
//!
//! This module provides pure utility functions used by the resolution and
//! keyword-aggregation paths.
//!
//! # Design Principles
//!
//! - **Pure functions only** - no side effects, no I/O
//! - **Minimal dependencies** - standard library only

pub mod keywords;
pub mod string;

// Re-export commonly used functions at crate root for convenience
pub use keywords::{merge_tags, normalize_tag, singularize, split_tags};
pub use string::none_if_empty;
