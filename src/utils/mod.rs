//! Generic utility primitives with zero domain knowledge.
//!
//! - `coerce` - Value shape coercion (`ensure_array`)
//! - `io` - File I/O with consistent error handling
//! - `parser` - Whitespace tokenizing, truncation and ordinals
//! - `validation` - Input validation helpers

pub mod coerce;
pub mod io;
pub mod parser;
pub mod validation;

pub use coerce::ensure_array;
pub use parser::{ordinal, truncate, unwhite};
