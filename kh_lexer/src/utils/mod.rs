//! Shared primitives for the lexer: source positions, slice descriptors
//! and UTF-8 sequence helpers.

pub mod span;
pub mod utf8;

pub use span::{Position, SourceSlice, LINE_COLUMN_UNTRACKED};
