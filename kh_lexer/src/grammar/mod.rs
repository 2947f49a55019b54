//! Lexical grammar tables: reserved words and symbol classes

pub mod keywords;
pub mod symbols;

// Re-export keywords
pub use keywords::{is_reserved_keyword, Keyword, UnknownKeyword};
