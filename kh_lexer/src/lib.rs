//! Resumable UTF-8 lexer front end
//!
//! Scans raw source into fixed-stride token records held in caller-owned
//! storage. When the storage fills up the scan suspends; the caller grows it
//! and resumes with the same [`ScanContext`].

// Internal modules
#[macro_use]
pub mod logging;
pub mod config;
pub mod grammar;
pub mod lexical;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use grammar::Keyword;
pub use lexical::{
    scan, token_counts, tokenize, tokenize_with_preferences, LexerError, ScanContext,
    ScanMetrics, ScanOutcome, ScanState, ScanStatus, TokenCounts,
};
pub use tokens::{
    ArenaExhausted, RecordId, TokenBuffer, TokenKind, TokenRecord, TokenValue, RECORD_STRIDE,
};
pub use utils::{Position, SourceSlice, LINE_COLUMN_UNTRACKED};
