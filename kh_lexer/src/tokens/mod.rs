//! Token records and their storage
//!
//! - **[`TokenRecord`]** - one classified lexeme with a [`TokenValue`] payload
//! - **[`TokenBuffer`]** - caller-owned, append-only record storage sized in bytes
//! - **[`RecordId`]** / **[`Records`]** - forward traversal over committed records
//!
//! Identifier and string records never copy source text. They carry a
//! [`SourceSlice`](crate::utils::SourceSlice) that the caller resolves
//! against the same source the scan ran over.

pub mod arena;
pub mod iter;
pub mod token;

pub use arena::{ArenaExhausted, Slot, TokenBuffer, RECORD_STRIDE};
pub use iter::{RecordId, Records};
pub use token::{TokenKind, TokenRecord, TokenValue};
