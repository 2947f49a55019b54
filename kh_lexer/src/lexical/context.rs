//! Resumable scan state
//!
//! A [`ScanContext`] borrows the source and owns the caller's record storage.
//! Between calls to [`ScanContext::scan`] it keeps the cursor, the state of
//! the scan and the first error, so a scan suspended on exhausted storage
//! continues exactly where it stopped once the caller has grown the storage.

use serde::Serialize;
use std::fmt;

use super::analyzer::{self, LexerError};
use super::matchers::{Abort, Lexed};
use crate::config::runtime::LexicalPreferences;
use crate::tokens::{RecordId, TokenBuffer, TokenKind, TokenRecord, TokenValue};
use crate::utils::Position;

/// Where a scan stands between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScanState {
    /// Fresh, or inside a call to `scan`
    Scanning,
    /// The whole source has been tokenized
    Done,
    /// A fatal lexical error stopped the scan
    Error,
    /// Suspended until the caller grows the record storage
    BufferExhausted,
}

/// Status code of the last scan call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScanStatus {
    Ok,
    Unknown,
    InvalidUtf8,
    NoLexMatch,
    BufferExhausted,
    InvalidStringSyntax,
    UnterminatedComment,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Unknown => "unknown",
            Self::InvalidUtf8 => "invalid_utf8",
            Self::NoLexMatch => "no_lex_match",
            Self::BufferExhausted => "buffer_exhausted",
            Self::InvalidStringSyntax => "invalid_string_syntax",
            Self::UnterminatedComment => "unterminated_comment",
        }
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful result of a scan call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Every byte of the source was consumed
    Complete,
    /// The next record did not fit; grow the storage and call `scan` again
    BufferExhausted,
}

/// Counters accumulated over the lifetime of one scan context.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ScanMetrics {
    pub total_records: usize,
    pub identifiers: usize,
    pub keywords: usize,
    pub strings: usize,
    pub symbols: usize,
    pub integers: usize,
    pub floats: usize,
    pub comments: usize,
    pub whitespace_bytes: usize,
    pub wrapped_literals: usize,
    pub resumptions: usize,
}

impl ScanMetrics {
    pub fn record_token(&mut self, kind: TokenKind) {
        self.total_records += 1;
        match kind {
            TokenKind::Identifier => self.identifiers += 1,
            TokenKind::Keyword => self.keywords += 1,
            TokenKind::String => self.strings += 1,
            TokenKind::CharSymbol => self.symbols += 1,
            TokenKind::U64 => self.integers += 1,
            TokenKind::F64 => self.floats += 1,
        }
    }

    pub fn record_comment(&mut self) {
        self.comments += 1;
    }

    pub fn record_whitespace(&mut self) {
        self.whitespace_bytes += 1;
    }

    pub fn record_wrapped_literal(&mut self) {
        self.wrapped_literals += 1;
    }

    pub fn record_resumption(&mut self) {
        self.resumptions += 1;
    }
}

/// State of one scan over one source.
#[derive(Debug)]
pub struct ScanContext<'src> {
    pub(super) source: &'src [u8],
    pub(super) position: Position,
    pub(super) state: ScanState,
    pub(super) status: ScanStatus,
    pub(super) error: Option<LexerError>,
    pub(super) records: TokenBuffer,
    pub(super) metrics: ScanMetrics,
    pub(super) preferences: LexicalPreferences,
}

impl<'src> ScanContext<'src> {
    /// Context at the start of `source`, writing into `records`.
    ///
    /// `source` may be any byte view; it does not have to be valid UTF-8.
    pub fn new<S>(source: &'src S, records: TokenBuffer) -> Self
    where
        S: AsRef<[u8]> + ?Sized,
    {
        Self::with_preferences(source, records, LexicalPreferences::default())
    }

    pub fn with_preferences<S>(
        source: &'src S,
        records: TokenBuffer,
        preferences: LexicalPreferences,
    ) -> Self
    where
        S: AsRef<[u8]> + ?Sized,
    {
        Self {
            source: source.as_ref(),
            position: Position::start(),
            state: ScanState::Scanning,
            status: ScanStatus::Ok,
            error: None,
            records,
            metrics: ScanMetrics::default(),
            preferences,
        }
    }

    /// Run or resume the scan. See [`analyzer::scan`].
    pub fn scan(&mut self) -> Result<ScanOutcome, LexerError> {
        analyzer::scan(self)
    }

    pub fn source(&self) -> &'src [u8] {
        self.source
    }

    pub fn source_len(&self) -> usize {
        self.source.len()
    }

    /// Current cursor
    pub fn position(&self) -> Position {
        self.position
    }

    /// Byte offset of the cursor
    pub fn offset(&self) -> usize {
        self.position.offset
    }

    /// Whether the byte `ahead` positions past the cursor lies beyond the source
    pub fn is_src_end(&self, ahead: usize) -> bool {
        self.position.offset.saturating_add(ahead) >= self.source.len()
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    /// The error that stopped the scan, if any
    pub fn error(&self) -> Option<&LexerError> {
        self.error.as_ref()
    }

    pub fn metrics(&self) -> &ScanMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    pub fn records(&self) -> &TokenBuffer {
        &self.records
    }

    /// Mutable access to the storage, for growing it after a suspension
    pub fn records_mut(&mut self) -> &mut TokenBuffer {
        &mut self.records
    }

    pub fn into_records(self) -> TokenBuffer {
        self.records
    }

    pub fn first_record(&self) -> Option<RecordId> {
        self.records.first()
    }

    pub fn next_record(&self, current: RecordId) -> Option<RecordId> {
        self.records.next(current)
    }

    pub fn record(&self, id: RecordId) -> Option<&TokenRecord> {
        self.records.get(id)
    }

    /// Unconsumed source bytes
    pub(super) fn rest(&self) -> &'src [u8] {
        self.source.get(self.position.offset..).unwrap_or_default()
    }

    /// Byte `ahead` positions past the cursor
    pub(super) fn byte_at(&self, ahead: usize) -> Option<u8> {
        self.rest().get(ahead).copied()
    }

    /// Commit a record for the lexeme starting at the cursor and move the
    /// cursor to `end`. On exhausted storage nothing changes.
    pub(super) fn emit(&mut self, value: TokenValue, end: Position) -> Result<Lexed, Abort> {
        let slot = self.records.acquire()?;
        slot.fill(TokenRecord::new(value, self.position));
        self.metrics.record_token(value.kind());
        self.position = end;
        Ok(Lexed::Matched)
    }

    /// Move the cursor over a lexeme that produces no record
    pub(super) fn skip_to(&mut self, end: Position) -> Result<Lexed, Abort> {
        self.position = end;
        Ok(Lexed::Matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_starts_at_origin() {
        let ctx = ScanContext::new("let x", TokenBuffer::with_capacity_records(4));

        assert_eq!(ctx.offset(), 0);
        assert_eq!(ctx.source_len(), 5);
        assert_eq!(ctx.state(), ScanState::Scanning);
        assert_eq!(ctx.status(), ScanStatus::Ok);
        assert!(ctx.error().is_none());
        assert!(ctx.first_record().is_none());
    }

    #[test]
    fn test_is_src_end_lookahead() {
        let ctx = ScanContext::new(b"ab".as_slice(), TokenBuffer::default());

        assert!(!ctx.is_src_end(0));
        assert!(!ctx.is_src_end(1));
        assert!(ctx.is_src_end(2));
        assert!(ctx.is_src_end(usize::MAX));
    }

    #[test]
    fn test_emit_leaves_cursor_on_exhaustion() {
        let mut ctx = ScanContext::new(";", TokenBuffer::default());
        let end = ctx.position().advance_ascii(1);

        let result = ctx.emit(TokenValue::CharSymbol(';'), end);

        assert!(matches!(result, Err(Abort::Exhausted(_))));
        assert_eq!(ctx.offset(), 0);
        assert_eq!(ctx.metrics().total_records, 0);
    }

    #[test]
    fn test_emit_commits_record_and_moves_cursor() {
        let mut ctx = ScanContext::new(";", TokenBuffer::with_capacity_records(1));
        let end = ctx.position().advance_ascii(1);

        let result = ctx.emit(TokenValue::CharSymbol(';'), end);

        assert!(matches!(result, Ok(Lexed::Matched)));
        assert_eq!(ctx.offset(), 1);
        assert_eq!(ctx.metrics().symbols, 1);
        let first = ctx.first_record().unwrap();
        assert_eq!(ctx.record(first).unwrap().as_char_symbol(), Some(';'));
    }

    #[test]
    fn test_metrics_count_by_kind() {
        let mut metrics = ScanMetrics::default();
        metrics.record_token(TokenKind::Identifier);
        metrics.record_token(TokenKind::U64);
        metrics.record_token(TokenKind::U64);
        metrics.record_comment();

        assert_eq!(metrics.total_records, 3);
        assert_eq!(metrics.identifiers, 1);
        assert_eq!(metrics.integers, 2);
        assert_eq!(metrics.comments, 1);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ScanStatus::NoLexMatch.to_string(), "no_lex_match");
        assert_eq!(ScanStatus::BufferExhausted.as_str(), "buffer_exhausted");
    }
}
