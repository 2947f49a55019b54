//! Scan dispatch loop and lexer errors
//!
//! [`scan`] drives the matchers over a [`ScanContext`] until the source is
//! consumed, a fatal error occurs, or the record storage runs out. Errors are
//! sticky: once a context has failed, every later call reports the same error.

use super::context::{ScanContext, ScanOutcome, ScanState, ScanStatus};
use super::matchers::{Abort, Lexed, MATCHERS};
use crate::logging::codes;
use crate::tokens::ArenaExhausted;
use crate::utils::{utf8, Position};
use crate::{log_debug, log_error, log_success};

/// Fatal lexical errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("Invalid UTF-8 sequence at {at}")]
    InvalidUtf8 { at: Position },

    #[error("No lexical match for byte {byte:#04x} at {at}")]
    NoLexMatch { at: Position, byte: u8 },

    #[error("Unterminated string literal starting at {at}")]
    InvalidStringSyntax { at: Position },

    #[error("Unterminated block comment starting at {at}")]
    UnterminatedComment { at: Position },

    #[error("Lexer stalled at {at}: {matcher} matcher consumed no input")]
    Unknown {
        at: Position,
        matcher: &'static str,
    },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::InvalidUtf8 { .. } => codes::lexical::INVALID_UTF8,
            LexerError::NoLexMatch { .. } => codes::lexical::NO_LEX_MATCH,
            LexerError::InvalidStringSyntax { .. } => codes::lexical::INVALID_STRING_SYNTAX,
            LexerError::UnterminatedComment { .. } => codes::lexical::UNTERMINATED_COMMENT,
            LexerError::Unknown { .. } => codes::lexical::UNKNOWN_LEXER_ERROR,
        }
    }

    /// Status a context reports after failing with this error
    pub fn status(&self) -> ScanStatus {
        match self {
            LexerError::InvalidUtf8 { .. } => ScanStatus::InvalidUtf8,
            LexerError::NoLexMatch { .. } => ScanStatus::NoLexMatch,
            LexerError::InvalidStringSyntax { .. } => ScanStatus::InvalidStringSyntax,
            LexerError::UnterminatedComment { .. } => ScanStatus::UnterminatedComment,
            LexerError::Unknown { .. } => ScanStatus::Unknown,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            LexerError::InvalidUtf8 { at }
            | LexerError::NoLexMatch { at, .. }
            | LexerError::InvalidStringSyntax { at }
            | LexerError::UnterminatedComment { at }
            | LexerError::Unknown { at, .. } => *at,
        }
    }
}

/// Run or resume a scan.
///
/// Returns `Ok(Complete)` once the whole source is tokenized and
/// `Ok(BufferExhausted)` when the next record does not fit; the caller then
/// grows [`ScanContext::records_mut`] and calls again with the same context.
/// Records committed before a suspension are never rewritten.
pub fn scan(ctx: &mut ScanContext<'_>) -> Result<ScanOutcome, LexerError> {
    if let Some(error) = &ctx.error {
        return Err(error.clone());
    }

    match ctx.state {
        ScanState::Done => return Ok(ScanOutcome::Complete),
        ScanState::BufferExhausted => {
            ctx.metrics.record_resumption();
            log_debug!("Scan resumed",
                "offset" => ctx.position.offset,
                "records" => ctx.records.len(),
                "capacity" => ctx.records.capacity()
            );
        }
        ScanState::Scanning | ScanState::Error => {
            log_debug!("Scan started",
                "source_len" => ctx.source.len(),
                "capacity" => ctx.records.capacity()
            );
        }
    }

    ctx.state = ScanState::Scanning;
    ctx.status = ScanStatus::Ok;

    while !ctx.is_src_end(0) {
        match step(ctx) {
            Ok(()) => {}
            Err(Abort::Exhausted(exhausted)) => return Ok(suspend(ctx, exhausted)),
            Err(Abort::Fatal(error)) => return Err(fail(ctx, error)),
        }
    }

    ctx.state = ScanState::Done;
    if ctx.preferences.log_scan_summary {
        log_success!(
            codes::success::TOKENIZATION_COMPLETE,
            "Tokenization completed",
            "records" => ctx.metrics.total_records,
            "comments" => ctx.metrics.comments,
            "resumptions" => ctx.metrics.resumptions
        );
    }
    Ok(ScanOutcome::Complete)
}

/// Consume exactly one lexeme with the first matcher that accepts it.
fn step(ctx: &mut ScanContext<'_>) -> Result<(), Abort> {
    let before = ctx.position.offset;

    for (name, matcher) in MATCHERS {
        match matcher(ctx)? {
            Lexed::Pass => continue,
            Lexed::Matched if ctx.position.offset > before => return Ok(()),
            Lexed::Matched => {
                return Err(Abort::Fatal(LexerError::Unknown {
                    at: ctx.position,
                    matcher: name,
                }))
            }
        }
    }

    let at = ctx.position;
    let rest = ctx.rest();
    let error = match rest.first() {
        Some(&byte) if utf8::starts_with_valid_sequence(rest) => LexerError::NoLexMatch { at, byte },
        _ => LexerError::InvalidUtf8 { at },
    };
    Err(Abort::Fatal(error))
}

fn suspend(ctx: &mut ScanContext<'_>, exhausted: ArenaExhausted) -> ScanOutcome {
    ctx.state = ScanState::BufferExhausted;
    ctx.status = ScanStatus::BufferExhausted;

    if ctx.preferences.log_suspensions {
        log_success!(
            codes::success::SCAN_SUSPENDED,
            "Scan suspended on exhausted record storage",
            "offset" => ctx.position.offset,
            "write_offset" => exhausted.write_offset,
            "capacity" => exhausted.capacity
        );
    }
    ScanOutcome::BufferExhausted
}

fn fail(ctx: &mut ScanContext<'_>, error: LexerError) -> LexerError {
    ctx.state = ScanState::Error;
    ctx.status = error.status();
    ctx.error = Some(error.clone());

    let message = error.to_string();
    if ctx.preferences.include_position_in_errors {
        log_error!(error.error_code(), &message, at = error.position(),
            "status" => ctx.status,
            "records" => ctx.records.len()
        );
    } else {
        log_error!(error.error_code(), &message,
            "status" => ctx.status,
            "records" => ctx.records.len()
        );
    }
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenBuffer;
    use assert_matches::assert_matches;

    #[test]
    fn test_error_codes() {
        let at = Position::start();
        assert_eq!(
            LexerError::InvalidUtf8 { at }.error_code(),
            codes::lexical::INVALID_UTF8
        );
        assert_eq!(
            LexerError::NoLexMatch { at, byte: 1 }.error_code(),
            codes::lexical::NO_LEX_MATCH
        );
        assert_eq!(
            LexerError::InvalidStringSyntax { at }.error_code(),
            codes::lexical::INVALID_STRING_SYNTAX
        );
        assert_eq!(
            LexerError::UnterminatedComment { at }.error_code(),
            codes::lexical::UNTERMINATED_COMMENT
        );
        assert_eq!(
            LexerError::Unknown { at, matcher: "number" }.error_code(),
            codes::lexical::UNKNOWN_LEXER_ERROR
        );
    }

    #[test]
    fn test_error_message_names_the_byte() {
        let error = LexerError::NoLexMatch {
            at: Position::start(),
            byte: 0x01,
        };
        assert!(error.to_string().contains("0x01"));
        assert_eq!(error.status(), ScanStatus::NoLexMatch);
    }

    #[test]
    fn test_scan_empty_source() {
        let mut ctx = ScanContext::new("", TokenBuffer::default());
        assert_matches!(scan(&mut ctx), Ok(ScanOutcome::Complete));
        assert_eq!(ctx.state(), ScanState::Done);
        assert_eq!(ctx.status(), ScanStatus::Ok);
    }

    #[test]
    fn test_done_context_stays_done() {
        let mut ctx = ScanContext::new("x", TokenBuffer::with_capacity_records(1));
        assert_matches!(scan(&mut ctx), Ok(ScanOutcome::Complete));
        assert_matches!(scan(&mut ctx), Ok(ScanOutcome::Complete));
        assert_eq!(ctx.records().len(), 1);
    }

    #[test]
    fn test_failure_is_sticky() {
        let mut ctx = ScanContext::new("a \u{1}", TokenBuffer::with_capacity_records(4));

        let first = scan(&mut ctx).unwrap_err();
        assert_matches!(first, LexerError::NoLexMatch { byte: 0x01, at } if at.offset == 2);
        assert_eq!(ctx.state(), ScanState::Error);
        assert_eq!(ctx.status(), ScanStatus::NoLexMatch);

        let second = scan(&mut ctx).unwrap_err();
        assert_eq!(first, second);
        assert_eq!(ctx.records().len(), 1);
    }

    #[test]
    fn test_invalid_utf8_at_top_level() {
        let mut ctx = ScanContext::new(b"x \xC0\x80".as_slice(), TokenBuffer::with_capacity_records(4));
        assert_matches!(
            scan(&mut ctx),
            Err(LexerError::InvalidUtf8 { at }) if at.offset == 2
        );
        assert_eq!(ctx.status(), ScanStatus::InvalidUtf8);
    }

    #[test]
    fn test_non_identifier_unicode_is_no_match() {
        let mut ctx = ScanContext::new("€", TokenBuffer::with_capacity_records(1));
        assert_matches!(
            scan(&mut ctx),
            Err(LexerError::NoLexMatch { byte: 0xE2, .. })
        );
    }

    #[test]
    fn test_suspend_and_resume_counts_resumptions() {
        let mut ctx = ScanContext::new("a b c", TokenBuffer::with_capacity_records(1));

        assert_matches!(scan(&mut ctx), Ok(ScanOutcome::BufferExhausted));
        assert_eq!(ctx.state(), ScanState::BufferExhausted);
        assert_eq!(ctx.status(), ScanStatus::BufferExhausted);
        assert_eq!(ctx.offset(), 2);

        ctx.records_mut().grow_to_records(3);
        assert_matches!(scan(&mut ctx), Ok(ScanOutcome::Complete));
        assert_eq!(ctx.metrics().resumptions, 1);
        assert_eq!(ctx.records().len(), 3);
        assert_eq!(ctx.status(), ScanStatus::Ok);
    }
}
