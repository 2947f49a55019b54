//! Lexical analysis
//!
//! Resumable tokenization of UTF-8 source into caller-owned record storage.
//! [`ScanContext::scan`] is the low-level protocol; [`tokenize`] wraps it in
//! the usual grow-and-resume loop.

pub mod analyzer;
pub mod context;
pub(crate) mod matchers;

use serde::Serialize;

use crate::config::compile_time::lexer::{GROWTH_FACTOR, INITIAL_RECORD_CAPACITY};
use crate::config::runtime::LexicalPreferences;
use crate::grammar::symbols;
use crate::tokens::{TokenBuffer, TokenValue};

pub use analyzer::{scan, LexerError};
pub use context::{ScanContext, ScanMetrics, ScanOutcome, ScanState, ScanStatus};

// ============================================================================
// MODULE API
// ============================================================================

/// Tokenize `source` completely, growing the record storage as needed
pub fn tokenize(source: &str) -> Result<TokenBuffer, LexerError> {
    tokenize_with_preferences(source, LexicalPreferences::default())
}

/// Tokenize with custom runtime preferences
pub fn tokenize_with_preferences(
    source: &str,
    preferences: LexicalPreferences,
) -> Result<TokenBuffer, LexerError> {
    let records = TokenBuffer::with_capacity_records(INITIAL_RECORD_CAPACITY);
    let mut ctx = ScanContext::with_preferences(source, records, preferences);

    while ctx.scan()? == ScanOutcome::BufferExhausted {
        let grown = ctx
            .records()
            .record_capacity()
            .max(1)
            .saturating_mul(GROWTH_FACTOR);
        ctx.records_mut().grow_to_records(grown);
    }

    Ok(ctx.into_records())
}

// ============================================================================
// MODULE INITIALIZATION AND VALIDATION
// ============================================================================

/// Check that every lexical code has registry metadata (for system startup)
pub fn init_lexical_analysis_logging() -> Result<(), String> {
    let lexical_codes = [
        crate::logging::codes::lexical::INVALID_UTF8,
        crate::logging::codes::lexical::NO_LEX_MATCH,
        crate::logging::codes::lexical::INVALID_STRING_SYNTAX,
        crate::logging::codes::lexical::UNTERMINATED_COMMENT,
        crate::logging::codes::lexical::UNKNOWN_LEXER_ERROR,
        crate::logging::codes::warnings::NUMERIC_OVERFLOW,
    ];

    for code in &lexical_codes {
        if crate::logging::codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    crate::log_debug!("Lexical storage limits initialized",
        "initial_record_capacity" => INITIAL_RECORD_CAPACITY,
        "growth_factor" => GROWTH_FACTOR,
        "record_stride" => crate::tokens::RECORD_STRIDE
    );

    Ok(())
}

/// Tokenize a fixed sample and check the record kinds it produces
pub fn validate_tokenization() -> Result<(), String> {
    if INITIAL_RECORD_CAPACITY == 0 {
        return Err("INITIAL_RECORD_CAPACITY cannot be zero".to_string());
    }
    if GROWTH_FACTOR < 2 {
        return Err("GROWTH_FACTOR must be at least 2".to_string());
    }

    let sample = "def answer = 0x2A; // sample\nreturn \"ok\"";
    let records = tokenize(sample).map_err(|e| format!("Sample tokenization failed: {}", e))?;
    let counts = token_counts(&records);

    let expected = TokenCounts {
        total: 7,
        keywords: 2,
        identifiers: 1,
        strings: 1,
        symbols: 2,
        brackets: 0,
        numbers: 1,
    };
    if counts != expected {
        return Err(format!(
            "Sample tokenization produced {:?}, expected {:?}",
            counts, expected
        ));
    }

    Ok(())
}

// ============================================================================
// ANALYSIS HELPERS
// ============================================================================

/// Record distribution over a token buffer
pub fn token_counts(records: &TokenBuffer) -> TokenCounts {
    let mut counts = TokenCounts::default();

    for (_, record) in records {
        counts.total += 1;
        match record.value() {
            TokenValue::Keyword(_) => counts.keywords += 1,
            TokenValue::Identifier(_) => counts.identifiers += 1,
            TokenValue::String(_) => counts.strings += 1,
            TokenValue::CharSymbol(symbol) => {
                if u8::try_from(*symbol).is_ok_and(symbols::is_bracket) {
                    counts.brackets += 1;
                } else {
                    counts.symbols += 1;
                }
            }
            TokenValue::U64(_) | TokenValue::F64(_) => counts.numbers += 1,
        }
    }

    counts
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct TokenCounts {
    pub total: usize,
    pub keywords: usize,
    pub identifiers: usize,
    pub strings: usize,
    /// Single-character symbols other than brackets
    pub symbols: usize,
    pub brackets: usize,
    pub numbers: usize,
}

impl TokenCounts {
    /// Whether anything beyond punctuation was produced
    pub fn has_content(&self) -> bool {
        self.keywords > 0 || self.identifiers > 0 || self.strings > 0 || self.numbers > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Keyword;
    use crate::logging::{codes, LogLevel, LoggingService, MemoryLogger};
    use crate::tokens::TokenRecord;
    use crate::utils::SourceSlice;
    use assert_matches::assert_matches;
    use std::sync::{Arc, OnceLock};

    /// Process-wide capture logger. Tests run in parallel, so assertions
    /// must look for events unique to the test.
    fn memory_logger() -> &'static Arc<MemoryLogger> {
        static LOGGER: OnceLock<Arc<MemoryLogger>> = OnceLock::new();
        LOGGER.get_or_init(|| {
            let memory = Arc::new(MemoryLogger::new());
            let service = LoggingService::new(memory.clone(), LogLevel::Debug);
            let _ = crate::logging::init_global_logging_with_service(Arc::new(service));
            memory
        })
    }

    fn values(records: &TokenBuffer) -> Vec<TokenValue> {
        records.iter().map(|(_, record)| *record.value()).collect()
    }

    fn quiet() -> LexicalPreferences {
        LexicalPreferences {
            log_scan_summary: false,
            warn_on_numeric_overflow: false,
            include_position_in_errors: true,
            log_suspensions: false,
        }
    }

    #[test]
    fn test_whitespace_only() {
        let records = tokenize(" \t\r\n  \n").unwrap();
        assert!(records.is_empty());
        assert!(records.first().is_none());
    }

    #[test]
    fn test_keyword_versus_identifier() {
        let records = tokenize("undefined").unwrap();
        assert_eq!(values(&records), [TokenValue::Keyword(Keyword::Undefined)]);

        let records = tokenize("undefinedx").unwrap();
        assert_eq!(
            values(&records),
            [TokenValue::Identifier(SourceSlice::new(0, 10))]
        );

        let records = tokenize("def defer deferred").unwrap();
        assert_eq!(
            values(&records),
            [
                TokenValue::Keyword(Keyword::Def),
                TokenValue::Keyword(Keyword::Defer),
                TokenValue::Identifier(SourceSlice::new(10, 8)),
            ]
        );
    }

    #[test]
    fn test_integer_literals() {
        let records = tokenize("0x1F 42 0XfF 007").unwrap();
        assert_eq!(
            values(&records),
            [
                TokenValue::U64(31),
                TokenValue::U64(42),
                TokenValue::U64(255),
                TokenValue::U64(7),
            ]
        );
    }

    #[test]
    fn test_escaped_delimiter_string() {
        let source = r#""a\"b""#;
        let records = tokenize(source).unwrap();
        assert_eq!(values(&records), [TokenValue::String(SourceSlice::new(0, 6))]);
        assert_eq!(records.records()[0].text(source), Some(source));
    }

    #[test]
    fn test_escaped_backslash_closes_string() {
        let source = r#""a\\" x"#;
        let records = tokenize(source).unwrap();
        assert_eq!(
            values(&records),
            [
                TokenValue::String(SourceSlice::new(0, 5)),
                TokenValue::Identifier(SourceSlice::new(6, 1)),
            ]
        );
    }

    #[test]
    fn test_slices_are_ordered_and_reproduce_source() {
        let source = "let name = 'ünï' + other_name; `raw`";
        let records = tokenize(source).unwrap();

        let texts: Vec<&str> = records
            .iter()
            .filter_map(|(_, record)| record.text(source))
            .collect();
        assert_eq!(texts, ["let", "name", "'ünï'", "other_name", "`raw`"]);

        let mut previous_end = 0;
        for (_, record) in &records {
            if let Some(slice) = record.slice() {
                assert!(slice.offset >= previous_end);
                assert_eq!(slice.resolve(source.as_bytes()).map(<[u8]>::len), Some(slice.len));
                previous_end = slice.end();
            }
        }
    }

    #[test]
    fn test_resume_at_every_split() {
        let source = "def x = [0x1F, \"s\"]; /* c */ y";
        let full = tokenize(source).unwrap();
        let total = full.len();
        assert_eq!(total, 10);

        for split in 0..total {
            let records = TokenBuffer::with_capacity_records(split);
            let mut ctx = ScanContext::with_preferences(source, records, quiet());

            assert_matches!(ctx.scan(), Ok(ScanOutcome::BufferExhausted));
            assert_eq!(ctx.records().len(), split);
            let before: Vec<TokenRecord> = ctx.records().records().to_vec();

            ctx.records_mut().grow_to_records(total);
            assert_matches!(ctx.scan(), Ok(ScanOutcome::Complete));
            assert_eq!(&ctx.records().records()[..split], before.as_slice());
            assert_eq!(ctx.records().records(), full.records());
            assert_eq!(ctx.metrics().resumptions, 1);
        }
    }

    #[test]
    fn test_suspended_cursor_sits_before_next_lexeme() {
        let mut ctx = ScanContext::with_preferences(
            "a b  c d",
            TokenBuffer::with_capacity_records(2),
            quiet(),
        );

        assert_matches!(ctx.scan(), Ok(ScanOutcome::BufferExhausted));
        assert_eq!(ctx.offset(), 5);
        assert_eq!(ctx.status(), ScanStatus::BufferExhausted);
    }

    #[test]
    fn test_undersized_storage_is_exhausted_immediately() {
        let records = TokenBuffer::with_capacity_bytes(crate::tokens::RECORD_STRIDE - 1);
        let mut ctx = ScanContext::with_preferences("x", records, quiet());

        assert_matches!(ctx.scan(), Ok(ScanOutcome::BufferExhausted));
        assert_eq!(ctx.offset(), 0);
        assert!(ctx.records().is_empty());
    }

    #[test]
    fn test_records_survive_errors() {
        let mut ctx = ScanContext::with_preferences(
            "x = \"abc",
            TokenBuffer::with_capacity_records(8),
            quiet(),
        );

        assert_matches!(
            ctx.scan(),
            Err(LexerError::InvalidStringSyntax { at }) if at.offset == 4
        );
        assert_eq!(ctx.status(), ScanStatus::InvalidStringSyntax);
        assert_eq!(ctx.records().len(), 2);
    }

    #[test]
    fn test_control_byte_has_no_match() {
        assert_matches!(
            tokenize("a\u{1}"),
            Err(LexerError::NoLexMatch { byte: 0x01, at }) if at.offset == 1
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let records = tokenize("a // line\n/* outer /* inner */ */ b").unwrap();
        assert_eq!(
            values(&records),
            [
                TokenValue::Identifier(SourceSlice::new(0, 1)),
                TokenValue::Identifier(SourceSlice::new(34, 1)),
            ]
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        assert_matches!(
            tokenize("a /* /* */"),
            Err(LexerError::UnterminatedComment { at }) if at.offset == 2
        );
    }

    #[test]
    fn test_invalid_utf8_is_reported_everywhere() {
        let cases: [&[u8]; 3] = [b"// \xFF\n", b"\"\xE2\x82\"", b"a \x80"];
        for source in cases {
            let mut ctx = ScanContext::with_preferences(
                source,
                TokenBuffer::with_capacity_records(4),
                quiet(),
            );
            assert_matches!(ctx.scan(), Err(LexerError::InvalidUtf8 { .. }));
            assert_eq!(ctx.status(), ScanStatus::InvalidUtf8);
        }
    }

    #[test]
    fn test_overflowing_literal_wraps() {
        let mut ctx = ScanContext::with_preferences(
            "18446744073709551617 0x10000000000000003",
            TokenBuffer::with_capacity_records(2),
            quiet(),
        );

        assert_matches!(ctx.scan(), Ok(ScanOutcome::Complete));
        assert_eq!(
            values(ctx.records()),
            [TokenValue::U64(1), TokenValue::U64(3)]
        );
        assert_eq!(ctx.metrics().wrapped_literals, 2);
    }

    #[cfg(feature = "track-line-column")]
    #[test]
    fn test_line_and_column_tracking() {
        let records = tokenize("a\nb").unwrap();
        let b = &records.records()[1];
        assert_eq!((b.line(), b.column()), (2, 1));

        let records = tokenize("\tx /* \n */ y").unwrap();
        let x = &records.records()[0];
        let y = &records.records()[1];
        assert_eq!(x.column(), 1 + crate::config::compile_time::lexer::TAB_WIDTH);
        assert_eq!((y.line(), y.column()), (2, 5));
    }

    #[cfg(not(feature = "track-line-column"))]
    #[test]
    fn test_line_and_column_untracked() {
        let records = tokenize("a\nb").unwrap();
        assert_eq!(records.records()[1].line(), crate::utils::LINE_COLUMN_UNTRACKED);
    }

    #[test]
    fn test_token_counts() {
        let records = tokenize("if (a) { return 'x' + 1; }").unwrap();
        let counts = token_counts(&records);

        assert_eq!(counts.total, 11);
        assert_eq!(counts.keywords, 2);
        assert_eq!(counts.identifiers, 1);
        assert_eq!(counts.strings, 1);
        assert_eq!(counts.numbers, 1);
        assert_eq!(counts.brackets, 4);
        assert_eq!(counts.symbols, 2);
        assert!(counts.has_content());
    }

    #[test]
    fn test_validation_helpers() {
        assert!(init_lexical_analysis_logging().is_ok());
        assert!(validate_tokenization().is_ok());
    }

    #[test]
    fn test_errors_and_overflow_are_logged() {
        let memory = memory_logger();
        let preferences = LexicalPreferences {
            warn_on_numeric_overflow: true,
            ..quiet()
        };

        let source = "99999999999999999999999";
        tokenize_with_preferences(source, preferences.clone()).unwrap();
        let warned = memory
            .get_events_with_code(codes::warnings::NUMERIC_OVERFLOW)
            .into_iter()
            .any(|event| event.context.get("literal").map(String::as_str) == Some(source));
        assert!(warned);

        let error = tokenize_with_preferences("ok 'never closed", preferences).unwrap_err();
        let logged = memory
            .get_events_with_code(codes::lexical::INVALID_STRING_SYNTAX)
            .into_iter()
            .any(|event| event.message == error.to_string() && event.position == Some(error.position()));
        assert!(logged);
    }

    #[test]
    fn test_suspension_resumption_and_summary_are_logged() {
        let memory = memory_logger();
        let preferences = LexicalPreferences {
            log_scan_summary: true,
            log_suspensions: true,
            ..quiet()
        };

        let source = format!("{}first /*a*/ /*b*/ // c\nsecond", " ".repeat(41));
        let second = source.find("second").unwrap();
        let records = TokenBuffer::with_capacity_records(1);
        let mut ctx = ScanContext::with_preferences(source.as_str(), records, preferences);

        assert_matches!(ctx.scan(), Ok(ScanOutcome::BufferExhausted));
        let stride = crate::tokens::RECORD_STRIDE.to_string();
        let suspended = memory
            .get_events_with_code(codes::success::SCAN_SUSPENDED)
            .into_iter()
            .find(|event| event.context.get("offset") == Some(&second.to_string()))
            .unwrap();
        assert_eq!(suspended.level, LogLevel::Info);
        assert_eq!(suspended.context.get("write_offset"), Some(&stride));
        assert_eq!(suspended.context.get("capacity"), Some(&stride));

        ctx.records_mut().grow_to_records(2);
        assert_matches!(ctx.scan(), Ok(ScanOutcome::Complete));

        let resumed = memory.get_events().into_iter().any(|event| {
            event.level == LogLevel::Debug
                && event.message == "Scan resumed"
                && event.context.get("offset") == Some(&second.to_string())
                && event.context.get("records").map(String::as_str) == Some("1")
        });
        assert!(resumed);

        let summary = memory
            .get_events_with_code(codes::success::TOKENIZATION_COMPLETE)
            .into_iter()
            .find(|event| event.context.get("comments").map(String::as_str) == Some("3"))
            .unwrap();
        assert_eq!(summary.context.get("records").map(String::as_str), Some("2"));
        assert_eq!(summary.context.get("resumptions").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_error_logged_without_position() {
        let memory = memory_logger();
        let preferences = LexicalPreferences {
            include_position_in_errors: false,
            ..quiet()
        };

        let error = tokenize_with_preferences("    unlocated \u{7}", preferences).unwrap_err();
        assert_matches!(error, LexerError::NoLexMatch { byte: 0x07, .. });

        let event = memory
            .get_events_with_code(codes::lexical::NO_LEX_MATCH)
            .into_iter()
            .find(|event| event.message == error.to_string())
            .unwrap();
        assert_eq!(event.level, LogLevel::Error);
        assert_eq!(event.position, None);
        assert_eq!(event.context.get("records").map(String::as_str), Some("1"));
    }
}
