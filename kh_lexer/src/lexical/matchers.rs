//! Lexeme matchers
//!
//! Each matcher looks at the cursor of a [`ScanContext`] and either passes,
//! consumes one lexeme, or aborts the scan. A matcher measures its lexeme on
//! a local cursor first and touches the context only once it commits, so a
//! suspension on exhausted storage leaves the context exactly as it was.

use super::analyzer::LexerError;
use super::context::ScanContext;
use crate::grammar::symbols;
use crate::grammar::Keyword;
use crate::logging::codes;
use crate::tokens::{ArenaExhausted, TokenValue};
use crate::utils::{utf8, Position, SourceSlice};

/// A matcher that did not abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lexed {
    /// A lexeme was consumed
    Matched,
    /// The cursor is not on this matcher's kind of lexeme
    Pass,
}

/// Why a matcher stopped the scan.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Abort {
    /// The record did not fit; resumable
    Exhausted(ArenaExhausted),
    Fatal(LexerError),
}

impl From<ArenaExhausted> for Abort {
    fn from(exhausted: ArenaExhausted) -> Self {
        Abort::Exhausted(exhausted)
    }
}

impl From<LexerError> for Abort {
    fn from(error: LexerError) -> Self {
        Abort::Fatal(error)
    }
}

pub(crate) type MatchResult = Result<Lexed, Abort>;

pub(crate) type Matcher = fn(&mut ScanContext<'_>) -> MatchResult;

/// Matchers in priority order. Keywords are tried before identifiers and
/// whitespace/comments before everything that produces a record.
pub(crate) const MATCHERS: [(&str, Matcher); 7] = [
    ("whitespace", lex_whitespace),
    ("comment", lex_comment),
    ("symbol", lex_symbol),
    ("string", lex_string),
    ("keyword", lex_keyword),
    ("identifier", lex_identifier),
    ("number", lex_number),
];

fn tail(source: &[u8], offset: usize) -> &[u8] {
    source.get(offset..).unwrap_or_default()
}

/// Step the cursor over one character of skipped or quoted text.
fn step_char(source: &[u8], cursor: Position) -> Result<Position, LexerError> {
    let rest = tail(source, cursor.offset);
    match rest.first() {
        Some(&byte) if symbols::is_whitespace(byte) => Ok(cursor.advance_whitespace(byte)),
        _ => match utf8::decode_char(rest) {
            Some((_, len)) => Ok(cursor.advance_char(len)),
            None => Err(LexerError::InvalidUtf8 { at: cursor }),
        },
    }
}

fn continues_identifier(bytes: &[u8]) -> bool {
    utf8::decode_char(bytes).is_some_and(|(ch, _)| symbols::is_identifier_continue(ch))
}

pub(crate) fn lex_whitespace(ctx: &mut ScanContext<'_>) -> MatchResult {
    match ctx.byte_at(0) {
        Some(byte) if symbols::is_whitespace(byte) => {
            ctx.metrics.record_whitespace();
            let end = ctx.position.advance_whitespace(byte);
            ctx.skip_to(end)
        }
        _ => Ok(Lexed::Pass),
    }
}

/// `// ...` up to (not including) the newline, or a nesting `/* ... */`.
pub(crate) fn lex_comment(ctx: &mut ScanContext<'_>) -> MatchResult {
    let start = ctx.position;
    let end = match (ctx.byte_at(0), ctx.byte_at(1)) {
        (Some(b'/'), Some(b'/')) => skip_line_comment(ctx.source, start.advance_ascii(2))?,
        (Some(b'/'), Some(b'*')) => skip_block_comment(ctx.source, start)?,
        _ => return Ok(Lexed::Pass),
    };
    ctx.metrics.record_comment();
    ctx.skip_to(end)
}

fn skip_line_comment(source: &[u8], mut cursor: Position) -> Result<Position, LexerError> {
    while let Some(&byte) = source.get(cursor.offset) {
        if byte == b'\n' {
            break;
        }
        cursor = step_char(source, cursor)?;
    }
    Ok(cursor)
}

fn skip_block_comment(source: &[u8], start: Position) -> Result<Position, LexerError> {
    let mut cursor = start.advance_ascii(2);
    let mut depth = 1usize;

    loop {
        match (source.get(cursor.offset), source.get(cursor.offset + 1)) {
            (None, _) => return Err(LexerError::UnterminatedComment { at: start }),
            (Some(b'*'), Some(b'/')) => {
                cursor = cursor.advance_ascii(2);
                depth -= 1;
                if depth == 0 {
                    return Ok(cursor);
                }
            }
            (Some(b'/'), Some(b'*')) => {
                cursor = cursor.advance_ascii(2);
                depth += 1;
            }
            _ => cursor = step_char(source, cursor)?,
        }
    }
}

pub(crate) fn lex_symbol(ctx: &mut ScanContext<'_>) -> MatchResult {
    match ctx.byte_at(0) {
        Some(byte) if symbols::is_char_symbol(byte) || symbols::is_bracket(byte) => {
            let end = ctx.position.advance_ascii(1);
            ctx.emit(TokenValue::CharSymbol(char::from(byte)), end)
        }
        _ => Ok(Lexed::Pass),
    }
}

/// A quoted string. The record's slice covers both delimiters; escapes are
/// left undecoded. A delimiter closes the string unless it follows an odd
/// run of backslashes.
pub(crate) fn lex_string(ctx: &mut ScanContext<'_>) -> MatchResult {
    let Some(delimiter) = ctx.byte_at(0).filter(|&b| symbols::is_string_delimiter(b)) else {
        return Ok(Lexed::Pass);
    };
    let source = ctx.source;
    let start = ctx.position;
    let mut cursor = start.advance_ascii(1);
    let mut backslashes = 0usize;

    loop {
        let Some(&byte) = source.get(cursor.offset) else {
            return Err(LexerError::InvalidStringSyntax { at: start }.into());
        };
        if byte == delimiter && backslashes.is_multiple_of(2) {
            cursor = cursor.advance_ascii(1);
            break;
        }
        backslashes = if byte == b'\\' { backslashes + 1 } else { 0 };
        cursor = step_char(source, cursor)?;
    }

    ctx.emit(TokenValue::String(SourceSlice::between(start, cursor)), cursor)
}

/// A reserved word not immediately followed by an identifier character.
pub(crate) fn lex_keyword(ctx: &mut ScanContext<'_>) -> MatchResult {
    let rest = ctx.rest();
    for keyword in Keyword::ALL {
        let text = keyword.as_str().as_bytes();
        if rest.starts_with(text) && !continues_identifier(tail(rest, text.len())) {
            let end = ctx.position.advance_ascii(text.len());
            return ctx.emit(TokenValue::Keyword(keyword), end);
        }
    }
    Ok(Lexed::Pass)
}

pub(crate) fn lex_identifier(ctx: &mut ScanContext<'_>) -> MatchResult {
    let source = ctx.source;
    let start = ctx.position;
    let mut cursor = match utf8::decode_char(ctx.rest()) {
        Some((ch, len)) if symbols::is_identifier_start(ch) => start.advance_char(len),
        _ => return Ok(Lexed::Pass),
    };

    while let Some((ch, len)) = utf8::decode_char(tail(source, cursor.offset)) {
        if !symbols::is_identifier_continue(ch) {
            break;
        }
        cursor = cursor.advance_char(len);
    }

    ctx.emit(TokenValue::Identifier(SourceSlice::between(start, cursor)), cursor)
}

/// Unsigned integers: `0x`/`0X` hexadecimal or plain decimal. Values wider
/// than 64 bits wrap.
pub(crate) fn lex_number(ctx: &mut ScanContext<'_>) -> MatchResult {
    let rest = ctx.rest();
    let start = ctx.position;

    let literal = match rest {
        [b'0', b'x' | b'X', nibble, ..] if nibble.is_ascii_hexdigit() => scan_hex(rest),
        [lead, ..] if lead.is_ascii_hexdigit() => match scan_decimal(rest) {
            Some(literal) => literal,
            None => return Ok(Lexed::Pass),
        },
        _ => return Ok(Lexed::Pass),
    };

    ctx.emit(TokenValue::U64(literal.value), start.advance_ascii(literal.len))?;

    if literal.wrapped {
        ctx.metrics.record_wrapped_literal();
        if ctx.preferences.warn_on_numeric_overflow {
            let text = String::from_utf8_lossy(&rest[..literal.len]);
            crate::log_warning!(
                codes::warnings::NUMERIC_OVERFLOW,
                "Integer literal exceeds 64 bits; value wrapped",
                at = start,
                "literal" => text,
                "value" => literal.value
            );
        }
    }
    Ok(Lexed::Matched)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IntegerLiteral {
    value: u64,
    /// Bytes consumed, prefix included
    len: usize,
    wrapped: bool,
}

/// Caller guarantees `rest` starts with `0x` and a hex digit.
fn scan_hex(rest: &[u8]) -> IntegerLiteral {
    let mut literal = IntegerLiteral {
        value: 0,
        len: 2,
        wrapped: false,
    };
    while let Some(nibble) = rest
        .get(literal.len)
        .and_then(|&byte| char::from(byte).to_digit(16))
    {
        literal.wrapped |= literal.value >> 60 != 0;
        literal.value = (literal.value << 4) | u64::from(nibble);
        literal.len += 1;
    }
    literal
}

/// `None` when `rest` does not start with a decimal digit.
fn scan_decimal(rest: &[u8]) -> Option<IntegerLiteral> {
    let digits = rest.iter().take_while(|byte| byte.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }

    let mut wrapped = false;
    let value = rest[..digits].iter().fold(0u64, |acc, &byte| {
        let digit = u64::from(byte - b'0');
        acc.checked_mul(10)
            .and_then(|v| v.checked_add(digit))
            .unwrap_or_else(|| {
                wrapped = true;
                acc.wrapping_mul(10).wrapping_add(digit)
            })
    });

    Some(IntegerLiteral {
        value,
        len: digits,
        wrapped,
    })
}
