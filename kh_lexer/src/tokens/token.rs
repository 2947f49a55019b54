//! Token records produced by the lexer
//!
//! Each record is a sum-type payload plus, when `track-line-column` is
//! enabled, the line and column of the lexeme's first character.
use crate::grammar::keywords::Keyword;
use crate::utils::{Position, SourceSlice, LINE_COLUMN_UNTRACKED};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token kind discriminant, for callers that only need to branch on kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Identifier,
    Keyword,
    String,
    CharSymbol,
    U64,
    F64,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Keyword => "keyword",
            Self::String => "string",
            Self::CharSymbol => "charsym",
            Self::U64 => "u64",
            Self::F64 => "f64",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-dependent payload of a token
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TokenValue {
    /// Identifier text, referenced in the source
    Identifier(SourceSlice),
    /// Reserved word
    Keyword(Keyword),
    /// Quoted string including both delimiters, referenced in the source
    String(SourceSlice),
    /// Punctuation or bracket
    CharSymbol(char),
    /// Integer literal
    U64(u64),
    /// Floating-point literal. Part of the token model; not produced yet.
    F64(f64),
}

impl TokenValue {
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Identifier(_) => TokenKind::Identifier,
            Self::Keyword(_) => TokenKind::Keyword,
            Self::String(_) => TokenKind::String,
            Self::CharSymbol(_) => TokenKind::CharSymbol,
            Self::U64(_) => TokenKind::U64,
            Self::F64(_) => TokenKind::F64,
        }
    }
}

/// One committed lexeme
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    value: TokenValue,
    #[cfg(feature = "track-line-column")]
    line: u32,
    #[cfg(feature = "track-line-column")]
    column: u32,
}

impl TokenRecord {
    /// Create a record for a lexeme starting at `start`
    pub fn new(value: TokenValue, start: Position) -> Self {
        #[cfg(not(feature = "track-line-column"))]
        let _ = start;
        Self {
            value,
            #[cfg(feature = "track-line-column")]
            line: start.line(),
            #[cfg(feature = "track-line-column")]
            column: start.column(),
        }
    }

    pub fn value(&self) -> &TokenValue {
        &self.value
    }

    pub fn kind(&self) -> TokenKind {
        self.value.kind()
    }

    /// 1-based start line, or [`LINE_COLUMN_UNTRACKED`]
    pub fn line(&self) -> u32 {
        #[cfg(feature = "track-line-column")]
        {
            self.line
        }
        #[cfg(not(feature = "track-line-column"))]
        {
            LINE_COLUMN_UNTRACKED
        }
    }

    /// 1-based start column, or [`LINE_COLUMN_UNTRACKED`]
    pub fn column(&self) -> u32 {
        #[cfg(feature = "track-line-column")]
        {
            self.column
        }
        #[cfg(not(feature = "track-line-column"))]
        {
            LINE_COLUMN_UNTRACKED
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.value {
            TokenValue::U64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            TokenValue::F64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_char_symbol(&self) -> Option<char> {
        match self.value {
            TokenValue::CharSymbol(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> Option<Keyword> {
        match self.value {
            TokenValue::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    /// Source slice of an identifier or string record
    pub fn slice(&self) -> Option<SourceSlice> {
        match self.value {
            TokenValue::Identifier(slice) | TokenValue::String(slice) => Some(slice),
            _ => None,
        }
    }

    /// Source text of an identifier or string record
    pub fn text<'a>(&self, source: &'a str) -> Option<&'a str> {
        self.slice().and_then(|slice| slice.text(source))
    }

    /// Check if token is a specific keyword
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.as_keyword() == Some(keyword)
    }

    /// Check if token is a specific punctuation character
    pub fn is_symbol(&self, symbol: char) -> bool {
        self.as_char_symbol() == Some(symbol)
    }
}

impl fmt::Display for TokenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            TokenValue::Identifier(s) => write!(f, "identifier[{}..{}]", s.offset, s.end()),
            TokenValue::String(s) => write!(f, "string[{}..{}]", s.offset, s.end()),
            TokenValue::Keyword(kw) => write!(f, "keyword '{}'", kw),
            TokenValue::CharSymbol(c) => write!(f, "'{}'", c),
            TokenValue::U64(v) => write!(f, "u64 {}", v),
            TokenValue::F64(v) => write!(f, "f64 {}", v),
        }?;
        if self.line() != LINE_COLUMN_UNTRACKED {
            write!(f, " at {}:{}", self.line(), self.column())?;
        }
        Ok(())
    }
}
