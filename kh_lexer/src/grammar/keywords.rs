//! Reserved words of the khuneo language.
//!
//! [`Keyword::ALL`] is also the matching order used by the lexer: the first
//! entry whose text prefixes the input, and is not followed by an identifier
//! character, wins. `def` precedes `defer`, which is safe because the
//! boundary check rejects `def` inside `defer`.
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    // === DECLARATIONS ===
    Def,
    As,
    Import,
    Export,

    // === CONTROL FLOW ===
    If,
    Else,
    Iter,
    Defer,
    Break,
    Continue,
    Return,

    // === LITERAL VALUES ===
    True,
    False,
    Nil,
    Undefined,
}

impl Keyword {
    /// Keywords in matching (and id) order.
    pub const ALL: [Keyword; 15] = [
        Self::Def,
        Self::As,
        Self::Import,
        Self::Export,
        Self::If,
        Self::Else,
        Self::Iter,
        Self::Defer,
        Self::Break,
        Self::Continue,
        Self::Return,
        Self::True,
        Self::False,
        Self::Nil,
        Self::Undefined,
    ];

    /// Get the exact string representation as it appears in source
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Def => "def",
            Self::As => "as",
            Self::Import => "import",
            Self::Export => "export",
            Self::If => "if",
            Self::Else => "else",
            Self::Iter => "iter",
            Self::Defer => "defer",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Return => "return",
            Self::True => "true",
            Self::False => "false",
            Self::Nil => "nil",
            Self::Undefined => "undefined",
        }
    }

    /// Stable numeric id: position in [`Keyword::ALL`] plus one. Zero is
    /// never a keyword.
    pub const fn id(self) -> u32 {
        self as u32 + 1
    }

    pub fn from_id(id: u32) -> Option<Self> {
        let index = id.checked_sub(1)? as usize;
        Self::ALL.get(index).copied()
    }

    /// Keywords that denote a literal value rather than a construct
    pub const fn is_literal(self) -> bool {
        matches!(self, Self::True | Self::False | Self::Nil | Self::Undefined)
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a reserved keyword")]
pub struct UnknownKeyword(pub String);

impl FromStr for Keyword {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kw| kw.as_str() == s)
            .ok_or_else(|| UnknownKeyword(s.to_string()))
    }
}

pub fn is_reserved_keyword(s: &str) -> bool {
    s.parse::<Keyword>().is_ok()
}
