//! Source location tracking for the lexer
//!
//! [`Position`] is the scan cursor: a byte offset into the source plus, when
//! the `track-line-column` feature is enabled, the 1-based line and column.
//! With the feature disabled the line/column fields do not exist at all and
//! every accessor reports [`LINE_COLUMN_UNTRACKED`].
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value reported by line/column accessors when tracking is compiled out.
pub const LINE_COLUMN_UNTRACKED: u32 = u32::MAX;

#[cfg(feature = "track-line-column")]
const TAB_WIDTH: u32 = crate::config::compile_time::lexer::TAB_WIDTH;

/// A position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    #[cfg(feature = "track-line-column")]
    line: u32,
    /// Column number (1-based)
    #[cfg(feature = "track-line-column")]
    column: u32,
}

impl Position {
    /// Create the starting position (offset 0, line 1, column 1)
    pub const fn start() -> Self {
        Self {
            offset: 0,
            #[cfg(feature = "track-line-column")]
            line: 1,
            #[cfg(feature = "track-line-column")]
            column: 1,
        }
    }

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

    /// Advance past one whitespace byte (`' '`, `'\t'`, `'\r'` or `'\n'`).
    ///
    /// Tabs count as a fixed number of columns, carriage return rewinds the
    /// column without starting a new line.
    pub fn advance_whitespace(self, byte: u8) -> Self {
        #[cfg(feature = "track-line-column")]
        {
            let (line, column) = match byte {
                b'\n' => (self.line + 1, 1),
                b'\r' => (self.line, 1),
                b'\t' => (self.line, self.column + TAB_WIDTH),
                _ => (self.line, self.column + 1),
            };
            Self {
                offset: self.offset + 1,
                line,
                column,
            }
        }
        #[cfg(not(feature = "track-line-column"))]
        {
            let _ = byte;
            Self {
                offset: self.offset + 1,
            }
        }
    }

    /// Advance past one character encoded in `len` bytes. Counts as a
    /// single column regardless of its byte length.
    pub fn advance_char(self, len: usize) -> Self {
        Self {
            offset: self.offset + len,
            #[cfg(feature = "track-line-column")]
            line: self.line,
            #[cfg(feature = "track-line-column")]
            column: self.column + 1,
        }
    }

    /// Advance position by n bytes of known ASCII text
    pub fn advance_ascii(self, n: usize) -> Self {
        Self {
            offset: self.offset + n,
            #[cfg(feature = "track-line-column")]
            line: self.line,
            #[cfg(feature = "track-line-column")]
            column: self.column + n as u32,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[cfg(feature = "track-line-column")]
        {
            write!(f, "{}:{} (byte {})", self.line, self.column, self.offset)
        }
        #[cfg(not(feature = "track-line-column"))]
        {
            write!(f, "byte {}", self.offset)
        }
    }
}

/// An `(offset, len)` reference into the source bytes. No text is copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceSlice {
    pub offset: usize,
    pub len: usize,
}

impl SourceSlice {
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Slice covering `start..end`.
    pub fn between(start: Position, end: Position) -> Self {
        debug_assert!(start.offset <= end.offset, "slice start must not be after end");
        Self {
            offset: start.offset,
            len: end.offset - start.offset,
        }
    }

    /// Exclusive end offset
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the bytes this slice refers to, if it lies within `source`.
    pub fn resolve<'a>(&self, source: &'a [u8]) -> Option<&'a [u8]> {
        source.get(self.offset..self.end())
    }

    /// Get the source text for this slice
    pub fn text<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.offset..self.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_start() {
        let pos = Position::start();
        assert_eq!(pos.offset, 0);
        assert_eq!(pos, Position::default());
    }

    #[test]
    fn test_ascii_and_char_advance_offsets() {
        let pos = Position::start().advance_ascii(3).advance_char(4);
        assert_eq!(pos.offset, 7);
    }

    #[cfg(feature = "track-line-column")]
    #[test]
    fn test_whitespace_bookkeeping() {
        let pos = Position::start().advance_ascii(2);
        assert_eq!((pos.line(), pos.column()), (1, 3));

        let tab = pos.advance_whitespace(b'\t');
        assert_eq!(tab.column(), 3 + TAB_WIDTH);

        let cr = tab.advance_whitespace(b'\r');
        assert_eq!((cr.line(), cr.column()), (1, 1));

        let nl = cr.advance_whitespace(b'\n');
        assert_eq!((nl.line(), nl.column()), (2, 1));
        assert_eq!(nl.offset, 5);
    }

    #[cfg(feature = "track-line-column")]
    #[test]
    fn test_multibyte_char_is_one_column() {
        let pos = Position::start().advance_char(3);
        assert_eq!(pos.column(), 2);
        assert_eq!(pos.offset, 3);
    }

    #[cfg(not(feature = "track-line-column"))]
    #[test]
    fn test_untracked_sentinel() {
        let pos = Position::start().advance_whitespace(b'\n');
        assert_eq!(pos.line(), LINE_COLUMN_UNTRACKED);
        assert_eq!(pos.column(), LINE_COLUMN_UNTRACKED);
    }

    #[test]
    fn test_slice_resolution() {
        let source = "let name";
        let slice = SourceSlice::new(4, 4);
        assert_eq!(slice.text(source), Some("name"));
        assert_eq!(slice.end(), 8);
        assert!(SourceSlice::new(6, 10).resolve(source.as_bytes()).is_none());
    }
}
