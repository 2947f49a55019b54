//! Punctuation, bracket and string delimiter tables.

/// Single-character punctuation symbols.
pub const CHAR_SYMBOLS: [u8; 16] = [
    b';', b'.', b'+', b'-', b'*', b'/', b'#', b'\\', b'|', b'&', b'=', b'@', b'!', b':', b'?',
    b',',
];

/// Opening and closing members of each bracket pair.
pub const BRACKET_PAIRS: [(u8, u8); 4] = [(b'(', b')'), (b'{', b'}'), (b'[', b']'), (b'<', b'>')];

/// Characters that open (and close) a quoted string.
pub const STRING_DELIMITERS: [u8; 3] = [b'\'', b'`', b'"'];

/// Bytes consumed by the whitespace matcher.
pub const WHITESPACE: [u8; 4] = [b' ', b'\r', b'\n', b'\t'];

pub fn is_char_symbol(byte: u8) -> bool {
    CHAR_SYMBOLS.contains(&byte)
}

pub fn is_bracket(byte: u8) -> bool {
    BRACKET_PAIRS
        .iter()
        .any(|&(open, close)| byte == open || byte == close)
}

pub fn is_string_delimiter(byte: u8) -> bool {
    STRING_DELIMITERS.contains(&byte)
}

pub fn is_whitespace(byte: u8) -> bool {
    WHITESPACE.contains(&byte)
}

/// Matching closer for an opening bracket
pub fn closing_bracket(open: u8) -> Option<u8> {
    BRACKET_PAIRS
        .iter()
        .find(|&&(o, _)| o == open)
        .map(|&(_, close)| close)
}

/// First character of an identifier
pub fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

/// Any later character of an identifier
pub fn is_identifier_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_classes_are_disjoint() {
        for byte in 0u8..=0x7F {
            let classes = [
                is_char_symbol(byte),
                is_bracket(byte),
                is_string_delimiter(byte),
                is_whitespace(byte),
            ];
            assert!(classes.iter().filter(|&&c| c).count() <= 1, "byte {byte:#04x}");
        }
    }

    #[test]
    fn test_brackets() {
        assert!(is_bracket(b'<'));
        assert!(is_bracket(b'}'));
        assert_eq!(closing_bracket(b'['), Some(b']'));
        assert_eq!(closing_bracket(b')'), None);
    }

    #[test]
    fn test_identifier_classes() {
        assert!(is_identifier_start('$'));
        assert!(is_identifier_start('λ'));
        assert!(!is_identifier_start('9'));
        assert!(is_identifier_continue('9'));
        assert!(!is_identifier_continue('-'));
    }
}
