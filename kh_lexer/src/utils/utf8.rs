//! UTF-8 sequence inspection over raw source bytes.

/// Byte length of the UTF-8 sequence introduced by `lead`, or `None` when
/// `lead` cannot start a sequence (continuation bytes, `0xC0`/`0xC1`,
/// `0xF5..=0xFF`).
pub const fn sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

/// Decode the character at the start of `bytes`.
///
/// The whole sequence is validated: truncated input, bad continuation
/// bytes, overlong forms and surrogates all yield `None`.
pub fn decode_char(bytes: &[u8]) -> Option<(char, usize)> {
    let len = sequence_len(*bytes.first()?)?;
    let sequence = bytes.get(..len)?;
    let ch = std::str::from_utf8(sequence).ok()?.chars().next()?;
    Some((ch, len))
}

/// Whether `bytes` starts with a complete, valid UTF-8 sequence.
pub fn starts_with_valid_sequence(bytes: &[u8]) -> bool {
    decode_char(bytes).is_some()
}
