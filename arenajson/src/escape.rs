// SPDX-License-Identifier: Apache-2.0

//! String escape helpers.
//!
//! The DOM builder only validates escapes (its strings stay raw); the stream
//! parser decodes them into its staging buffer.

use crate::lexer::ErrKind;

/// Decodes the character after a backslash for the single-byte escapes.
///
/// Returns `None` for `u` and anything that is not a valid escape.
pub const fn simple_escape(escape_char: u8) -> Option<u8> {
    match escape_char {
        b'"' => Some(b'"'),
        b'\\' => Some(b'\\'),
        b'/' => Some(b'/'),
        b'b' => Some(0x08),
        b'f' => Some(0x0C),
        b'n' => Some(b'\n'),
        b'r' => Some(b'\r'),
        b't' => Some(b'\t'),
        _ => None,
    }
}

/// Value of a single hex digit, case-insensitive.
pub const fn hex_value(byte: u8) -> Option<u32> {
    match byte {
        b'0'..=b'9' => Some((byte - b'0') as u32),
        b'a'..=b'f' => Some((byte - b'a' + 10) as u32),
        b'A'..=b'F' => Some((byte - b'A' + 10) as u32),
        _ => None,
    }
}

/// Check if a UTF-16 code unit is a high surrogate (0xD800-0xDBFF)
pub const fn is_high_surrogate(unit: u32) -> bool {
    matches!(unit, 0xD800..=0xDBFF)
}

/// Check if a UTF-16 code unit is a low surrogate (0xDC00-0xDFFF)
pub const fn is_low_surrogate(unit: u32) -> bool {
    matches!(unit, 0xDC00..=0xDFFF)
}

/// Outcome of feeding one completed `\uXXXX` code unit to [`decode_utf16_unit`].
#[derive(Debug, PartialEq)]
pub enum Utf16Step<'a> {
    /// A high surrogate was stored; the next escape must be its low half.
    AwaitLowSurrogate(u32),
    /// A full scalar value, UTF-8 encoded into the caller's buffer.
    Char(&'a [u8]),
}

/// Turns one UTF-16 code unit into UTF-8, pairing surrogates.
///
/// `pending_high` is the high surrogate left over from the previous escape, if
/// any. A high surrogate must be followed directly by a low one and a low
/// surrogate must never appear alone.
pub fn decode_utf16_unit(
    unit: u32,
    pending_high: Option<u32>,
    utf8_buffer: &mut [u8; 4],
) -> Result<Utf16Step<'_>, ErrKind> {
    let codepoint = match pending_high {
        Some(high) if is_low_surrogate(unit) => 0x10000 + ((high & 0x3FF) << 10) + (unit & 0x3FF),
        Some(_) => return Err(ErrKind::InvalidUnicodeCodepoint),
        None if is_high_surrogate(unit) => return Ok(Utf16Step::AwaitLowSurrogate(unit)),
        None if is_low_surrogate(unit) => return Err(ErrKind::InvalidUnicodeCodepoint),
        None => unit,
    };
    let ch = char::from_u32(codepoint).ok_or(ErrKind::InvalidUnicodeCodepoint)?;
    Ok(Utf16Step::Char(ch.encode_utf8(utf8_buffer).as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_simple_escapes() {
        assert_eq!(simple_escape(b'n'), Some(b'\n'));
        assert_eq!(simple_escape(b't'), Some(b'\t'));
        assert_eq!(simple_escape(b'r'), Some(b'\r'));
        assert_eq!(simple_escape(b'\\'), Some(b'\\'));
        assert_eq!(simple_escape(b'"'), Some(b'"'));
        assert_eq!(simple_escape(b'/'), Some(b'/'));
        assert_eq!(simple_escape(b'b'), Some(0x08));
        assert_eq!(simple_escape(b'f'), Some(0x0C));
        assert_eq!(simple_escape(b'u'), None);
        assert_eq!(simple_escape(b'a'), None);
    }

    #[test]
    fn test_hex_digit_validation() {
        assert_eq!(hex_value(b'0'), Some(0));
        assert_eq!(hex_value(b'9'), Some(9));
        assert_eq!(hex_value(b'a'), Some(10));
        assert_eq!(hex_value(b'F'), Some(15));
        assert_eq!(hex_value(b'g'), None);
        assert_eq!(hex_value(b' '), None);
    }

    #[test]
    fn test_decode_bmp() {
        let mut buf = [0u8; 4];
        assert_eq!(
            decode_utf16_unit(0x41, None, &mut buf),
            Ok(Utf16Step::Char(b"A"))
        );
        assert_eq!(
            decode_utf16_unit(0x03B1, None, &mut buf),
            Ok(Utf16Step::Char("α".as_bytes()))
        );
    }

    #[test]
    fn test_decode_surrogate_pair() {
        let mut buf = [0u8; 4];
        assert_eq!(
            decode_utf16_unit(0xD83D, None, &mut buf),
            Ok(Utf16Step::AwaitLowSurrogate(0xD83D))
        );
        assert_eq!(
            decode_utf16_unit(0xDE00, Some(0xD83D), &mut buf),
            Ok(Utf16Step::Char("😀".as_bytes()))
        );
    }

    #[test]
    fn test_decode_lone_surrogates() {
        let mut buf = [0u8; 4];
        assert_eq!(
            decode_utf16_unit(0xDE00, None, &mut buf),
            Err(ErrKind::InvalidUnicodeCodepoint)
        );
        assert_eq!(
            decode_utf16_unit(0x0041, Some(0xD83D), &mut buf),
            Err(ErrKind::InvalidUnicodeCodepoint)
        );
    }
}
