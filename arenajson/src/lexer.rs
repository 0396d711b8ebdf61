// SPDX-License-Identifier: Apache-2.0

//! Lexical primitives shared by the DOM builder and the stream parser.
//!
//! Everything here works on plain byte slices and positions. The DOM builder
//! calls these directly on the source text; the stream parser uses the
//! literal table and the number scanner on its staging buffer.

use crate::escape;

/// Category of a grammar violation.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ErrKind {
    /// Input held nothing but whitespace (or comments).
    EmptyStream,
    /// Input ended before the root value was complete.
    UnfinishedStream,
    /// The first significant byte cannot start a document.
    InvalidRoot,
    /// A misspelled `true`, `false` or `null`.
    InvalidToken,
    /// A raw byte below 0x20 inside a string.
    UnescapedControlCharacter,
    /// Non-whitespace content after the root value.
    ContentEnded,
    /// A number that does not follow the JSON number grammar.
    InvalidNumber,
    /// A `\u` escape with a non-hex digit.
    InvalidUnicodeEscape,
    /// A lone or mismatched UTF-16 surrogate (stream parser only).
    InvalidUnicodeCodepoint,
    /// A backslash followed by an unknown escape character.
    InvalidStringEscape,
    /// Expected a member name or `}`.
    ExpectedObjectKey,
    /// Expected a value after `:`.
    ExpectedObjectValue,
    /// Expected `:` after a member name.
    ExpectedColon,
    /// Expected a value or `]`.
    ExpectedArrayItem,
    /// Expected `,` or the closing bracket of the current container.
    ExpectedCommaOrEnd,
    /// A `/` where comments are not accepted.
    UnexpectedComment,
    /// A `/*` comment that never closes.
    UnterminatedComment,
}

/// A grammar error: what went wrong, on which byte, and where.
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct Error {
    kind: ErrKind,
    character: u8,
    position: usize,
}

impl Error {
    pub fn new<T>(kind: ErrKind, character: u8, position: usize) -> Result<T, Self> {
        Err(Self {
            kind,
            character,
            position,
        })
    }

    pub fn kind(&self) -> ErrKind {
        self.kind
    }

    /// The offending byte. End of input is reported as a space.
    pub fn character(&self) -> u8 {
        self.character
    }

    /// Byte offset of the offending byte.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:?}({}) at {}",
            self.kind, self.character as char, self.position
        )
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

/// The three keyword literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    True,
    False,
    Null,
}

impl Literal {
    pub const fn as_bytes(&self) -> &'static [u8] {
        match self {
            Literal::True => b"true",
            Literal::False => b"false",
            Literal::Null => b"null",
        }
    }

    /// Exact match of a complete primitive against the literal table.
    pub fn from_bytes(bytes: &[u8]) -> Option<Literal> {
        [Literal::True, Literal::False, Literal::Null]
            .into_iter()
            .find(|literal| literal.as_bytes() == bytes)
    }

    pub const fn from_first_byte(byte: u8) -> Option<Literal> {
        match byte {
            b't' => Some(Literal::True),
            b'f' => Some(Literal::False),
            b'n' => Some(Literal::Null),
            _ => None,
        }
    }
}

pub const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

pub const fn is_number_start(byte: u8) -> bool {
    matches!(byte, b'-' | b'0'..=b'9')
}

/// Byte at `pos`, with end of input mapped to an `UnfinishedStream` error.
fn byte_at(input: &[u8], pos: usize) -> Result<u8, Error> {
    match input.get(pos) {
        Some(&byte) => Ok(byte),
        None => Error::new(ErrKind::UnfinishedStream, b' ', pos),
    }
}

/// Skips whitespace, and `/* */` comments when the `comments` feature is on.
///
/// Returns the position of the next significant byte, which equals
/// `input.len()` when only insignificant bytes remain.
pub fn skip_insignificant(input: &[u8], mut pos: usize) -> Result<usize, Error> {
    while let Some(&byte) = input.get(pos) {
        if is_whitespace(byte) {
            pos += 1;
        } else if byte == b'/' {
            pos = skip_comment(input, pos)?;
        } else {
            break;
        }
    }
    Ok(pos)
}

#[cfg(feature = "comments")]
fn skip_comment(input: &[u8], start: usize) -> Result<usize, Error> {
    match input.get(start + 1) {
        Some(b'*') => {}
        Some(&other) => return Error::new(ErrKind::UnexpectedComment, other, start + 1),
        None => return Error::new(ErrKind::UnterminatedComment, b'/', start),
    }
    let body = start + 2;
    input
        .get(body..)
        .and_then(|rest| rest.windows(2).position(|pair| pair == b"*/"))
        .map(|offset| body + offset + 2)
        .map_or_else(
            || Error::new(ErrKind::UnterminatedComment, b'/', start),
            Ok,
        )
}

#[cfg(not(feature = "comments"))]
fn skip_comment(_input: &[u8], start: usize) -> Result<usize, Error> {
    Error::new(ErrKind::UnexpectedComment, b'/', start)
}

/// Matches `true`, `false` or `null` starting at `pos`.
///
/// Returns the literal and the position just past it.
pub fn scan_literal(input: &[u8], pos: usize) -> Result<(Literal, usize), Error> {
    let first = byte_at(input, pos)?;
    let Some(literal) = Literal::from_first_byte(first) else {
        return Error::new(ErrKind::InvalidToken, first, pos);
    };
    let expected = literal.as_bytes();
    for (offset, &want) in expected.iter().enumerate() {
        let at = pos + offset;
        let got = byte_at(input, at)?;
        if got != want {
            return Error::new(ErrKind::InvalidToken, got, at);
        }
    }
    Ok((literal, pos + expected.len()))
}

/// Result of scanning a number body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberScan {
    /// Position just past the last byte of the number.
    pub end: usize,
    /// True when there is neither a fraction nor an exponent.
    pub is_integer: bool,
}

/// Scans a JSON number starting at `pos`.
///
/// The scan stops at the first byte that cannot continue the number; the
/// caller decides whether that byte is an acceptable delimiter.
pub fn scan_number(input: &[u8], pos: usize) -> Result<NumberScan, Error> {
    let mut at = pos;
    if input.get(at) == Some(&b'-') {
        at += 1;
    }
    match byte_at(input, at)? {
        b'0' => {
            at += 1;
            if let Some(&digit @ b'0'..=b'9') = input.get(at) {
                return Error::new(ErrKind::InvalidNumber, digit, at);
            }
        }
        b'1'..=b'9' => at = skip_digits(input, at + 1),
        other => return Error::new(ErrKind::InvalidNumber, other, at),
    }

    let mut is_integer = true;
    if input.get(at) == Some(&b'.') {
        is_integer = false;
        at = require_digits(input, at + 1)?;
    }
    if let Some(b'e' | b'E') = input.get(at) {
        is_integer = false;
        at += 1;
        if let Some(b'+' | b'-') = input.get(at) {
            at += 1;
        }
        at = require_digits(input, at)?;
    }
    Ok(NumberScan { end: at, is_integer })
}

fn skip_digits(input: &[u8], mut pos: usize) -> usize {
    while let Some(b'0'..=b'9') = input.get(pos) {
        pos += 1;
    }
    pos
}

fn require_digits(input: &[u8], pos: usize) -> Result<usize, Error> {
    match byte_at(input, pos)? {
        b'0'..=b'9' => Ok(skip_digits(input, pos + 1)),
        other => Error::new(ErrKind::InvalidNumber, other, pos),
    }
}

/// Validates a string body that starts right after the opening quote.
///
/// Escapes are checked but not decoded. Returns the position of the closing
/// quote.
pub fn scan_string(input: &[u8], content_start: usize) -> Result<usize, Error> {
    let mut at = content_start;
    loop {
        match byte_at(input, at)? {
            b'"' => return Ok(at),
            b'\\' => {
                at += 1;
                let escaped = byte_at(input, at)?;
                if escaped == b'u' {
                    for hex_at in at + 1..at + 5 {
                        let digit = byte_at(input, hex_at)?;
                        if escape::hex_value(digit).is_none() {
                            return Error::new(ErrKind::InvalidUnicodeEscape, digit, hex_at);
                        }
                    }
                    at += 5;
                } else if escape::simple_escape(escaped).is_some() {
                    at += 1;
                } else {
                    return Error::new(ErrKind::InvalidStringEscape, escaped, at);
                }
            }
            control @ 0x00..=0x1F => {
                return Error::new(ErrKind::UnescapedControlCharacter, control, at)
            }
            _ => at += 1,
        }
    }
}
