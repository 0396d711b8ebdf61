// SPDX-License-Identifier: Apache-2.0

//! Number conversion: the raw text of a JSON number plus its parsed value.
//!
//! Integer parsing is const and panic-free. Real parsing depends on the
//! `float`, `float-error` and `float-truncate` features.

use core::ops::Deref;
use core::str::FromStr;

use crate::ParseError;

/// The integer type selected by the `int32` / `int64` features.
#[cfg(feature = "int32")]
pub type ConfiguredInt = i32;
/// The integer type selected by the `int32` / `int64` features.
#[cfg(feature = "int64")]
pub type ConfiguredInt = i64;

/// Why a byte slice could not be turned into an integer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum IntError {
    Empty,
    SignOnly,
    InvalidDigit,
    Overflow,
}

/// Parses decimal ASCII into a [`ConfiguredInt`] in a `const` context.
///
/// Digits are accumulated with checked arithmetic. Negative numbers are built
/// downwards from zero so that `MIN` parses without overflow.
pub const fn parse_int(src: &[u8]) -> Result<ConfiguredInt, IntError> {
    let (is_negative, mut digits) = match src {
        [] => return Err(IntError::Empty),
        [b'+', rest @ ..] => (false, rest),
        [b'-', rest @ ..] => (true, rest),
        _ => (false, src),
    };
    if digits.is_empty() {
        return Err(IntError::SignOnly);
    }

    let mut result: ConfiguredInt = 0;
    while let Some((&byte, rest)) = digits.split_first() {
        let digit = match byte {
            b'0'..=b'9' => (byte - b'0') as ConfiguredInt,
            _ => return Err(IntError::InvalidDigit),
        };
        result = match result.checked_mul(10) {
            Some(val) => val,
            None => return Err(IntError::Overflow),
        };
        let next = if is_negative {
            result.checked_sub(digit)
        } else {
            result.checked_add(digit)
        };
        result = match next {
            Some(val) => val,
            None => return Err(IntError::Overflow),
        };
        digits = rest;
    }
    Ok(result)
}

/// The parsed value of a JSON number.
///
/// Which variants actually occur depends on the float features; the raw text
/// is always kept next to it so nothing is lost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberResult {
    /// Integer that fits in [`ConfiguredInt`].
    Integer(ConfiguredInt),
    /// Integer too large for [`ConfiguredInt`], or a real that is not finite.
    IntegerOverflow,
    /// Real value (feature `float`).
    Float(f64),
    /// Real number seen with float parsing compiled out.
    FloatDisabled,
    /// Real number cut down to its integer part (feature `float-truncate`).
    FloatTruncated(ConfiguredInt),
}

/// Parses an integer body into a [`NumberResult`].
pub const fn parse_integer(bytes: &[u8]) -> NumberResult {
    match parse_int(bytes) {
        Ok(val) => NumberResult::Integer(val),
        Err(_) => NumberResult::IntegerOverflow,
    }
}

#[cfg(feature = "float")]
fn parse_real(bytes: &[u8]) -> Result<NumberResult, ParseError> {
    let text = core::str::from_utf8(bytes)?;
    Ok(match f64::from_str(text) {
        Ok(val) if val.is_finite() => NumberResult::Float(val),
        _ => NumberResult::IntegerOverflow,
    })
}

#[cfg(all(not(feature = "float"), feature = "float-error"))]
fn parse_real(_bytes: &[u8]) -> Result<NumberResult, ParseError> {
    Err(ParseError::FloatNotAllowed)
}

#[cfg(all(not(feature = "float"), feature = "float-truncate"))]
fn parse_real(bytes: &[u8]) -> Result<NumberResult, ParseError> {
    // Exponents would need float math to evaluate.
    if bytes.iter().any(|b| matches!(b, b'e' | b'E')) {
        return Ok(NumberResult::FloatDisabled);
    }
    let int_part = match bytes.iter().position(|&b| b == b'.') {
        Some(dot) => bytes.get(..dot).unwrap_or(bytes),
        None => bytes,
    };
    Ok(match parse_int(int_part) {
        Ok(val) => NumberResult::FloatTruncated(val),
        Err(_) => NumberResult::IntegerOverflow,
    })
}

#[cfg(not(any(feature = "float", feature = "float-error", feature = "float-truncate")))]
fn parse_real(_bytes: &[u8]) -> Result<NumberResult, ParseError> {
    Ok(NumberResult::FloatDisabled)
}

/// Converts a number body that already passed the grammar scan.
///
/// `is_integer` comes from the scanner: true when there is neither a
/// fraction nor an exponent.
pub fn parse_number(bytes: &[u8], is_integer: bool) -> Result<NumberResult, ParseError> {
    if is_integer {
        Ok(parse_integer(bytes))
    } else {
        parse_real(bytes)
    }
}

/// A JSON number: its exact source text and the parsed value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsonNumber<'a> {
    raw: &'a str,
    parsed: NumberResult,
}

impl<'a> JsonNumber<'a> {
    pub const fn new(raw: &'a str, parsed: NumberResult) -> Self {
        Self { raw, parsed }
    }

    /// Builds a number from raw bytes, detecting integer vs. real by the
    /// presence of `.`, `e` or `E`.
    pub fn from_slice(bytes: &'a [u8]) -> Result<Self, ParseError> {
        let raw = core::str::from_utf8(bytes)?;
        let is_integer = !bytes.iter().any(|b| matches!(b, b'.' | b'e' | b'E'));
        Ok(Self::new(raw, parse_number(bytes, is_integer)?))
    }

    pub fn parsed(&self) -> &NumberResult {
        &self.parsed
    }

    /// The value as [`ConfiguredInt`] if it is an integer that fits.
    pub fn as_int(&self) -> Option<ConfiguredInt> {
        match self.parsed {
            NumberResult::Integer(val) => Some(val),
            #[cfg(feature = "float-truncate")]
            NumberResult::FloatTruncated(val) => Some(val),
            _ => None,
        }
    }

    /// The value as `f64`. Integers are converted; overflowed ones are `None`.
    #[cfg(feature = "float")]
    pub fn as_f64(&self) -> Option<f64> {
        match self.parsed {
            NumberResult::Float(val) => Some(val),
            NumberResult::Integer(val) => Some(val as f64),
            _ => None,
        }
    }

    /// The exact source text.
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Parses the source text as any `FromStr` type.
    pub fn parse<T: FromStr>(&self) -> Result<T, T::Err> {
        T::from_str(self.raw)
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self.parsed,
            NumberResult::Integer(_) | NumberResult::IntegerOverflow
        ) && !self.raw.contains(['.', 'e', 'E'])
    }

    pub fn is_float(&self) -> bool {
        !self.is_integer()
    }
}

impl AsRef<str> for JsonNumber<'_> {
    fn as_ref(&self) -> &str {
        self.raw
    }
}

impl Deref for JsonNumber<'_> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.raw
    }
}

impl core::fmt::Display for JsonNumber<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.parsed {
            NumberResult::Integer(val) => write!(f, "{val}"),
            NumberResult::Float(val) => write!(f, "{val}"),
            NumberResult::FloatTruncated(val) => write!(f, "{val}"),
            // Overflowed or unparsed values keep full precision this way
            NumberResult::IntegerOverflow | NumberResult::FloatDisabled => f.write_str(self.raw),
        }
    }
}
