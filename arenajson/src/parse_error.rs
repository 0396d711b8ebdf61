// SPDX-License-Identifier: Apache-2.0

use crate::lexer;

/// Errors reported by the DOM builder, the stream parser and the accessors
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ParseError {
    /// Empty input or a zero-capacity token store.
    InvalidArgument,
    /// The input violates the JSON grammar.
    Syntax(lexer::Error),
    /// A string or number slice was not valid UTF-8.
    InvalidUtf8(core::str::Utf8Error),
    /// Real number encountered while `float-error` is configured.
    FloatNotAllowed,
    /// The token store ran out of slots.
    TokensExhausted,
    /// Nesting exceeded the stream parser's stack depth.
    MaxDepthReached,
    /// A primitive or member name did not fit the staging buffer.
    ScratchBufferFull,
    /// The stream parser already finished or failed; it must be reset.
    StreamFinished,
}

impl ParseError {
    /// True for errors caused by the input itself, including reals rejected by
    /// `float-error`.
    pub fn is_syntax(&self) -> bool {
        matches!(self, ParseError::Syntax(_) | ParseError::FloatNotAllowed)
    }

    /// True for the errors caused by a fixed capacity rather than the input.
    pub fn is_exhausted(&self) -> bool {
        matches!(
            self,
            ParseError::TokensExhausted
                | ParseError::MaxDepthReached
                | ParseError::ScratchBufferFull
        )
    }
}

impl From<lexer::Error> for ParseError {
    fn from(err: lexer::Error) -> Self {
        ParseError::Syntax(err)
    }
}

impl From<core::str::Utf8Error> for ParseError {
    fn from(err: core::str::Utf8Error) -> Self {
        ParseError::InvalidUtf8(err)
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::Syntax(e) => write!(f, "Syntax error: {e}"),
            ParseError::InvalidUtf8(e) => write!(f, "Invalid UTF-8: {e}"),
            _ => write!(f, "{self:?}"),
        }
    }
}
