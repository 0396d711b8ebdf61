// SPDX-License-Identifier: Apache-2.0

//! Fixed-footprint JSON parsing without a heap.
//!
//! Two independent front ends share one set of lexical rules:
//!
//! * [`Arena`] parses a whole document into caller-provided [`Token`] slots.
//!   The resulting [`Document`] is queried with dotted paths such as
//!   `"config.servers.#0.port"`.
//! * [`StreamParser`] is fed one byte at a time and reports events to a
//!   [`StreamHandler`], holding only a bounded stack and staging buffer.

#![cfg_attr(not(test), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Compile-time configuration validation
mod config_check;

mod escape;

pub mod lexer;
pub use lexer::{ErrKind, Error};

mod number;
pub use number::{ConfiguredInt, IntError, JsonNumber, NumberResult};

mod parse_error;
pub use parse_error::ParseError;

mod token;
pub use token::{FixedStore, Span, Token, TokenKind, TokenStore, TokenValue};

mod builder;
pub use builder::Arena;

mod document;
pub use document::{Children, Document, Node};

pub mod path;

mod stream_stack;
pub use stream_stack::{Frame, FrameKind, StreamView, MAX_KEY_LEN};

mod stream_parser;
pub use stream_parser::{StreamError, StreamEvent, StreamHandler, StreamParser, StreamStatus};
