// SPDX-License-Identifier: Apache-2.0

//! The arena and the iterative DOM builder that fills it.

use crate::document::Document;
use crate::lexer::{self, ErrKind, Error, Literal};
use crate::number::parse_number;
use crate::token::{FixedStore, Span, Token, TokenKind, TokenStore, TokenValue};
use crate::ParseError;

/// Owns a token store and parses documents into it.
///
/// An arena is reusable: every parse starts by clearing the store, so the
/// [`Document`] of the previous parse must be dropped first.
///
/// ```
/// use arenajson::{Arena, Token, TokenKind};
///
/// let mut slots = [Token::EMPTY; 8];
/// let mut arena = Arena::from_slice(&mut slots).unwrap();
/// let doc = arena.parse(br#"{"name":"value","list":[1,2]}"#).unwrap();
/// assert_eq!(doc.token_count(), 5);
/// assert_eq!(doc.find("list.#1").unwrap().as_int(), Some(2));
/// assert_eq!(doc.find("name").unwrap().kind(), TokenKind::String);
/// ```
pub struct Arena<S: TokenStore> {
    store: S,
}

impl<'t> Arena<FixedStore<'t>> {
    /// An arena over caller-owned token slots.
    pub fn from_slice(slots: &'t mut [Token]) -> Result<Self, ParseError> {
        Self::new(FixedStore::new(slots))
    }
}

impl<S: TokenStore> Arena<S> {
    /// Fails with [`ParseError::InvalidArgument`] if the store has no room.
    pub fn new(mut store: S) -> Result<Self, ParseError> {
        if store.capacity() == 0 {
            return Err(ParseError::InvalidArgument);
        }
        store.clear();
        Ok(Self { store })
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Parses one complete JSON document.
    pub fn parse<'d>(&'d mut self, text: &'d [u8]) -> Result<Document<'d>, ParseError> {
        self.parse_bounded(text, text.len())
    }

    /// Parses the first `len` bytes of `text` as one complete document.
    ///
    /// A `len` past the end of `text` is clamped.
    pub fn parse_bounded<'d>(
        &'d mut self,
        text: &'d [u8],
        len: usize,
    ) -> Result<Document<'d>, ParseError> {
        let text = text.get(..len).unwrap_or(text);
        self.store.clear();
        if text.is_empty() {
            return Err(ParseError::InvalidArgument);
        }
        log::debug!("Parsing {} bytes into {} slots", text.len(), self.capacity());

        let builder = Builder {
            store: &mut self.store,
            text,
            pos: 0,
            expect: Expect::Root,
            current: None,
            last_child: None,
            pending_name: None,
        };
        if let Err(err) = builder.run() {
            log::debug!("Parse failed: {err}");
            self.store.clear();
            return Err(err);
        }
        log::debug!("Parsed {} tokens", self.store.tokens().len());
        Ok(Document::new(self.store.tokens(), text))
    }

    /// Resets the arena. The caller's memory is untouched.
    pub fn free(&mut self) {
        self.store.clear();
    }

    /// Gives back the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }
}

/// What the grammar allows at the next significant byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Root,
    /// Member name or `}`.
    Key,
    Colon,
    /// Member value.
    Value,
    /// Array element or `]`.
    Item,
    CommaOrEnd,
    Finished,
}

/// Single-pass builder with constant auxiliary state.
///
/// While a container is open its `next` link holds the index of its parent
/// container. The link is taken back when the container closes, before any
/// sibling can be attached.
struct Builder<'a, S> {
    store: &'a mut S,
    text: &'a [u8],
    pos: usize,
    expect: Expect,
    /// Innermost open container.
    current: Option<usize>,
    /// Most recently completed child of `current`.
    last_child: Option<usize>,
    pending_name: Option<Span>,
}

impl<S: TokenStore> Builder<'_, S> {
    fn run(mut self) -> Result<(), ParseError> {
        loop {
            self.pos = lexer::skip_insignificant(self.text, self.pos)?;
            let Some(&byte) = self.text.get(self.pos) else {
                return match self.expect {
                    Expect::Finished => Ok(()),
                    Expect::Root => self.fail(ErrKind::EmptyStream, b' '),
                    _ => self.fail(ErrKind::UnfinishedStream, b' '),
                };
            };

            match (self.expect, byte) {
                (Expect::Finished, _) => return self.fail(ErrKind::ContentEnded, byte),
                (Expect::Key, b'"') => {
                    self.pending_name = Some(self.string_span()?);
                    self.expect = Expect::Colon;
                }
                (Expect::Key, b'}') | (Expect::Item, b']') => self.close(),
                (Expect::Key, _) => return self.fail(ErrKind::ExpectedObjectKey, byte),
                (Expect::Colon, b':') => {
                    self.pos += 1;
                    self.expect = Expect::Value;
                }
                (Expect::Colon, _) => return self.fail(ErrKind::ExpectedColon, byte),
                (Expect::CommaOrEnd, b',') => {
                    self.pos += 1;
                    self.expect = if self.in_object() {
                        Expect::Key
                    } else {
                        Expect::Item
                    };
                }
                (Expect::CommaOrEnd, b'}') if self.in_object() => self.close(),
                (Expect::CommaOrEnd, b']') if !self.in_object() => self.close(),
                (Expect::CommaOrEnd, _) => return self.fail(ErrKind::ExpectedCommaOrEnd, byte),
                (Expect::Root | Expect::Value | Expect::Item, _) => self.value(byte)?,
            }
        }
    }

    fn value(&mut self, byte: u8) -> Result<(), ParseError> {
        match byte {
            b'{' => self.open(TokenKind::Object, Expect::Key),
            b'[' => self.open(TokenKind::Array, Expect::Item),
            b'"' => {
                let span = self.string_span()?;
                self.add(TokenKind::String, TokenValue::String(span))?;
                self.value_done();
                Ok(())
            }
            b't' | b'f' | b'n' => {
                let (literal, end) = lexer::scan_literal(self.text, self.pos)?;
                let kind = match literal {
                    Literal::True => TokenKind::True,
                    Literal::False => TokenKind::False,
                    Literal::Null => TokenKind::Null,
                };
                self.pos = end;
                self.add(kind, TokenValue::None)?;
                self.value_done();
                Ok(())
            }
            b if lexer::is_number_start(b) => {
                let scan = lexer::scan_number(self.text, self.pos)?;
                let raw = Span::new(self.pos, scan.end - self.pos);
                let parsed = parse_number(raw.slice(self.text).unwrap_or(&[]), scan.is_integer)?;
                let kind = if scan.is_integer {
                    TokenKind::Integer
                } else {
                    TokenKind::Real
                };
                self.pos = scan.end;
                self.add(kind, TokenValue::Number { raw, parsed })?;
                self.value_done();
                Ok(())
            }
            _ => {
                let kind = match self.expect {
                    Expect::Root => ErrKind::InvalidRoot,
                    Expect::Value => ErrKind::ExpectedObjectValue,
                    _ => ErrKind::ExpectedArrayItem,
                };
                self.fail(kind, byte)
            }
        }
    }

    /// Allocates a token for the next value and links it into the tree.
    fn add(&mut self, kind: TokenKind, value: TokenValue) -> Result<usize, ParseError> {
        let token = Token::new(kind, self.pending_name.take(), value);
        let index = self
            .store
            .push(token)
            .ok_or(ParseError::TokensExhausted)?;
        log::trace!("Token {} {:?} at {}", index, kind, self.pos);

        match (self.last_child, self.current) {
            (Some(prev), _) => {
                if let Some(prev) = self.store.tokens_mut().get_mut(prev) {
                    prev.next = Some(index);
                }
            }
            (None, Some(parent)) => {
                if let Some(parent) = self.store.tokens_mut().get_mut(parent) {
                    parent.first_child = Some(index);
                }
            }
            (None, None) => {}
        }
        self.last_child = Some(index);
        Ok(index)
    }

    fn open(&mut self, kind: TokenKind, expect: Expect) -> Result<(), ParseError> {
        let index = self.add(kind, TokenValue::None)?;
        if let Some(token) = self.store.tokens_mut().get_mut(index) {
            token.next = self.current;
        }
        self.current = Some(index);
        self.last_child = None;
        self.pos += 1;
        self.expect = expect;
        Ok(())
    }

    fn close(&mut self) {
        self.pos += 1;
        let Some(closing) = self.current else {
            return;
        };
        let parent = self
            .store
            .tokens_mut()
            .get_mut(closing)
            .and_then(|token| token.next.take());
        log::trace!("Closed container {} at {}", closing, self.pos);
        self.current = parent;
        self.last_child = Some(closing);
        self.value_done();
    }

    fn value_done(&mut self) {
        self.expect = if self.current.is_some() {
            Expect::CommaOrEnd
        } else {
            Expect::Finished
        };
    }

    fn in_object(&self) -> bool {
        self.current
            .and_then(|index| self.store.tokens().get(index))
            .is_some_and(|token| token.kind == TokenKind::Object)
    }

    /// Scans the string starting at the current quote and returns its body.
    fn string_span(&mut self) -> Result<Span, ParseError> {
        let start = self.pos + 1;
        let close = lexer::scan_string(self.text, start)?;
        self.pos = close + 1;
        Ok(Span::new(start, close - start))
    }

    fn fail<T>(&self, kind: ErrKind, byte: u8) -> Result<T, ParseError> {
        Error::new(kind, byte, self.pos).map_err(ParseError::from)
    }
}
