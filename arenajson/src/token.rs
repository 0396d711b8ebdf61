// SPDX-License-Identifier: Apache-2.0

//! DOM tokens and the stores that hold them.

use crate::NumberResult;

/// What a token holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Object,
    Array,
    String,
    /// Number with neither fraction nor exponent.
    Integer,
    /// Any other number.
    Real,
    True,
    False,
    Null,
}

/// A byte range in the parsed source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    /// The bytes this span covers, or `None` if it lies outside `source`.
    pub fn slice<'s>(&self, source: &'s [u8]) -> Option<&'s [u8]> {
        source.get(self.start..self.end())
    }
}

/// Kind-specific payload of a token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenValue {
    None,
    /// Raw string contents between the quotes, escapes left as written.
    String(Span),
    Number { raw: Span, parsed: NumberResult },
}

/// One node of the document tree.
///
/// Children and siblings are linked by index into the same store; there is
/// no parent link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) name: Option<Span>,
    pub(crate) value: TokenValue,
    pub(crate) first_child: Option<usize>,
    pub(crate) next: Option<usize>,
}

impl Token {
    /// A blank slot, for initializing caller-provided arrays.
    pub const EMPTY: Token = Token {
        kind: TokenKind::Null,
        name: None,
        value: TokenValue::None,
        first_child: None,
        next: None,
    };

    pub(crate) const fn new(kind: TokenKind, name: Option<Span>, value: TokenValue) -> Self {
        Self {
            kind,
            name,
            value,
            first_child: None,
            next: None,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Span of the member name, for direct children of an object.
    pub fn name(&self) -> Option<Span> {
        self.name
    }

    pub fn value(&self) -> &TokenValue {
        &self.value
    }

    pub fn first_child(&self) -> Option<usize> {
        self.first_child
    }

    pub fn next_sibling(&self) -> Option<usize> {
        self.next
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Backing storage for an [`Arena`](crate::Arena).
pub trait TokenStore {
    /// Maximum number of tokens; `usize::MAX` for growable stores.
    fn capacity(&self) -> usize;

    /// Forgets every stored token.
    fn clear(&mut self);

    /// Appends a token and returns its index, or `None` when full.
    fn push(&mut self, token: Token) -> Option<usize>;

    /// The tokens stored so far.
    fn tokens(&self) -> &[Token];

    fn tokens_mut(&mut self) -> &mut [Token];
}

/// A store over caller-owned slots. Never allocates.
pub struct FixedStore<'t> {
    slots: &'t mut [Token],
    used: usize,
}

impl<'t> FixedStore<'t> {
    pub fn new(slots: &'t mut [Token]) -> Self {
        Self { slots, used: 0 }
    }
}

impl TokenStore for FixedStore<'_> {
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn clear(&mut self) {
        self.used = 0;
    }

    fn push(&mut self, token: Token) -> Option<usize> {
        let index = self.used;
        *self.slots.get_mut(index)? = token;
        self.used += 1;
        Some(index)
    }

    fn tokens(&self) -> &[Token] {
        self.slots.get(..self.used).unwrap_or(&[])
    }

    fn tokens_mut(&mut self) -> &mut [Token] {
        let used = self.used;
        self.slots.get_mut(..used).unwrap_or(&mut [])
    }
}

#[cfg(feature = "alloc")]
impl TokenStore for alloc::vec::Vec<Token> {
    fn capacity(&self) -> usize {
        usize::MAX
    }

    fn clear(&mut self) {
        alloc::vec::Vec::clear(self);
    }

    fn push(&mut self, token: Token) -> Option<usize> {
        self.try_reserve(1).ok()?;
        alloc::vec::Vec::push(self, token);
        Some(self.len() - 1)
    }

    fn tokens(&self) -> &[Token] {
        self.as_slice()
    }

    fn tokens_mut(&mut self) -> &mut [Token] {
        self.as_mut_slice()
    }
}
