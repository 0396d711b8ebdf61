// SPDX-License-Identifier: Apache-2.0

//! Read-only views over a parsed token tree.

use crate::number::{ConfiguredInt, JsonNumber};
use crate::path;
use crate::token::{Token, TokenKind, TokenValue};

/// A successfully parsed document: the tokens and the text they point into.
///
/// Borrowed from the [`Arena`](crate::Arena) that produced it; the arena
/// cannot parse again while a document is alive.
#[derive(Clone, Copy)]
pub struct Document<'d> {
    tokens: &'d [Token],
    source: &'d [u8],
}

impl<'d> Document<'d> {
    pub(crate) fn new(tokens: &'d [Token], source: &'d [u8]) -> Self {
        Self { tokens, source }
    }

    /// The root value. Always token 0.
    pub fn root(&self) -> Node<'d> {
        Node {
            doc: *self,
            index: 0,
        }
    }

    /// Number of tokens the parse used.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn tokens(&self) -> &'d [Token] {
        self.tokens
    }

    /// The (bounded) text that was parsed.
    pub fn source(&self) -> &'d [u8] {
        self.source
    }

    pub fn node(&self, index: usize) -> Option<Node<'d>> {
        (index < self.tokens.len()).then_some(Node { doc: *self, index })
    }

    /// Resolves `path` from the root. See [`crate::path`] for the syntax.
    pub fn find(&self, path: &str) -> Option<Node<'d>> {
        self.find_ex(None, path)
    }

    /// Resolves `path` from `start`, or from the root when `start` is `None`.
    pub fn find_ex(&self, start: Option<Node<'d>>, path: &str) -> Option<Node<'d>> {
        let start = start.unwrap_or_else(|| self.root());
        let found = path::resolve(start, path);
        log::debug!(
            "find {:?} from {} -> {:?}",
            path,
            start.index,
            found.map(|node| node.index)
        );
        found
    }
}

/// A handle to one token of a [`Document`].
#[derive(Clone, Copy)]
pub struct Node<'d> {
    doc: Document<'d>,
    index: usize,
}

impl<'d> Node<'d> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn token(&self) -> &'d Token {
        self.doc.tokens.get(self.index).unwrap_or(&Token::EMPTY)
    }

    pub fn kind(&self) -> TokenKind {
        self.token().kind()
    }

    /// Member name bytes, for direct children of an object.
    pub fn name(&self) -> Option<&'d [u8]> {
        self.token().name()?.slice(self.doc.source)
    }

    /// Member name as text; `None` if absent or not UTF-8.
    pub fn name_str(&self) -> Option<&'d str> {
        core::str::from_utf8(self.name()?).ok()
    }

    /// Source bytes of a string (without quotes, escapes as written) or a
    /// number. `None` for other kinds.
    pub fn raw(&self) -> Option<&'d [u8]> {
        match self.token().value() {
            TokenValue::String(span) | TokenValue::Number { raw: span, .. } => {
                span.slice(self.doc.source)
            }
            TokenValue::None => None,
        }
    }

    pub fn raw_str(&self) -> Option<&'d str> {
        core::str::from_utf8(self.raw()?).ok()
    }

    /// Length of a string's raw (still escaped) contents.
    pub fn string_len(&self) -> Option<usize> {
        match self.token().value() {
            TokenValue::String(span) => Some(span.len),
            _ => None,
        }
    }

    fn string_bytes(&self) -> Option<&'d [u8]> {
        match self.token().value() {
            TokenValue::String(span) => span.slice(self.doc.source),
            _ => None,
        }
    }

    /// Exact comparison of a string's raw contents.
    pub fn string_eq(&self, literal: impl AsRef<[u8]>) -> bool {
        self.string_bytes() == Some(literal.as_ref())
    }

    /// Compares the first `n` bytes of a string's raw contents.
    ///
    /// False if the node is not a string or either side is shorter than `n`.
    pub fn string_eq_n(&self, literal: impl AsRef<[u8]>, n: usize) -> bool {
        let Some(raw) = self.string_bytes() else {
            return false;
        };
        match (raw.get(..n), literal.as_ref().get(..n)) {
            (Some(ours), Some(theirs)) => ours == theirs,
            _ => false,
        }
    }

    pub fn number(&self) -> Option<JsonNumber<'d>> {
        match self.token().value() {
            TokenValue::Number { raw, parsed } => {
                let text = core::str::from_utf8(raw.slice(self.doc.source)?).ok()?;
                Some(JsonNumber::new(text, *parsed))
            }
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<ConfiguredInt> {
        self.number()?.as_int()
    }

    #[cfg(feature = "float")]
    pub fn as_f64(&self) -> Option<f64> {
        self.number()?.as_f64()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.kind() {
            TokenKind::True => Some(true),
            TokenKind::False => Some(false),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        self.kind() == TokenKind::Null
    }

    pub fn first_child(&self) -> Option<Node<'d>> {
        self.doc.node(self.token().first_child()?)
    }

    pub fn next_sibling(&self) -> Option<Node<'d>> {
        self.doc.node(self.token().next_sibling()?)
    }

    /// Direct children in document order.
    pub fn children(&self) -> Children<'d> {
        Children {
            next: self.first_child(),
        }
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children().count()
    }

    pub fn is_empty(&self) -> bool {
        self.token().first_child().is_none()
    }

    /// Resolves `path` relative to this node.
    pub fn find(&self, path: &str) -> Option<Node<'d>> {
        self.doc.find_ex(Some(*self), path)
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.doc.tokens, other.doc.tokens) && self.index == other.index
    }
}

impl Eq for Node<'_> {}

impl core::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Node")
            .field("index", &self.index)
            .field("kind", &self.kind())
            .finish()
    }
}

/// Iterator over the direct children of a container node.
pub struct Children<'d> {
    next: Option<Node<'d>>,
}

impl<'d> Iterator for Children<'d> {
    type Item = Node<'d>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.next_sibling();
        Some(current)
    }
}
