// SPDX-License-Identifier: Apache-2.0

//! Dotted path queries over a parsed [`Document`](crate::Document).
//!
//! A path is a list of `.`-separated segments:
//!
//! * `name` selects the first object member called `name`,
//! * `#3` selects element 3 of an array,
//! * `#` tries every array element in order and keeps the first one for
//!   which the rest of the path resolves.

use crate::document::Node;
use crate::token::TokenKind;

/// One step of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'p> {
    Key(&'p [u8]),
    Index(usize),
    Wildcard,
}

impl<'p> Segment<'p> {
    /// Parses a single segment; `None` for empty or malformed segments.
    pub fn parse(text: &'p str) -> Option<Self> {
        let Some(digits) = text.strip_prefix('#') else {
            return (!text.is_empty()).then_some(Segment::Key(text.as_bytes()));
        };
        if digits.is_empty() {
            return Some(Segment::Wildcard);
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(Segment::Index)
    }
}

/// Splits off the first segment. The remainder is `None` when this was the
/// last one.
fn split_first(path: &str) -> Option<(Segment<'_>, Option<&str>)> {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };
    Some((Segment::parse(head)?, rest))
}

/// Resolves `path` relative to `node`.
pub(crate) fn resolve<'d>(node: Node<'d>, path: &str) -> Option<Node<'d>> {
    let (segment, rest) = split_first(path)?;
    log::trace!("Resolving {:?} at token {}", segment, node.index());

    let child = match segment {
        Segment::Key(name) => {
            if node.kind() != TokenKind::Object {
                return None;
            }
            // First occurrence only, duplicates are never tried
            node.children().find(|child| child.name() == Some(name))?
        }
        Segment::Index(index) => {
            if node.kind() != TokenKind::Array {
                return None;
            }
            node.children().nth(index)?
        }
        Segment::Wildcard => {
            if node.kind() != TokenKind::Array {
                return None;
            }
            let rest = rest?;
            return node.children().find_map(|child| resolve(child, rest));
        }
    };

    match rest {
        Some(rest) => resolve(child, rest),
        None => Some(child),
    }
}
