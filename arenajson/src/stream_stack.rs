// SPDX-License-Identifier: Apache-2.0

//! The explicit container stack of the stream parser and the read-only view
//! handed to event handlers.

use crate::number::{JsonNumber, NumberResult};
use crate::ParseError;

/// Bytes of a member name kept in a key frame.
pub const MAX_KEY_LEN: usize = 32;

/// What a stack frame stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Object,
    Array,
    /// An object member whose value is being parsed.
    Key,
}

/// One level of the stream parser's stack.
#[derive(Clone, Copy)]
pub struct Frame {
    kind: FrameKind,
    index: usize,
    name: [u8; MAX_KEY_LEN],
    name_len: usize,
}

impl Frame {
    const fn container(kind: FrameKind) -> Self {
        Self {
            kind,
            index: 0,
            name: [0; MAX_KEY_LEN],
            name_len: 0,
        }
    }

    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    /// Zero-based index of the element being parsed, for array frames.
    pub fn index(&self) -> Option<usize> {
        (self.kind == FrameKind::Array).then_some(self.index)
    }

    /// Decoded member name, for key frames.
    pub fn key(&self) -> Option<&[u8]> {
        if self.kind != FrameKind::Key {
            return None;
        }
        self.name.get(..self.name_len)
    }

    pub fn key_str(&self) -> Option<&str> {
        core::str::from_utf8(self.key()?).ok()
    }
}

impl core::fmt::Debug for Frame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            FrameKind::Object => f.write_str("Object"),
            FrameKind::Array => write!(f, "Array[{}]", self.index),
            FrameKind::Key => match self.key_str() {
                Some(name) => write!(f, "Key({name:?})"),
                None => write!(f, "Key({:?})", self.key()),
            },
        }
    }
}

/// Fixed-depth frame stack.
pub(crate) struct Stack<const DEPTH: usize> {
    frames: [Frame; DEPTH],
    len: usize,
}

impl<const DEPTH: usize> Stack<DEPTH> {
    pub const fn new() -> Self {
        Self {
            frames: [Frame::container(FrameKind::Object); DEPTH],
            len: 0,
        }
    }

    pub fn is_full(&self) -> bool {
        self.len >= DEPTH
    }

    pub fn depth(&self) -> usize {
        self.len
    }

    fn push_frame(&mut self, frame: Frame) -> Result<(), ParseError> {
        let slot = self
            .frames
            .get_mut(self.len)
            .ok_or(ParseError::MaxDepthReached)?;
        *slot = frame;
        self.len += 1;
        Ok(())
    }

    /// Pushes an object or array frame.
    pub fn push(&mut self, kind: FrameKind) -> Result<(), ParseError> {
        self.push_frame(Frame::container(kind))
    }

    /// Pushes a key frame holding a copy of `name`.
    pub fn push_key(&mut self, name: &[u8]) -> Result<(), ParseError> {
        let mut frame = Frame::container(FrameKind::Key);
        frame
            .name
            .get_mut(..name.len())
            .ok_or(ParseError::ScratchBufferFull)?
            .copy_from_slice(name);
        frame.name_len = name.len();
        self.push_frame(frame)
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.len = self.len.checked_sub(1)?;
        self.frames.get(self.len).copied()
    }

    pub fn top(&self) -> Option<&Frame> {
        self.frames().last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Frame> {
        let len = self.len;
        self.frames.get_mut(..len)?.last_mut()
    }

    /// Advances the element index of the array frame on top.
    pub fn next_index(&mut self) {
        if let Some(frame) = self.top_mut() {
            frame.index += 1;
        }
    }

    pub fn frames(&self) -> &[Frame] {
        self.frames.get(..self.len).unwrap_or(&[])
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}

/// What a [`StreamHandler`](crate::StreamHandler) sees alongside an event.
///
/// `frames` is the stack at the moment of the event. `data` holds the decoded
/// key, the string chunk or the primitive's text, and is empty for structural
/// events.
#[derive(Debug, Clone, Copy)]
pub struct StreamView<'p> {
    frames: &'p [Frame],
    data: &'p [u8],
    number: Option<NumberResult>,
}

impl<'p> StreamView<'p> {
    pub(crate) fn new(frames: &'p [Frame], data: &'p [u8], number: Option<NumberResult>) -> Self {
        Self {
            frames,
            data,
            number,
        }
    }

    /// Number of frames on the stack.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &'p [Frame] {
        self.frames
    }

    pub fn frame(&self, level: usize) -> Option<&'p Frame> {
        self.frames.get(level)
    }

    /// Member name of the key frame at `level`.
    pub fn key_at(&self, level: usize) -> Option<&'p [u8]> {
        self.frame(level)?.key()
    }

    /// Element index of the array frame at `level`.
    pub fn index_at(&self, level: usize) -> Option<usize> {
        self.frame(level)?.index()
    }

    pub fn data(&self) -> &'p [u8] {
        self.data
    }

    /// `data` as text.
    ///
    /// String chunks are split on byte boundaries, so a chunk may end inside
    /// a multi-byte character and fail here even though the whole string is
    /// valid.
    pub fn data_str(&self) -> Result<&'p str, ParseError> {
        Ok(core::str::from_utf8(self.data)?)
    }

    /// The value of a `Number` event.
    pub fn number(&self) -> Option<JsonNumber<'p>> {
        let parsed = self.number?;
        let raw = core::str::from_utf8(self.data).ok()?;
        Some(JsonNumber::new(raw, parsed))
    }

    /// True if the whole stack consists of exactly these frame kinds.
    pub fn matches(&self, kinds: &[FrameKind]) -> bool {
        self.frames.len() == kinds.len() && self.starts_with(kinds)
    }

    /// True if the bottom of the stack consists of these frame kinds.
    pub fn starts_with(&self, kinds: &[FrameKind]) -> bool {
        self.frames.len() >= kinds.len()
            && self
                .frames
                .iter()
                .zip(kinds)
                .all(|(frame, kind)| frame.kind == *kind)
    }
}
