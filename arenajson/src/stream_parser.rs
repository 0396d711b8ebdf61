// SPDX-License-Identifier: Apache-2.0

//! A byte-at-a-time JSON stream parser.
//!
//! Memory use is fixed by two const generics: `DEPTH` stack frames and a
//! `BUF`-byte staging buffer. Document size does not matter. Every event is
//! delivered together with a [`StreamView`] of the current stack, so a handler
//! can tell where in the document a value sits without keeping its own state.

use crate::escape::{self, Utf16Step};
use crate::lexer::{self, ErrKind, Error, Literal};
use crate::number::{parse_number, NumberResult};
use crate::stream_stack::{FrameKind, Stack, StreamView, MAX_KEY_LEN};
use crate::ParseError;

/// Events delivered to a [`StreamHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    /// A member name; the view's data holds the decoded name.
    Key,
    /// A chunk of a decoded string value. Long strings arrive in several
    /// chunks, the last one is sent when the closing quote is seen.
    String,
    Number,
    True,
    False,
    Null,
}

/// Receives the events of a [`StreamParser`].
///
/// Returning an error aborts parsing; the parser is then failed and must be
/// reset.
pub trait StreamHandler<E> {
    fn handle_event(&mut self, event: StreamEvent, view: &StreamView<'_>) -> Result<(), E>;
}

/// Errors from [`StreamParser::feed`].
#[derive(Debug, PartialEq)]
pub enum StreamError<E> {
    /// An error occurred within the parser itself.
    Parse(ParseError),
    /// An error was returned by the user's handler.
    Handler(E),
}

impl<E> From<ParseError> for StreamError<E> {
    fn from(e: ParseError) -> Self {
        StreamError::Parse(e)
    }
}

impl<E> From<lexer::Error> for StreamError<E> {
    fn from(e: lexer::Error) -> Self {
        StreamError::Parse(e.into())
    }
}

impl<E: core::fmt::Display> core::fmt::Display for StreamError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StreamError::Parse(e) => write!(f, "{e}"),
            StreamError::Handler(e) => write!(f, "Handler error: {e}"),
        }
    }
}

/// Outcome of a successful [`StreamParser::feed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    /// More input is needed.
    Continue,
    /// The root container just closed.
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escape {
    None,
    Backslash,
    Unicode { remaining: u8, unit: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before the root container.
    Idle,
    /// Array element or member value; `]` is allowed inside arrays.
    AwaitValue,
    /// Member name or `}`.
    AwaitKey,
    AwaitColon,
    /// `,` or the end of the current container.
    AwaitSeparator,
    String { key: bool, escape: Escape },
    /// Inside a number or keyword.
    Primitive(Primitive),
    Done,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Primitive {
    /// Keyword checked byte by byte against its spelling.
    Literal(Literal),
    Number(NumberPhase),
}

/// Position inside a number, following the JSON number grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberPhase {
    /// After `-`.
    Sign,
    /// A leading `0`, which must not be followed by digits.
    Zero,
    Int,
    /// After `.`, a digit is required.
    Dot,
    Frac,
    /// After `e`/`E`.
    Exp,
    ExpSign,
    ExpDigits,
}

impl NumberPhase {
    fn start(byte: u8) -> Self {
        match byte {
            b'-' => NumberPhase::Sign,
            b'0' => NumberPhase::Zero,
            _ => NumberPhase::Int,
        }
    }

    /// The phase after `byte`, or `None` when the byte cannot continue the number.
    fn advance(self, byte: u8) -> Option<Self> {
        use NumberPhase::*;
        match (self, byte) {
            (Sign, b'0') => Some(Zero),
            (Sign, b'1'..=b'9') => Some(Int),
            (Int, b'0'..=b'9') => Some(Int),
            (Zero | Int, b'.') => Some(Dot),
            (Dot | Frac, b'0'..=b'9') => Some(Frac),
            (Zero | Int | Frac, b'e' | b'E') => Some(Exp),
            (Exp, b'+' | b'-') => Some(ExpSign),
            (Exp | ExpSign | ExpDigits, b'0'..=b'9') => Some(ExpDigits),
            _ => None,
        }
    }

    /// `Some(is_integer)` when the number may end here.
    fn complete(self) -> Option<bool> {
        match self {
            NumberPhase::Zero | NumberPhase::Int => Some(true),
            NumberPhase::Frac | NumberPhase::ExpDigits => Some(false),
            _ => None,
        }
    }
}

#[cfg(feature = "comments")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comment {
    None,
    /// Saw `/`, need `*`.
    Open,
    Body,
    /// Saw `*` inside the body.
    Star,
}

/// An incremental JSON parser fed one byte at a time.
///
/// The root must be an object or an array. Trailing commas are accepted.
///
/// ```
/// use arenajson::{StreamEvent, StreamHandler, StreamParser, StreamStatus, StreamView};
///
/// struct Sum(i64);
///
/// impl StreamHandler<()> for Sum {
///     fn handle_event(&mut self, event: StreamEvent, view: &StreamView<'_>) -> Result<(), ()> {
///         if event == StreamEvent::Number {
///             self.0 += view.number().and_then(|n| n.as_int()).unwrap_or(0) as i64;
///         }
///         Ok(())
///     }
/// }
///
/// let mut parser = StreamParser::new(Sum(0));
/// let (status, used) = parser.feed_slice::<()>(b"[1, 2, [3]] trailing").unwrap();
/// assert_eq!(status, StreamStatus::Done);
/// assert_eq!(used, 11);
/// assert_eq!(parser.handler().0, 6);
/// ```
pub struct StreamParser<H, const DEPTH: usize = 16, const BUF: usize = 64> {
    handler: H,
    stack: Stack<DEPTH>,
    state: State,
    buffer: [u8; BUF],
    len: usize,
    pending_surrogate: Option<u32>,
    /// Bytes consumed so far, used for error positions.
    position: usize,
    #[cfg(feature = "comments")]
    comment: Comment,
}

impl<H> StreamParser<H> {
    /// A parser with the default limits: 16 frames, 64 staging bytes.
    pub fn new(handler: H) -> Self {
        Self::with_limits(handler)
    }
}

impl<H, const DEPTH: usize, const BUF: usize> StreamParser<H, DEPTH, BUF> {
    /// A parser with the limits given by the type's const parameters.
    pub fn with_limits(handler: H) -> Self {
        Self {
            handler,
            stack: Stack::new(),
            state: State::Idle,
            buffer: [0; BUF],
            len: 0,
            pending_surrogate: None,
            position: 0,
            #[cfg(feature = "comments")]
            comment: Comment::None,
        }
    }

    /// Returns the parser to its initial state, keeping the handler.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.state = State::Idle;
        self.len = 0;
        self.pending_surrogate = None;
        self.position = 0;
        #[cfg(feature = "comments")]
        {
            self.comment = Comment::None;
        }
    }

    /// True once the root container has closed.
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// True after an error, until [`reset`](Self::reset).
    pub fn is_failed(&self) -> bool {
        self.state == State::Failed
    }

    /// Number of bytes consumed.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Consumes one byte.
    ///
    /// After `Done` or an error every call fails with
    /// [`ParseError::StreamFinished`] until the parser is reset.
    pub fn feed<E>(&mut self, byte: u8) -> Result<StreamStatus, StreamError<E>>
    where
        H: StreamHandler<E>,
    {
        if matches!(self.state, State::Done | State::Failed) {
            return Err(StreamError::Parse(ParseError::StreamFinished));
        }
        let result = self.step(byte);
        self.position += 1;
        match result {
            Ok(()) if self.state == State::Done => {
                log::debug!("Stream done after {} bytes", self.position);
                Ok(StreamStatus::Done)
            }
            Ok(()) => Ok(StreamStatus::Continue),
            Err(err) => {
                log::debug!(
                    "Stream failed at byte {} with {} frames open",
                    self.position - 1,
                    self.stack.depth()
                );
                self.state = State::Failed;
                Err(err)
            }
        }
    }

    /// Feeds bytes until the slice ends or the root closes.
    ///
    /// Returns the status and the number of bytes consumed.
    pub fn feed_slice<E>(&mut self, bytes: &[u8]) -> Result<(StreamStatus, usize), StreamError<E>>
    where
        H: StreamHandler<E>,
    {
        if matches!(self.state, State::Done | State::Failed) {
            return Err(StreamError::Parse(ParseError::StreamFinished));
        }
        for (consumed, &byte) in bytes.iter().enumerate() {
            if self.feed(byte)? == StreamStatus::Done {
                return Ok((StreamStatus::Done, consumed + 1));
            }
        }
        Ok((StreamStatus::Continue, bytes.len()))
    }

    fn step<E>(&mut self, byte: u8) -> Result<(), StreamError<E>>
    where
        H: StreamHandler<E>,
    {
        #[cfg(feature = "comments")]
        {
            if self.comment != Comment::None {
                return self.comment_byte(byte);
            }
        }
        match self.state {
            State::String { key, escape } => self.string_byte(byte, key, escape),
            State::Primitive(primitive) => self.primitive_byte(primitive, byte),
            _ => self.structural_byte(byte),
        }
    }

    fn structural_byte<E>(&mut self, byte: u8) -> Result<(), StreamError<E>>
    where
        H: StreamHandler<E>,
    {
        if lexer::is_whitespace(byte) {
            return Ok(());
        }
        if byte == b'/' {
            return self.start_comment(byte);
        }
        match (self.state, byte) {
            (State::Idle, b'{') => self.open(FrameKind::Object),
            (State::Idle, b'[') => self.open(FrameKind::Array),
            (State::Idle, _) => self.fail(ErrKind::InvalidRoot, byte),
            (State::AwaitKey, b'"') => {
                self.len = 0;
                self.state = State::String {
                    key: true,
                    escape: Escape::None,
                };
                Ok(())
            }
            (State::AwaitKey, b'}') => self.close(FrameKind::Object, byte),
            (State::AwaitKey, _) => self.fail(ErrKind::ExpectedObjectKey, byte),
            (State::AwaitColon, b':') => {
                self.state = State::AwaitValue;
                Ok(())
            }
            (State::AwaitColon, _) => self.fail(ErrKind::ExpectedColon, byte),
            (State::AwaitSeparator, b',') => {
                self.state = if self.top_kind() == Some(FrameKind::Object) {
                    State::AwaitKey
                } else {
                    State::AwaitValue
                };
                Ok(())
            }
            (State::AwaitSeparator, b'}') => self.close(FrameKind::Object, byte),
            (State::AwaitSeparator, b']') => self.close(FrameKind::Array, byte),
            (State::AwaitSeparator, _) => self.fail(ErrKind::ExpectedCommaOrEnd, byte),
            (State::AwaitValue, b']') if self.top_kind() == Some(FrameKind::Array) => {
                self.close(FrameKind::Array, byte)
            }
            (State::AwaitValue, _) => self.start_value(byte),
            // Routed elsewhere by `step` and `feed`
            (State::String { .. } | State::Primitive(_) | State::Done | State::Failed, _) => Ok(()),
        }
    }

    fn start_value<E>(&mut self, byte: u8) -> Result<(), StreamError<E>>
    where
        H: StreamHandler<E>,
    {
        match byte {
            b'{' => self.open(FrameKind::Object),
            b'[' => self.open(FrameKind::Array),
            b'"' => {
                self.len = 0;
                self.state = State::String {
                    key: false,
                    escape: Escape::None,
                };
                Ok(())
            }
            b't' | b'f' | b'n' => self.start_primitive(byte),
            b if lexer::is_number_start(b) => self.start_primitive(byte),
            _ => {
                let kind = if self.top_kind() == Some(FrameKind::Key) {
                    ErrKind::ExpectedObjectValue
                } else {
                    ErrKind::ExpectedArrayItem
                };
                self.fail(kind, byte)
            }
        }
    }

    fn start_primitive<E>(&mut self, byte: u8) -> Result<(), StreamError<E>> {
        let primitive = match Literal::from_first_byte(byte) {
            Some(literal) => Primitive::Literal(literal),
            None => Primitive::Number(NumberPhase::start(byte)),
        };
        self.len = 0;
        self.push_byte(byte)?;
        self.state = State::Primitive(primitive);
        Ok(())
    }

    /// Every byte is checked as it arrives, so a bad primitive fails at the
    /// offending byte and never as a full buffer.
    fn primitive_byte<E>(&mut self, primitive: Primitive, byte: u8) -> Result<(), StreamError<E>>
    where
        H: StreamHandler<E>,
    {
        let delimiter = matches!(byte, b',' | b']' | b'}' | b'/') || lexer::is_whitespace(byte);
        if delimiter {
            self.finish_primitive(primitive, byte)?;
            // The delimiter belongs to the enclosing container
            return self.structural_byte(byte);
        }
        let next = match primitive {
            Primitive::Literal(literal) => {
                if literal.as_bytes().get(self.len) != Some(&byte) {
                    return self.fail(ErrKind::InvalidToken, byte);
                }
                primitive
            }
            Primitive::Number(phase) => match phase.advance(byte) {
                Some(phase) => Primitive::Number(phase),
                None => return self.fail(ErrKind::InvalidNumber, byte),
            },
        };
        self.push_byte(byte)?;
        self.state = State::Primitive(next);
        Ok(())
    }

    fn finish_primitive<E>(
        &mut self,
        primitive: Primitive,
        delimiter: u8,
    ) -> Result<(), StreamError<E>>
    where
        H: StreamHandler<E>,
    {
        let (event, number) = match primitive {
            Primitive::Literal(literal) => {
                if self.len != literal.as_bytes().len() {
                    return self.fail(ErrKind::InvalidToken, delimiter);
                }
                let event = match literal {
                    Literal::True => StreamEvent::True,
                    Literal::False => StreamEvent::False,
                    Literal::Null => StreamEvent::Null,
                };
                (event, None)
            }
            Primitive::Number(phase) => {
                let Some(is_integer) = phase.complete() else {
                    return self.fail(ErrKind::InvalidNumber, delimiter);
                };
                let data = self.buffer.get(..self.len).unwrap_or(&[]);
                (StreamEvent::Number, Some(parse_number(data, is_integer)?))
            }
        };
        self.emit(event, true, number)?;
        self.len = 0;
        self.value_done();
        Ok(())
    }

    fn string_byte<E>(&mut self, byte: u8, key: bool, escape: Escape) -> Result<(), StreamError<E>>
    where
        H: StreamHandler<E>,
    {
        let next = match escape {
            Escape::None => {
                if byte == b'\\' {
                    Escape::Backslash
                } else if self.pending_surrogate.is_some() {
                    return self.fail(ErrKind::InvalidUnicodeCodepoint, byte);
                } else if byte == b'"' {
                    return self.finish_string(key);
                } else if byte < 0x20 {
                    return self.fail(ErrKind::UnescapedControlCharacter, byte);
                } else {
                    self.push_string_bytes(key, &[byte])?;
                    Escape::None
                }
            }
            Escape::Backslash => {
                if byte == b'u' {
                    Escape::Unicode {
                        remaining: 4,
                        unit: 0,
                    }
                } else if self.pending_surrogate.is_some() {
                    return self.fail(ErrKind::InvalidUnicodeCodepoint, byte);
                } else if let Some(decoded) = escape::simple_escape(byte) {
                    self.push_string_bytes(key, &[decoded])?;
                    Escape::None
                } else {
                    return self.fail(ErrKind::InvalidStringEscape, byte);
                }
            }
            Escape::Unicode { remaining, unit } => {
                let Some(digit) = escape::hex_value(byte) else {
                    return self.fail(ErrKind::InvalidUnicodeEscape, byte);
                };
                let unit = (unit << 4) | digit;
                if remaining > 1 {
                    Escape::Unicode {
                        remaining: remaining - 1,
                        unit,
                    }
                } else {
                    let mut utf8 = [0u8; 4];
                    match escape::decode_utf16_unit(unit, self.pending_surrogate.take(), &mut utf8)
                    {
                        Ok(Utf16Step::AwaitLowSurrogate(high)) => {
                            self.pending_surrogate = Some(high)
                        }
                        Ok(Utf16Step::Char(bytes)) => self.push_string_bytes(key, bytes)?,
                        Err(kind) => return self.fail(kind, byte),
                    }
                    Escape::None
                }
            }
        };
        self.state = State::String { key, escape: next };
        Ok(())
    }

    /// Appends decoded string bytes, flushing full chunks of a value.
    fn push_string_bytes<E>(&mut self, key: bool, bytes: &[u8]) -> Result<(), StreamError<E>>
    where
        H: StreamHandler<E>,
    {
        for &byte in bytes {
            if key && self.len >= MAX_KEY_LEN {
                return Err(ParseError::ScratchBufferFull.into());
            }
            if !key && self.len >= BUF && BUF > 0 {
                self.emit(StreamEvent::String, true, None)?;
                self.len = 0;
            }
            self.push_byte(byte)?;
        }
        Ok(())
    }

    fn finish_string<E>(&mut self, key: bool) -> Result<(), StreamError<E>>
    where
        H: StreamHandler<E>,
    {
        if !key {
            self.emit(StreamEvent::String, true, None)?;
            self.len = 0;
            self.value_done();
            return Ok(());
        }
        if self.stack.is_full() {
            return Err(ParseError::MaxDepthReached.into());
        }
        self.emit(StreamEvent::Key, true, None)?;
        let name = self.buffer.get(..self.len).unwrap_or(&[]);
        self.stack.push_key(name)?;
        self.len = 0;
        self.state = State::AwaitColon;
        Ok(())
    }

    fn open<E>(&mut self, kind: FrameKind) -> Result<(), StreamError<E>>
    where
        H: StreamHandler<E>,
    {
        if self.stack.is_full() {
            return Err(ParseError::MaxDepthReached.into());
        }
        let (event, state) = match kind {
            FrameKind::Object => (StreamEvent::StartObject, State::AwaitKey),
            _ => (StreamEvent::StartArray, State::AwaitValue),
        };
        self.emit(event, false, None)?;
        self.stack.push(kind)?;
        self.state = state;
        Ok(())
    }

    fn close<E>(&mut self, kind: FrameKind, byte: u8) -> Result<(), StreamError<E>>
    where
        H: StreamHandler<E>,
    {
        if self.top_kind() != Some(kind) {
            return self.fail(ErrKind::ExpectedCommaOrEnd, byte);
        }
        self.stack.pop();
        let event = match kind {
            FrameKind::Object => StreamEvent::EndObject,
            _ => StreamEvent::EndArray,
        };
        self.emit(event, false, None)?;
        self.value_done();
        Ok(())
    }

    /// Bookkeeping after any complete value.
    fn value_done(&mut self) {
        self.state = match self.top_kind() {
            Some(FrameKind::Key) => {
                self.stack.pop();
                State::AwaitSeparator
            }
            Some(FrameKind::Array) => {
                self.stack.next_index();
                State::AwaitSeparator
            }
            Some(FrameKind::Object) => State::AwaitSeparator,
            None => State::Done,
        };
    }

    fn emit<E>(
        &mut self,
        event: StreamEvent,
        with_data: bool,
        number: Option<NumberResult>,
    ) -> Result<(), StreamError<E>>
    where
        H: StreamHandler<E>,
    {
        let data: &[u8] = if with_data {
            self.buffer.get(..self.len).unwrap_or(&[])
        } else {
            &[]
        };
        let view = StreamView::new(self.stack.frames(), data, number);
        log::trace!("{:?} at depth {} ({} bytes)", event, view.depth(), data.len());
        self.handler
            .handle_event(event, &view)
            .map_err(StreamError::Handler)
    }

    fn push_byte<E>(&mut self, byte: u8) -> Result<(), StreamError<E>> {
        let slot = self
            .buffer
            .get_mut(self.len)
            .ok_or(ParseError::ScratchBufferFull)?;
        *slot = byte;
        self.len += 1;
        Ok(())
    }

    fn top_kind(&self) -> Option<FrameKind> {
        self.stack.top().map(|frame| frame.kind())
    }

    fn fail<T, E>(&self, kind: ErrKind, byte: u8) -> Result<T, StreamError<E>> {
        Error::new(kind, byte, self.position).map_err(StreamError::from)
    }

    #[cfg(feature = "comments")]
    fn start_comment<E>(&mut self, _byte: u8) -> Result<(), StreamError<E>> {
        self.comment = Comment::Open;
        Ok(())
    }

    #[cfg(not(feature = "comments"))]
    fn start_comment<E>(&mut self, byte: u8) -> Result<(), StreamError<E>> {
        self.fail(ErrKind::UnexpectedComment, byte)
    }

    #[cfg(feature = "comments")]
    fn comment_byte<E>(&mut self, byte: u8) -> Result<(), StreamError<E>> {
        self.comment = match (self.comment, byte) {
            (Comment::Open, b'*') => Comment::Body,
            (Comment::Open, _) => return self.fail(ErrKind::UnexpectedComment, byte),
            (Comment::Body | Comment::Star, b'*') => Comment::Star,
            (Comment::Star, b'/') => Comment::None,
            _ => Comment::Body,
        };
        Ok(())
    }
}
