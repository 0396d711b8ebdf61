// SPDX-License-Identifier: Apache-2.0

//! Full event trace of a document fed byte by byte with a small buffer

use arenajson::{
    FrameKind, ParseError, StreamError, StreamEvent, StreamHandler, StreamParser, StreamStatus,
    StreamView,
};
use test_log::test;

const LONG_STRING: &str = "this is a very long string because why we wouldn't do it if we can \
and because this has to be tested tested";

fn document() -> String {
    format!(
        r#"{{
    "numbers_array": [123, -123, 987],
    "numbers_obj": {{
        "num1": 123,
        "num2": 456,
    }},
    "numbers_arr2": [
        [1, 2, 3],
        [4, 5, 6]
    ],
    "numbers_real": 3.5,
    "long_string":"{LONG_STRING}"
}}"#
    )
}

use StreamEvent::{EndArray, EndObject, Key, Number, StartArray, StartObject};

const EXPECTED_EVENTS: &[(StreamEvent, usize)] = &[
    (StartObject, 0),
    (Key, 1),
    (StartArray, 2),
    (Number, 3),
    (Number, 3),
    (Number, 3),
    (EndArray, 2),
    (Key, 1),
    (StartObject, 2),
    (Key, 3),
    (Number, 4),
    (Key, 3),
    (Number, 4),
    (EndObject, 2),
    (Key, 1),
    (StartArray, 2),
    (StartArray, 3),
    (Number, 4),
    (Number, 4),
    (Number, 4),
    (EndArray, 3),
    (StartArray, 3),
    (Number, 4),
    (Number, 4),
    (Number, 4),
    (EndArray, 3),
    (EndArray, 2),
    (Key, 1),
    (Number, 2),
    (Key, 1),
    // 107 characters in chunks of 15
    (StreamEvent::String, 2),
    (StreamEvent::String, 2),
    (StreamEvent::String, 2),
    (StreamEvent::String, 2),
    (StreamEvent::String, 2),
    (StreamEvent::String, 2),
    (StreamEvent::String, 2),
    (StreamEvent::String, 2),
    (EndObject, 0),
];

#[derive(Default)]
struct Collected {
    events: Vec<(StreamEvent, usize)>,
    numbers_array: [i64; 3],
    numbers_obj_num1: i64,
    numbers_obj_num2: i64,
    numbers_array_array: [[i64; 3]; 2],
    numbers_real: Option<String>,
    long_string: String,
}

impl Collected {
    fn int(view: &StreamView<'_>) -> Result<i64, ParseError> {
        view.number()
            .and_then(|n| n.as_int())
            .map(i64::from)
            .ok_or(ParseError::InvalidArgument)
    }
}

impl StreamHandler<ParseError> for Collected {
    fn handle_event(&mut self, event: StreamEvent, view: &StreamView<'_>) -> Result<(), ParseError> {
        self.events.push((event, view.depth()));

        use FrameKind::{Array as A, Key as K, Object as O};
        let root_key = view.key_at(1);

        if event == Number && view.matches(&[O, K, A]) && root_key == Some(&b"numbers_array"[..]) {
            if let Some(slot) = view.index_at(2).and_then(|i| self.numbers_array.get_mut(i)) {
                *slot = Self::int(view)?;
            }
        }

        if event == Number && view.matches(&[O, K, O, K]) && root_key == Some(&b"numbers_obj"[..]) {
            match view.key_at(3) {
                Some(b"num1") => self.numbers_obj_num1 = Self::int(view)?,
                Some(b"num2") => self.numbers_obj_num2 = Self::int(view)?,
                _ => {}
            }
        }

        if event == Number && view.matches(&[O, K, A, A]) && root_key == Some(&b"numbers_arr2"[..]) {
            if let (Some(row), Some(col)) = (view.index_at(2), view.index_at(3)) {
                self.numbers_array_array[row][col] = Self::int(view)?;
            }
        }

        if view.matches(&[O, K]) {
            match (event, root_key) {
                (Number, Some(b"numbers_real")) => {
                    self.numbers_real = Some(view.data_str()?.to_owned());
                }
                (StreamEvent::String, Some(b"long_string")) => {
                    self.long_string.push_str(view.data_str()?);
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(not(feature = "float-error"))]
#[test]
fn test_stream_event_trace() {
    let json = document();
    let mut parser = StreamParser::<_, 16, 15>::with_limits(Collected::default());

    let mut status = StreamStatus::Continue;
    for &byte in json.as_bytes() {
        status = parser
            .feed(byte)
            .unwrap_or_else(|e: StreamError<ParseError>| panic!("stream failed: {e:?}"));
        if status == StreamStatus::Done {
            break;
        }
    }
    assert_eq!(status, StreamStatus::Done);
    assert!(parser.is_done());

    let data = parser.into_handler();
    assert_eq!(data.events.len(), EXPECTED_EVENTS.len());
    for (n, (got, expected)) in data.events.iter().zip(EXPECTED_EVENTS).enumerate() {
        assert_eq!(got, expected, "event #{}", n + 1);
    }

    assert_eq!(data.numbers_array, [123, -123, 987]);
    assert_eq!(data.numbers_obj_num1, 123);
    assert_eq!(data.numbers_obj_num2, 456);
    assert_eq!(data.numbers_array_array, [[1, 2, 3], [4, 5, 6]]);
    assert_eq!(data.numbers_real.as_deref(), Some("3.5"));
    assert_eq!(data.long_string, LONG_STRING);
}

#[cfg(feature = "float")]
#[test]
fn test_stream_real_value() {
    struct Real(Option<f64>);
    impl StreamHandler<()> for Real {
        fn handle_event(&mut self, event: StreamEvent, view: &StreamView<'_>) -> Result<(), ()> {
            if event == Number && view.key_at(1) == Some(&b"numbers_real"[..]) {
                self.0 = view.number().and_then(|n| n.as_f64());
            }
            Ok(())
        }
    }

    let json = document();
    let mut parser = StreamParser::new(Real(None));
    let result: Result<_, StreamError<()>> = parser.feed_slice(json.as_bytes());
    let (status, consumed) = result.unwrap();
    assert_eq!(status, StreamStatus::Done);
    assert_eq!(consumed, json.len());
    assert_eq!(parser.handler().0, Some(3.5));
}

#[cfg(not(feature = "float-error"))]
#[test]
fn test_stream_chunked_feeding_matches_bytewise() {
    let json = document();
    let mut parser = StreamParser::<_, 16, 15>::with_limits(Collected::default());
    let mut status = StreamStatus::Continue;
    for chunk in json.as_bytes().chunks(7) {
        let result: Result<_, StreamError<ParseError>> = parser.feed_slice(chunk);
        status = result.unwrap().0;
    }
    assert_eq!(status, StreamStatus::Done);
    assert_eq!(parser.handler().events.as_slice(), EXPECTED_EVENTS);
    assert_eq!(parser.handler().long_string, LONG_STRING);
}

#[cfg(feature = "float-error")]
#[test]
fn test_stream_real_rejected() {
    let json = document();
    let mut parser = StreamParser::<_, 16, 15>::with_limits(Collected::default());
    let result: Result<_, StreamError<ParseError>> = parser.feed_slice(json.as_bytes());
    assert_eq!(result, Err(StreamError::Parse(ParseError::FloatNotAllowed)));
    assert!(parser.is_failed());
    // Everything before the real was delivered
    let events = &parser.handler().events;
    assert_eq!(events.last(), Some(&(Key, 1)));
    assert_eq!(events.as_slice(), &EXPECTED_EVENTS[..events.len()]);
}
