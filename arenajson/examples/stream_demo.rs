// Example feeding a document to the stream parser in small packets, as it
// would arrive from a serial line or socket

use arenajson::{
    FrameKind, ParseError, StreamError, StreamEvent, StreamHandler, StreamParser, StreamStatus,
    StreamView,
};

/// Prints every event indented by stack depth and sums all readings.
#[derive(Default)]
struct Printer {
    events: usize,
    readings_total: i64,
}

impl StreamHandler<ParseError> for Printer {
    fn handle_event(&mut self, event: StreamEvent, view: &StreamView<'_>) -> Result<(), ParseError> {
        self.events += 1;
        let indent = "  ".repeat(view.depth());
        match event {
            StreamEvent::Key | StreamEvent::String | StreamEvent::Number => {
                println!("{}{:?}: {:?}", indent, event, view.data_str()?);
            }
            _ => println!("{}{:?}", indent, event),
        }

        // {"readings": [ <number>, ... ]}
        use FrameKind::{Array, Key, Object};
        if event == StreamEvent::Number
            && view.matches(&[Object, Key, Array])
            && view.key_at(1) == Some(&b"readings"[..])
        {
            if let Some(value) = view.number().and_then(|n| n.as_int()) {
                self.readings_total += i64::from(value);
            }
        }
        Ok(())
    }
}

fn main() -> Result<(), StreamError<ParseError>> {
    let json = br#"{"station": "north-7", "readings": [12, 7, -3, 40], "ok": true, "note": null}"#;

    println!("Input: {}", String::from_utf8_lossy(json));
    println!("Feeding in 6-byte packets with a 16-byte staging buffer");
    println!();

    let mut parser = StreamParser::<_, 8, 16>::with_limits(Printer::default());
    for packet in json.chunks(6) {
        let (status, _) = parser.feed_slice::<ParseError>(packet)?;
        if status == StreamStatus::Done {
            break;
        }
    }

    let printer = parser.into_handler();
    println!();
    println!(
        "{} events, readings total {}",
        printer.events, printer.readings_total
    );

    // Malformed input reports the offending byte and its position
    let mut parser = StreamParser::new(Printer::default());
    match parser.feed_slice::<ParseError>(b"[1, 2,, 3]") {
        Err(StreamError::Parse(e)) => println!("Rejected as expected: {}", e),
        other => println!("Unexpected result: {:?}", other),
    }
    Ok(())
}
