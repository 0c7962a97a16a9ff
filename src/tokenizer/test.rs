use crate::tokenizer::{Flow, Handler, ParseError, Tokenizer};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Event {
    PartBegin,
    HeaderField(Vec<u8>),
    HeaderValue(Vec<u8>),
    HeaderEnd,
    HeadersEnd,
    PartData(Vec<u8>),
    PartEnd,
    End,
}

use Event::*;

/// Records events, adjacent spans of the same kind are merged.
#[derive(Debug, Default)]
struct Recorder {
    events: Vec<Event>,
    spans: usize,
    stop_after: Option<usize>,
}

impl Recorder {
    fn stop_after(n: usize) -> Self {
        Self {
            stop_after: Some(n),
            ..Self::default()
        }
    }

    fn push(&mut self, event: Event) -> Flow {
        let merged = match (self.events.last_mut(), &event) {
            (Some(HeaderField(a)), HeaderField(b))
            | (Some(HeaderValue(a)), HeaderValue(b))
            | (Some(PartData(a)), PartData(b)) => {
                a.extend_from_slice(b);
                true
            }
            _ => false,
        };
        if !merged {
            self.events.push(event);
        }
        match self.stop_after {
            Some(n) if self.events.len() >= n => Flow::Stop,
            _ => Flow::Continue,
        }
    }

    fn push_span(&mut self, event: fn(Vec<u8>) -> Event, span: &[u8]) -> Flow {
        assert!(!span.is_empty(), "empty span delivered");
        self.spans += 1;
        self.push(event(span.to_vec()))
    }
}

impl Handler for Recorder {
    fn part_begin(&mut self) -> Flow {
        self.push(PartBegin)
    }

    fn header_field(&mut self, span: &[u8]) -> Flow {
        self.push_span(HeaderField, span)
    }

    fn header_value(&mut self, span: &[u8]) -> Flow {
        self.push_span(HeaderValue, span)
    }

    fn header_end(&mut self) -> Flow {
        self.push(HeaderEnd)
    }

    fn headers_end(&mut self) -> Flow {
        self.push(HeadersEnd)
    }

    fn part_data(&mut self, span: &[u8]) -> Flow {
        self.push_span(PartData, span)
    }

    fn part_end(&mut self) -> Flow {
        self.push(PartEnd)
    }

    fn end(&mut self) -> Flow {
        self.push(End)
    }
}

fn field(b: &[u8]) -> Event {
    HeaderField(b.to_vec())
}

fn value(b: &[u8]) -> Event {
    HeaderValue(b.to_vec())
}

fn data(b: &[u8]) -> Event {
    PartData(b.to_vec())
}

const FORM: &[u8] = b"--XYZ\r\n\
Content-Disposition: form-data; name=\"f\"\r\n\
Content-Type: text/plain\r\n\
\r\n\
hello\r\n\
--XYZ--\r\n";

fn form_events() -> Vec<Event> {
    vec![
        PartBegin,
        field(b"Content-Disposition"),
        value(b"form-data; name=\"f\""),
        HeaderEnd,
        field(b"Content-Type"),
        value(b"text/plain"),
        HeaderEnd,
        HeadersEnd,
        data(b"hello"),
        PartEnd,
        End,
    ]
}

/// Feed `input` in chunks of `size`, returns recorded events.
fn feed_chunked(boundary: &str, input: &[u8], size: usize) -> (Tokenizer, Recorder) {
    let mut tokenizer = Tokenizer::new(boundary);
    let mut recorder = Recorder::default();
    for chunk in input.chunks(size) {
        assert_eq!(tokenizer.feed(chunk, &mut recorder), chunk.len());
    }
    (tokenizer, recorder)
}

#[test]
fn test_single_part() {
    let mut tokenizer = Tokenizer::new("XYZ");
    let mut recorder = Recorder::default();

    assert_eq!(tokenizer.feed(FORM, &mut recorder), FORM.len());
    assert_eq!(recorder.events, form_events());
    assert!(tokenizer.succeeded());
    assert!(tokenizer.stopped());
    assert!(!tokenizer.has_error());
    assert_eq!(tokenizer.error_message(), "");
}

#[test]
fn test_chunk_invariance() {
    for size in 1..=FORM.len() {
        let (tokenizer, recorder) = feed_chunked("XYZ", FORM, size);
        assert_eq!(recorder.events, form_events(), "chunk size {size}");
        assert!(tokenizer.succeeded(), "chunk size {size}");
    }

    for at in 0..=FORM.len() {
        let (head, tail) = FORM.split_at(at);
        let mut tokenizer = Tokenizer::new("XYZ");
        let mut recorder = Recorder::default();
        assert_eq!(tokenizer.feed(head, &mut recorder), head.len());
        assert_eq!(tokenizer.feed(tail, &mut recorder), tail.len());
        assert_eq!(recorder.events, form_events(), "split at {at}");
    }
}

#[test]
fn test_one_byte_spans() {
    let (_, recorder) = feed_chunked("XYZ", FORM, 1);
    // every header and body byte is delivered in its own span
    assert!(recorder.spans > b"Content-Disposition".len());
}

#[test]
fn test_multiple_parts() {
    let input = b"--AaB03x\r\n\
Content-Disposition: form-data; name=\"submit-name\"\r\n\
\r\n\
Larry\r\n\
--AaB03x\r\n\
Content-Disposition: form-data; name=\"files\"; filename=\"file1.txt\"\r\n\
Content-Type: text/plain\r\n\
\r\n\
... contents of file1.txt ...\r\n\
--AaB03x--";

    let expected = vec![
        PartBegin,
        field(b"Content-Disposition"),
        value(b"form-data; name=\"submit-name\""),
        HeaderEnd,
        HeadersEnd,
        data(b"Larry"),
        PartEnd,
        PartBegin,
        field(b"Content-Disposition"),
        value(b"form-data; name=\"files\"; filename=\"file1.txt\""),
        HeaderEnd,
        field(b"Content-Type"),
        value(b"text/plain"),
        HeaderEnd,
        HeadersEnd,
        data(b"... contents of file1.txt ..."),
        PartEnd,
        End,
    ];

    for size in [1, 2, 3, 7, 13, input.len()] {
        let (tokenizer, recorder) = feed_chunked("AaB03x", input, size);
        assert_eq!(recorder.events, expected, "chunk size {size}");
        assert!(tokenizer.succeeded());
    }
}

#[test]
fn test_body_resembling_boundary() {
    macro_rules! test {
        ($body:literal) => {
            let mut input = b"--XYZ\r\n\r\n".to_vec();
            input.extend_from_slice($body);
            input.extend_from_slice(b"\r\n--XYZ--");

            for size in [1, 2, 3, 5, input.len()] {
                let (tokenizer, recorder) = feed_chunked("XYZ", &input, size);
                assert_eq!(
                    recorder.events,
                    [PartBegin, HeadersEnd, data($body), PartEnd, End],
                    "body {:?}, chunk size {size}",
                    String::from_utf8_lossy($body),
                );
                assert!(tokenizer.succeeded());
            }
        };
    }

    test!(b"a\r\n--XYb");
    test!(b"\r\n--XY");
    test!(b"\r\r\n--XYZ ");
    test!(b"line\r\n--XYZx tail");
    test!(b"\r\n--XYZ\rnot a boundary");
    test!(b"\r\n--XYZ-x");
    test!(b"\r\n\r\n\r\n");
    test!(b"--XYZ");
}

#[test]
fn test_empty_body_and_values() {
    let input = b"--XYZ\r\nX-Empty:\r\nX-Spaced: \t value \r\n\r\n\r\n--XYZ--";
    let (tokenizer, recorder) = feed_chunked("XYZ", input, input.len());

    assert_eq!(
        recorder.events,
        [
            PartBegin,
            field(b"X-Empty"),
            HeaderEnd,
            field(b"X-Spaced"),
            value(b"value "),
            HeaderEnd,
            HeadersEnd,
            PartEnd,
            End,
        ]
    );
    assert!(tokenizer.succeeded());
}

#[test]
fn test_no_parts() {
    let (tokenizer, recorder) = feed_chunked("XYZ", b"--XYZ--", 1);
    assert_eq!(recorder.events, [End]);
    assert!(tokenizer.succeeded());
}

#[test]
fn test_epilogue() {
    let mut tokenizer = Tokenizer::new("XYZ");
    let mut recorder = Recorder::default();

    assert_eq!(tokenizer.feed(FORM, &mut recorder), FORM.len());
    assert_eq!(tokenizer.feed(b"trailing garbage", &mut recorder), 16);
    assert_eq!(recorder.events, form_events());
    assert!(tokenizer.succeeded());
}

#[test]
fn test_parse_error() {
    macro_rules! test {
        ($input:literal, $consumed:expr, $err:ident) => {
            let mut tokenizer = Tokenizer::new("XYZ");
            let mut recorder = Recorder::default();

            assert_eq!(tokenizer.feed($input, &mut recorder), $consumed, "{:?}", $input);
            assert!(tokenizer.has_error());
            assert!(tokenizer.stopped());
            assert!(!tokenizer.succeeded());
            assert_eq!(tokenizer.error(), Some(&ParseError::$err));
            assert_eq!(tokenizer.error_message(), ParseError::$err.message());

            // no progress after error
            let len = recorder.events.len();
            assert_eq!(tokenizer.feed(FORM, &mut recorder), 0);
            assert_eq!(recorder.events.len(), len);
        };
    }

    test!(b"--ABC\r\n", 2, Boundary);
    test!(b"preamble\r\n--XYZ\r\n", 0, Boundary);
    test!(b"--XYZ\n", 5, BoundaryEnding);
    test!(b"--XYZ\rX", 6, BoundaryEnding);
    test!(b"--XYZ-X", 6, BoundaryEnding);
    test!(b"--XYZ\r\n: value\r\n", 7, EmptyHeaderName);
    test!(b"--XYZ\r\nBad Name: value\r\n", 10, HeaderName);
    test!(b"--XYZ\r\nName\r\n", 11, HeaderName);
    test!(b"--XYZ\r\nName: value\rX", 19, HeaderValueEnding);
    test!(b"--XYZ\r\nName: value\r\n\rX", 21, HeadersEnding);
}

#[test]
fn test_finish() {
    // truncated inside the closing delimiter
    let input = b"--XYZ\r\n\r\nhello\r\n--XY";
    let mut tokenizer = Tokenizer::new("XYZ");
    let mut recorder = Recorder::default();

    assert_eq!(tokenizer.feed(input, &mut recorder), input.len());
    assert!(!tokenizer.stopped());
    assert!(!tokenizer.has_error());

    tokenizer.finish();
    assert!(tokenizer.has_error());
    assert!(!tokenizer.succeeded());
    assert_eq!(tokenizer.error(), Some(&ParseError::UnexpectedEof));
    assert_eq!(recorder.events, [PartBegin, HeadersEnd, data(b"hello")]);

    // complete stream
    let mut tokenizer = Tokenizer::new("XYZ");
    tokenizer.feed(FORM, ());
    tokenizer.finish();
    assert!(tokenizer.succeeded());
    assert!(!tokenizer.has_error());
}

#[test]
fn test_invalid_boundary() {
    let long = "x".repeat(71);
    for boundary in ["", "a\r\nb", long.as_str()] {
        let mut tokenizer = Tokenizer::new(boundary);
        assert!(tokenizer.has_error());
        assert_eq!(tokenizer.error(), Some(&ParseError::InvalidBoundary));
        assert_eq!(tokenizer.feed(FORM, ()), 0);

        tokenizer.reset();
        assert!(tokenizer.has_error());
    }
}

#[test]
fn test_stop() {
    // stop at the first part begin, right after "--XYZ\r\n"
    let mut tokenizer = Tokenizer::new("XYZ");
    let mut recorder = Recorder::stop_after(1);

    assert_eq!(tokenizer.feed(FORM, &mut recorder), 7);
    assert!(tokenizer.stopped());
    assert!(!tokenizer.has_error());
    assert!(!tokenizer.succeeded());
    assert_eq!(tokenizer.error_message(), "");

    assert_eq!(tokenizer.feed(FORM, &mut recorder), 0);
    assert_eq!(recorder.events, [PartBegin]);

    // stop on body data, the delimiter CR is left unconsumed
    let mut tokenizer = Tokenizer::new("XYZ");
    let mut recorder = Recorder::stop_after(9);
    let body_at = FORM.windows(5).position(|e| e == b"hello").unwrap();

    assert_eq!(tokenizer.feed(FORM, &mut recorder), body_at + 5);
    assert_eq!(recorder.events, form_events()[..9]);

    // reset
    tokenizer.reset();
    let mut recorder = Recorder::default();
    assert!(!tokenizer.stopped());
    assert_eq!(tokenizer.feed(FORM, &mut recorder), FORM.len());
    assert_eq!(recorder.events, form_events());
}

#[test]
fn test_external_stop() {
    let mut tokenizer = Tokenizer::new("XYZ");
    tokenizer.stop();
    assert!(tokenizer.stopped());
    assert_eq!(tokenizer.feed(FORM, ()), 0);

    tokenizer.finish();
    assert!(!tokenizer.has_error());
}

#[test]
fn test_set_boundary() {
    let mut tokenizer = Tokenizer::new("XYZ");
    let mut recorder = Recorder::default();
    assert_eq!(tokenizer.feed(b"--XY", &mut recorder), 4);

    tokenizer.set_boundary("boundary-2");
    assert_eq!(tokenizer.boundary(), b"boundary-2");

    let input = b"--boundary-2\r\n\r\nbody\r\n--boundary-2--";
    assert_eq!(tokenizer.feed(input, &mut recorder), input.len());
    assert_eq!(recorder.events, [PartBegin, HeadersEnd, data(b"body"), PartEnd, End]);
    assert!(tokenizer.succeeded());
}
