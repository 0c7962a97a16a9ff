//! Multipart Tokenizer.
//!
//! [`Tokenizer::feed`] works on chunked bytes, given any length of bytes, the tokenizer scans as
//! far as it can and reports structural events to a [`Handler`] as spans of the given buffer. A
//! token cut by the end of the buffer is reported up to the buffer end and continued on the next
//! call, so no input is ever buffered except the few bytes that may be the start of a delimiter.
//!
//! Stream grammar:
//!
//! ```not_rust
//! stream    = "--" boundary ( "--" / CRLF part *( CRLF "--" boundary CRLF part )
//!             CRLF "--" boundary "--" ) *OCTET
//! part      = *( header CRLF ) CRLF *OCTET
//! header    = token ":" *( SP / HTAB ) *( OCTET except CR )
//! ```
mod error;
mod handler;

pub use error::ParseError;
pub use handler::{Flow, Handler};

use crate::boundary::{self, Needle};
use crate::log::{debug, error};

#[cfg(test)]
mod test;

/// Report `$flow` result, halt when the handler requests it.
macro_rules! emit {
    ($self:ident, $flow:expr, $consumed:expr) => {
        let flow = $flow;
        if flow.is_stop() {
            return $self.halt($consumed);
        }
    };
}

/// Report non empty `$buf[$start..$end]` span.
macro_rules! emit_span {
    ($self:ident, $handler:ident.$method:ident, $buf:ident[$start:expr, $end:expr], $consumed:expr) => {
        let (start, end) = ($start, $end);
        if start < end {
            emit!($self, $handler.$method(&$buf[start..end]), $consumed);
        }
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Start,
    OpeningBoundary,
    HeaderFieldStart,
    HeaderField,
    HeaderValueStart,
    HeaderValue,
    HeaderValueAlmostDone,
    HeadersAlmostDone,
    PartDataStart,
    PartData,
    End,
    Error,
}

/// What follows a fully matched boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Closing {
    None,
    /// CR, another part follows.
    Part,
    /// `-`, end of stream.
    Last,
}

/// Tokens that were still open at the end of the previous buffer.
///
/// They continue from the start of the next buffer.
#[derive(Clone, Copy, Debug, Default)]
struct Marks {
    field: bool,
    value: bool,
    data: bool,
}

/// Low-level multipart scanner.
///
/// ```
/// use multipart_reader::{Flow, Handler, Tokenizer};
///
/// #[derive(Default)]
/// struct Count(usize);
///
/// impl Handler for Count {
///     fn part_begin(&mut self) -> Flow {
///         self.0 += 1;
///         Flow::Continue
///     }
/// }
///
/// let mut tokenizer = Tokenizer::new("XYZ");
/// let mut count = Count::default();
///
/// let input = b"--XYZ\r\n\r\na\r\n--XYZ\r\n\r\nb\r\n--XYZ--";
/// tokenizer.feed(input, &mut count);
///
/// assert!(tokenizer.succeeded());
/// assert_eq!(count.0, 2);
/// ```
#[derive(Debug)]
pub struct Tokenizer {
    needle: Needle,
    /// Bytes that matched the needle so far, at most the needle and one closing byte.
    lookbehind: Box<[u8]>,
    state: State,
    /// Matched length of the opening boundary or needle, or header name length.
    index: usize,
    closing: Closing,
    marks: Marks,
    stopped: bool,
    error: Option<ParseError>,
}

impl Tokenizer {
    /// Create new [`Tokenizer`] for given boundary.
    ///
    /// An invalid boundary, see [`boundary::validate`], does not panic. Instead the tokenizer
    /// starts in error state and consumes nothing.
    pub fn new(boundary: impl AsRef<[u8]>) -> Self {
        let needle = Needle::new(boundary.as_ref());
        let mut me = Self {
            lookbehind: vec![0; needle.len() + 2].into_boxed_slice(),
            needle,
            state: State::Start,
            index: 0,
            closing: Closing::None,
            marks: Marks::default(),
            stopped: false,
            error: None,
        };
        me.reset();
        me
    }

    /// Start a fresh parse, keeping the boundary.
    pub fn reset(&mut self) {
        self.index = 0;
        self.closing = Closing::None;
        self.marks = Marks::default();
        self.stopped = false;
        match boundary::validate(self.needle.boundary()) {
            Ok(()) => {
                self.state = State::Start;
                self.error = None;
            }
            Err(err) => {
                self.state = State::Error;
                self.error = Some(err.into());
            }
        }
    }

    /// Replace the boundary, and start a fresh parse.
    pub fn set_boundary(&mut self, boundary: impl AsRef<[u8]>) {
        self.needle = Needle::new(boundary.as_ref());
        self.lookbehind = vec![0; self.needle.len() + 2].into_boxed_slice();
        self.reset();
    }

    /// Returns the current boundary.
    #[inline]
    pub fn boundary(&self) -> &[u8] {
        self.needle.boundary()
    }

    /// Returns `true` if the closing boundary is found.
    #[inline]
    pub fn succeeded(&self) -> bool {
        matches!(self.state, State::End)
    }

    /// Returns `true` if malformed input is found.
    #[inline]
    pub fn has_error(&self) -> bool {
        matches!(self.state, State::Error)
    }

    /// Returns `true` if the tokenizer will not progress any further.
    ///
    /// This is the case after an error, after a stop requested by handler or by
    /// [`Tokenizer::stop`], and after the closing boundary.
    #[inline]
    pub fn stopped(&self) -> bool {
        self.stopped || matches!(self.state, State::Error | State::End)
    }

    /// Returns the error, if any.
    #[inline]
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Returns the error description, or empty string if there is no error.
    #[inline]
    pub fn error_message(&self) -> &str {
        self.error.as_ref().map_or("", ParseError::message)
    }

    /// Stop parsing, subsequent [`Tokenizer::feed`] consumes nothing until
    /// [`Tokenizer::reset`].
    pub fn stop(&mut self) {
        self.halt(0);
    }

    /// Declare that no more input will be fed.
    ///
    /// If the closing boundary has not been found, the tokenizer goes into error state with
    /// [`ParseError::UnexpectedEof`]. Does nothing if the tokenizer is already stopped.
    pub fn finish(&mut self) {
        if !self.stopped() {
            self.fail(ParseError::UnexpectedEof, 0);
        }
    }

    fn halt(&mut self, consumed: usize) -> usize {
        debug!("parsing stopped after {consumed} bytes");
        self.stopped = true;
        consumed
    }

    fn fail(&mut self, err: ParseError, consumed: usize) -> usize {
        error!("parse error after {consumed} bytes: {err}");
        self.state = State::Error;
        self.error = Some(err);
        consumed
    }
}

// ===== Feed =====

impl Tokenizer {
    /// Scan `buf`, delivering events to `handler`.
    ///
    /// Returns the number of bytes consumed. It is less than `buf.len()` only if parsing halted,
    /// either by malformed input or by a stop request, in which case the status should be
    /// inspected with [`has_error`] and [`stopped`].
    ///
    /// After the closing boundary, the remaining bytes are consumed and ignored.
    ///
    /// [`has_error`]: Tokenizer::has_error
    /// [`stopped`]: Tokenizer::stopped
    pub fn feed<H: Handler>(&mut self, buf: &[u8], mut handler: H) -> usize {
        if self.stopped || matches!(self.state, State::Error) {
            return 0;
        }

        let len = buf.len();
        let needle_len = self.needle.len();

        let mut field_mark = self.marks.field.then_some(0);
        let mut value_mark = self.marks.value.then_some(0);
        let mut data_mark = self.marks.data.then_some(0);

        let mut i = 0;

        // arms that `continue` re-examine the same byte in the new state
        while i < len {
            let mut c = buf[i];

            match self.state {
                State::Start => {
                    self.index = 0;
                    self.state = State::OpeningBoundary;
                    continue;
                }
                State::OpeningBoundary => {
                    let opening_len = self.needle.opening().len();

                    if self.index == opening_len {
                        match c {
                            b'\r' => self.closing = Closing::Part,
                            b'-' => self.closing = Closing::Last,
                            _ => return self.fail(ParseError::BoundaryEnding, i),
                        }
                        self.index += 1;
                    } else if self.index == opening_len + 1 {
                        match (self.closing, c) {
                            (Closing::Part, b'\n') => {
                                self.index = 0;
                                self.closing = Closing::None;
                                self.state = State::HeaderFieldStart;
                                emit!(self, handler.part_begin(), i + 1);
                            }
                            (Closing::Last, b'-') => {
                                self.closing = Closing::None;
                                self.state = State::End;
                                emit!(self, handler.end(), i + 1);
                            }
                            _ => return self.fail(ParseError::BoundaryEnding, i),
                        }
                    } else {
                        if self.needle.opening()[self.index] != c {
                            return self.fail(ParseError::Boundary, i);
                        }
                        self.index += 1;
                    }
                }
                State::HeaderFieldStart => {
                    self.state = State::HeaderField;
                    self.index = 0;
                    field_mark = Some(i);
                    continue;
                }
                State::HeaderField => {
                    if c == b'\r' {
                        if self.index != 0 {
                            return self.fail(ParseError::HeaderName, i);
                        }
                        field_mark = None;
                        self.state = State::HeadersAlmostDone;
                    } else if c == b':' {
                        if self.index == 0 {
                            return self.fail(ParseError::EmptyHeaderName, i);
                        }
                        self.state = State::HeaderValueStart;
                        if let Some(start) = field_mark.take() {
                            emit_span!(self, handler.header_field, buf[start, i], i + 1);
                        }
                    } else if is_token(c) {
                        self.index += 1;
                    } else {
                        return self.fail(ParseError::HeaderName, i);
                    }
                }
                State::HeaderValueStart => {
                    if !matches!(c, b' ' | b'\t') {
                        self.state = State::HeaderValue;
                        value_mark = Some(i);
                        continue;
                    }
                }
                State::HeaderValue => {
                    if c == b'\r' {
                        self.state = State::HeaderValueAlmostDone;
                        if let Some(start) = value_mark.take() {
                            emit_span!(self, handler.header_value, buf[start, i], i + 1);
                        }
                    }
                }
                State::HeaderValueAlmostDone => {
                    if c != b'\n' {
                        return self.fail(ParseError::HeaderValueEnding, i);
                    }
                    self.state = State::HeaderFieldStart;
                    emit!(self, handler.header_end(), i + 1);
                }
                State::HeadersAlmostDone => {
                    if c != b'\n' {
                        return self.fail(ParseError::HeadersEnding, i);
                    }
                    self.state = State::PartDataStart;
                    emit!(self, handler.headers_end(), i + 1);
                }
                State::PartDataStart => {
                    self.state = State::PartData;
                    self.index = 0;
                    data_mark = Some(i);
                    continue;
                }
                State::PartData => {
                    let prev_index = self.index;

                    if self.index == 0 {
                        // a needle can only overlap the probed byte if the byte is in the needle,
                        // otherwise skip a whole needle length
                        let tail = needle_len - 1;
                        let mut probe = i + tail;
                        while probe < len && !self.needle.contains(buf[probe]) {
                            probe += needle_len;
                        }
                        i = probe - tail;
                        if i >= len {
                            break;
                        }
                        c = buf[i];
                    }

                    if self.index < needle_len {
                        if self.needle.as_bytes()[self.index] == c {
                            if self.index == 0 {
                                if let Some(start) = data_mark.take() {
                                    emit_span!(self, handler.part_data, buf[start, i], i);
                                }
                            }
                            self.index += 1;
                        } else {
                            self.index = 0;
                        }
                    } else if self.index == needle_len {
                        match c {
                            b'\r' => {
                                self.index += 1;
                                self.closing = Closing::Part;
                            }
                            b'-' => {
                                self.index += 1;
                                self.closing = Closing::Last;
                            }
                            _ => self.index = 0,
                        }
                    } else {
                        match (self.closing, c) {
                            (Closing::Part, b'\n') => {
                                self.index = 0;
                                self.closing = Closing::None;
                                self.state = State::HeaderFieldStart;
                                emit!(self, handler.part_end(), i + 1);
                                emit!(self, handler.part_begin(), i + 1);
                                i += 1;
                                continue;
                            }
                            (Closing::Last, b'-') => {
                                self.index = 0;
                                self.closing = Closing::None;
                                self.state = State::End;
                                emit!(self, handler.part_end(), i + 1);
                                emit!(self, handler.end(), i + 1);
                                i += 1;
                                continue;
                            }
                            _ => {
                                self.index = 0;
                                self.closing = Closing::None;
                            }
                        }
                    }

                    if self.index > 0 {
                        self.lookbehind[self.index - 1] = c;
                    } else if prev_index > 0 {
                        // matched bytes turned out to be body data
                        emit!(self, handler.part_data(&self.lookbehind[..prev_index]), i);
                        data_mark = Some(i);
                        continue;
                    }
                }
                State::End => {
                    // epilogue
                    break;
                }
                State::Error => return i,
            }

            i += 1;
        }

        if let Some(start) = field_mark {
            emit_span!(self, handler.header_field, buf[start, len], len);
        }
        if let Some(start) = value_mark {
            emit_span!(self, handler.header_value, buf[start, len], len);
        }
        if let Some(start) = data_mark {
            emit_span!(self, handler.part_data, buf[start, len], len);
        }

        self.marks = Marks {
            field: field_mark.is_some(),
            value: value_mark.is_some(),
            data: data_mark.is_some(),
        };

        len
    }
}

/// RFC 7230 `tchar`.
const fn is_token(b: u8) -> bool {
    matches!(
        b,
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_'
            | b'`' | b'|' | b'~' | b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z'
    )
}
