//! Multipart Reader.
//!
//! [`Reader`] owns a [`Tokenizer`] and reassembles its span events into whole units:
//!
//! - part begin, with the complete [`Headers`] of the part
//! - part data, a body fragment borrowed from the fed buffer
//! - part end
//! - end of stream
//!
//! All callbacks run synchronously inside [`Reader::feed`], in stream order. Arguments are only
//! valid for the duration of the callback, copy them to keep them.
//!
//! Parse failure is never reported through callbacks, the status should be polled after each
//! feed with [`Reader::has_error`] and [`Reader::stopped`].
mod aggregator;
mod stop;

pub use stop::StopHandle;

use bytes::Buf;

use crate::headers::Headers;
use crate::log::debug;
use crate::tokenizer::{ParseError, Tokenizer};
use aggregator::{Accumulator, Aggregator, Callbacks};


/// Incremental multipart reader.
///
/// ```
/// use std::{cell::RefCell, rc::Rc};
/// use multipart_reader::Reader;
///
/// let names = Rc::new(RefCell::new(Vec::new()));
/// let mut reader = Reader::new("AaB03x");
///
/// let sink = names.clone();
/// reader.on_part_begin(move |headers| {
///     sink.borrow_mut().push(headers.get("Content-Disposition").to_owned());
/// });
///
/// let input = b"--AaB03x\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n1\r\n\
///               --AaB03x\r\nContent-Disposition: form-data; name=\"b\"\r\n\r\n2\r\n\
///               --AaB03x--";
///
/// // chunks may split the stream anywhere
/// for chunk in input.chunks(5) {
///     reader.feed(chunk);
/// }
///
/// assert!(reader.succeeded());
/// assert_eq!(
///     *names.borrow(),
///     ["form-data; name=\"a\"", "form-data; name=\"b\""],
/// );
/// ```
pub struct Reader {
    tokenizer: Tokenizer,
    accumulator: Accumulator,
    callbacks: Callbacks,
    stop: StopHandle,
}

impl Reader {
    /// Create new [`Reader`] for given boundary, with no callback registered.
    ///
    /// The boundary is the `boundary` parameter of the `Content-Type`, see
    /// [`parse_boundary`][crate::parse_boundary]. An invalid boundary puts the reader in error
    /// state.
    pub fn new(boundary: impl AsRef<[u8]>) -> Self {
        Self {
            tokenizer: Tokenizer::new(boundary),
            accumulator: Accumulator::default(),
            callbacks: Callbacks::default(),
            stop: StopHandle::new(),
        }
    }

    /// Start a fresh parse.
    ///
    /// Callbacks and boundary are retained, a pending stop request is cleared.
    ///
    /// Must not be called from inside a callback.
    pub fn reset(&mut self) {
        self.tokenizer.reset();
        self.accumulator.clear();
        self.stop.clear();
    }

    /// Replace the boundary used by subsequent feeds, this also starts a fresh parse.
    ///
    /// Must not be called from inside a callback.
    pub fn set_boundary(&mut self, boundary: impl AsRef<[u8]>) {
        self.tokenizer.set_boundary(boundary);
        self.accumulator.clear();
        self.stop.clear();
    }

    /// Returns the current boundary.
    #[inline]
    pub fn boundary(&self) -> &[u8] {
        self.tokenizer.boundary()
    }
}

// ===== Callbacks =====

impl Reader {
    /// Called once per part, after all of its headers are read and before its first data.
    pub fn on_part_begin<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnMut(&Headers) + 'static,
    {
        self.callbacks.part_begin = Some(Box::new(callback));
        self
    }

    /// Called with a fragment of the current part body.
    ///
    /// A body may be split into any number of fragments.
    pub fn on_part_data<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnMut(&[u8]) + 'static,
    {
        self.callbacks.part_data = Some(Box::new(callback));
        self
    }

    /// Called when the current part is closed.
    pub fn on_part_end<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnMut() + 'static,
    {
        self.callbacks.part_end = Some(Box::new(callback));
        self
    }

    /// Called when the closing boundary is found.
    pub fn on_end<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnMut() + 'static,
    {
        self.callbacks.end = Some(Box::new(callback));
        self
    }

    /// Unregister all callbacks.
    pub fn clear_callbacks(&mut self) {
        self.callbacks = Callbacks::default();
    }

    /// Returns a handle that requests stop from inside a callback.
    #[inline]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }
}

// ===== Feed =====

impl Reader {
    /// Feed the next bytes of the stream.
    ///
    /// Returns the number of bytes consumed. A value less than `buf.len()` means parsing halted,
    /// by malformed input or by a stop request, and the rest was not processed.
    pub fn feed(&mut self, buf: &[u8]) -> usize {
        if self.stop.is_stop_requested() && !self.tokenizer.stopped() {
            debug!("stop requested outside of callback");
            self.tokenizer.stop();
        }

        let aggregator = Aggregator {
            acc: &mut self.accumulator,
            callbacks: &mut self.callbacks,
            stop: &self.stop,
        };
        self.tokenizer.feed(buf, aggregator)
    }

    /// Feed every chunk of `buf`, advancing it by the consumed bytes.
    ///
    /// Stops at the first chunk that is not fully consumed. Returns the total consumed bytes.
    pub fn feed_buf<B: Buf>(&mut self, buf: &mut B) -> usize {
        let mut total = 0;
        while buf.has_remaining() {
            let chunk = buf.chunk();
            let len = chunk.len();
            let consumed = self.feed(chunk);
            buf.advance(consumed);
            total += consumed;
            if consumed < len {
                break;
            }
        }
        total
    }

    /// Declare that no more input will be fed.
    ///
    /// If the closing boundary has not been found, the reader goes into error state with
    /// [`ParseError::UnexpectedEof`]. Any partially read part is discarded without callback.
    pub fn finish(&mut self) {
        self.tokenizer.finish();
    }
}

// ===== Status =====

impl Reader {
    /// Returns `true` if the closing boundary is found without error.
    #[inline]
    pub fn succeeded(&self) -> bool {
        self.tokenizer.succeeded()
    }

    /// Returns `true` if malformed input is found.
    #[inline]
    pub fn has_error(&self) -> bool {
        self.tokenizer.has_error()
    }

    /// Returns `true` if parsing halted, by error, by stop request, or by the closing boundary.
    #[inline]
    pub fn stopped(&self) -> bool {
        self.tokenizer.stopped()
    }

    /// Returns the error, if any.
    #[inline]
    pub fn error(&self) -> Option<&ParseError> {
        self.tokenizer.error()
    }

    /// Returns the error description, or empty string if there is no error.
    #[inline]
    pub fn error_message(&self) -> &str {
        self.tokenizer.error_message()
    }
}

impl std::fmt::Debug for Reader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reader")
            .field("tokenizer", &self.tokenizer)
            .field("accumulator", &self.accumulator)
            .field("callbacks", &self.callbacks)
            .field("stop", &self.stop.is_stop_requested())
            .finish()
    }
}
