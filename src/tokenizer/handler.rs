/// Whether the [`Tokenizer`] should keep going after an event.
///
/// [`Tokenizer`]: super::Tokenizer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Flow {
    /// Continue scanning.
    #[default]
    Continue,
    /// Halt immediately, the rest of the buffer is left unconsumed.
    Stop,
}

impl Flow {
    /// Returns `true` if the flow is [`Stop`].
    ///
    /// [`Stop`]: Flow::Stop
    #[inline]
    pub const fn is_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }
}

/// Receiver of low-level multipart events.
///
/// Every event is delivered synchronously from inside [`Tokenizer::feed`]. Span arguments borrow
/// the buffer passed to `feed`, or the tokenizer internal lookbehind buffer, and are only valid
/// for the duration of the call.
///
/// A logical header name, header value, or body may be split into any number of span events.
/// Empty spans are never delivered.
///
/// All methods default to no-op.
///
/// [`Tokenizer::feed`]: super::Tokenizer::feed
pub trait Handler {
    /// A part is opened, its headers follow.
    fn part_begin(&mut self) -> Flow {
        Flow::Continue
    }

    /// Fragment of the current header name.
    fn header_field(&mut self, span: &[u8]) -> Flow {
        let _ = span;
        Flow::Continue
    }

    /// Fragment of the current header value.
    fn header_value(&mut self, span: &[u8]) -> Flow {
        let _ = span;
        Flow::Continue
    }

    /// Current header is complete.
    fn header_end(&mut self) -> Flow {
        Flow::Continue
    }

    /// All headers of the current part are complete.
    fn headers_end(&mut self) -> Flow {
        Flow::Continue
    }

    /// Fragment of the current part body.
    fn part_data(&mut self, span: &[u8]) -> Flow {
        let _ = span;
        Flow::Continue
    }

    /// Current part is closed.
    fn part_end(&mut self) -> Flow {
        Flow::Continue
    }

    /// Closing boundary found, the stream is complete.
    fn end(&mut self) -> Flow {
        Flow::Continue
    }
}

/// Discards every event.
impl Handler for () { }

impl<H: Handler + ?Sized> Handler for &mut H {
    fn part_begin(&mut self) -> Flow {
        (**self).part_begin()
    }

    fn header_field(&mut self, span: &[u8]) -> Flow {
        (**self).header_field(span)
    }

    fn header_value(&mut self, span: &[u8]) -> Flow {
        (**self).header_value(span)
    }

    fn header_end(&mut self) -> Flow {
        (**self).header_end()
    }

    fn headers_end(&mut self) -> Flow {
        (**self).headers_end()
    }

    fn part_data(&mut self, span: &[u8]) -> Flow {
        (**self).part_data(span)
    }

    fn part_end(&mut self) -> Flow {
        (**self).part_end()
    }

    fn end(&mut self) -> Flow {
        (**self).end()
    }
}
