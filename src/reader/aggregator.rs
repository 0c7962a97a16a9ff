use bytes::BytesMut;

use super::StopHandle;
use crate::headers::{HeaderEntry, Headers};
use crate::log::debug;
use crate::tokenizer::{Flow, Handler};

pub(crate) type PartBeginFn = Box<dyn FnMut(&Headers)>;
pub(crate) type PartDataFn = Box<dyn FnMut(&[u8])>;
pub(crate) type NotifyFn = Box<dyn FnMut()>;

/// Per part scratch state.
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    name: BytesMut,
    value: BytesMut,
    headers: Headers,
    /// Whether part begin callback has fired for the current part.
    headers_processed: bool,
}

impl Accumulator {
    pub(crate) fn clear(&mut self) {
        self.name.clear();
        self.value.clear();
        self.headers.clear();
        self.headers_processed = false;
    }

    fn commit_header(&mut self) {
        self.headers.push(HeaderEntry::from_bytes(&self.name, &self.value));
        self.name.clear();
        self.value.clear();
    }
}

/// Registered application callbacks, unset slot is no-op.
#[derive(Default)]
pub(crate) struct Callbacks {
    pub(crate) part_begin: Option<PartBeginFn>,
    pub(crate) part_data: Option<PartDataFn>,
    pub(crate) part_end: Option<NotifyFn>,
    pub(crate) end: Option<NotifyFn>,
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("part_begin", &self.part_begin.is_some())
            .field("part_data", &self.part_data.is_some())
            .field("part_end", &self.part_end.is_some())
            .field("end", &self.end.is_some())
            .finish()
    }
}

/// Turns tokenizer span events into whole unit callbacks.
///
/// Lives for a single feed call, borrowing the reader state.
pub(crate) struct Aggregator<'a> {
    pub(crate) acc: &'a mut Accumulator,
    pub(crate) callbacks: &'a mut Callbacks,
    pub(crate) stop: &'a StopHandle,
}

impl Aggregator<'_> {
    fn flow(&self) -> Flow {
        match self.stop.is_stop_requested() {
            true => Flow::Stop,
            false => Flow::Continue,
        }
    }
}

impl Handler for Aggregator<'_> {
    fn part_begin(&mut self) -> Flow {
        self.acc.clear();
        Flow::Continue
    }

    fn header_field(&mut self, span: &[u8]) -> Flow {
        self.acc.name.extend_from_slice(span);
        Flow::Continue
    }

    fn header_value(&mut self, span: &[u8]) -> Flow {
        self.acc.value.extend_from_slice(span);
        Flow::Continue
    }

    fn header_end(&mut self) -> Flow {
        self.acc.commit_header();
        Flow::Continue
    }

    fn headers_end(&mut self) -> Flow {
        debug!("part headers complete, {} fields", self.acc.headers.len());
        if let Some(callback) = &mut self.callbacks.part_begin {
            callback(&self.acc.headers);
        }
        self.acc.headers_processed = true;
        self.acc.headers.clear();
        self.acc.name.clear();
        self.acc.value.clear();
        self.flow()
    }

    fn part_data(&mut self, span: &[u8]) -> Flow {
        debug_assert!(self.acc.headers_processed, "part data before headers end");
        if let Some(callback) = &mut self.callbacks.part_data {
            callback(span);
        }
        self.flow()
    }

    fn part_end(&mut self) -> Flow {
        if let Some(callback) = &mut self.callbacks.part_end {
            callback();
        }
        self.flow()
    }

    fn end(&mut self) -> Flow {
        debug!("multipart stream complete");
        if let Some(callback) = &mut self.callbacks.end {
            callback();
        }
        self.flow()
    }
}

impl std::fmt::Debug for Aggregator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("acc", &self.acc)
            .field("callbacks", &self.callbacks)
            .finish()
    }
}
