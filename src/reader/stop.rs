use std::{cell::Cell, rc::Rc};

/// Request [`Reader`] to stop from inside a callback.
///
/// Obtained from [`Reader::stop_handle`], the handle can be cloned and moved into callbacks.
/// After a stop request, the current [`Reader::feed`] returns without invoking any further
/// callback, and subsequent feeds consume nothing until [`Reader::reset`].
///
/// [`Reader`]: super::Reader
/// [`Reader::stop_handle`]: super::Reader::stop_handle
/// [`Reader::feed`]: super::Reader::feed
/// [`Reader::reset`]: super::Reader::reset
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    requested: Rc<Cell<bool>>,
}

impl StopHandle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Request the reader to stop.
    #[inline]
    pub fn stop(&self) {
        self.requested.set(true);
    }

    /// Returns `true` if stop has been requested since the last reset.
    #[inline]
    pub fn is_stop_requested(&self) -> bool {
        self.requested.get()
    }

    pub(crate) fn clear(&self) {
        self.requested.set(false);
    }
}
