//! Part Header List.
//!
//! [`Headers`] keeps every header of a single part in the order it was received. Names are not
//! unique, a repeated name is stored as another entry rather than overwriting the first one.
mod entry;
mod map;
mod iter;

pub use entry::HeaderEntry;
pub use map::Headers;
pub use iter::{GetAll, Iter};
