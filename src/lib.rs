//! Incremental Multipart Reader
//!
//! Feed a `multipart/*` body in chunks of any size and receive whole-unit events: complete part
//! headers, body fragments, end of part, and end of stream.
//!
//! - [`Reader`] the application facing event aggregator
//! - [`Tokenizer`] the low-level byte scanner emitting span events to a [`Handler`]
//! - [`Headers`] an ordered, duplicate permitting header list
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use multipart_reader::Reader;
//!
//! let body = Rc::new(RefCell::new(Vec::new()));
//! let mut reader = Reader::new("XYZ");
//!
//! let sink = body.clone();
//! reader.on_part_data(move |data| sink.borrow_mut().extend_from_slice(data));
//!
//! let input = b"--XYZ\r\nContent-Type: text/plain\r\n\r\nhello\r\n--XYZ--\r\n";
//! assert_eq!(reader.feed(input), input.len());
//! assert!(reader.succeeded());
//! assert_eq!(&body.borrow()[..], b"hello");
//! ```
#![warn(missing_debug_implementations)]

mod log;

pub mod boundary;
pub mod headers;
pub mod tokenizer;
pub mod reader;

pub use boundary::parse_boundary;
pub use headers::Headers;
pub use tokenizer::{Flow, Handler, ParseError, Tokenizer};
pub use reader::{Reader, StopHandle};
