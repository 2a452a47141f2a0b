//! # scanconn
//!
//! **scanconn** gives a lexical scanner one byte-stream interface over two
//! kinds of input: operating-system file descriptors and in-memory byte
//! buffers. The scanner reads bytes, pushes one back, and reads whole
//! lines without knowing where the data comes from.
//!
//! - File connections read one byte at a time. A non-blocking descriptor
//!   that has no data parks the thread in `poll(2)` until it is readable,
//!   so callers never observe `EAGAIN`.
//! - File connections normalize `\r\n` and lone `\r` to `\n`. String
//!   connections deliver their bytes verbatim.
//! - End of file, read errors and an exhausted buffer all reset the
//!   connection to [`Kind::None`]. Further reads keep returning `None`.
//! - Closing never touches descriptors 0, 1 and 2.
//!
//! ## Quick Start
//!
//! ```rust
//! use scanconn::{Connection, ScanFeed};
//!
//! let mut conn = Connection::string(b"let x\n".to_vec());
//! let mut feed: ScanFeed<'_> = ScanFeed::bind(&mut conn);
//!
//! assert_eq!(feed.peek(), Some(b'l'));
//! let word: Vec<u8> = feed.by_ref().take_while(|b| *b != b' ').collect();
//! assert_eq!(word, b"let");
//! ```
//!
//! The crate targets Unix.

mod conn;
mod error;
mod scan;
mod sys;

pub use conn::{
    ByteGetter, Connection, ConnectionBuilder, FILE_GETTER, FileGetter, Kind, NULL_GETTER,
    NullGetter, STRING_GETTER, StringGetter,
};
pub use error::ConnError;
pub use scan::{INVALID_KIND_EXIT, ScanFeed};
