//! Scanner-side view of a connection.
//!
//! [`ScanFeed`] binds the right [`ByteGetter`] to a connection once and
//! carries the state a scanner keeps next to its input: a line counter,
//! a one-byte lookahead, and the value of the token being built.

use crate::conn::{ByteGetter, Connection, Kind};

use std::fmt;
use tracing::error;

/// Exit status used when a connection carries an unknown kind tag.
pub const INVALID_KIND_EXIT: i32 = 3;

/// A connection bound for scanning.
pub struct ScanFeed<'c, V = ()> {
    getter: &'static dyn ByteGetter,
    conn: &'c mut Connection,
    line: usize,
    cache: Option<u8>,
    value: Option<V>,
}

impl<'c, V> ScanFeed<'c, V> {
    /// Binds `conn`, selecting its getter from the current kind.
    pub fn bind(conn: &'c mut Connection) -> Self {
        let getter = conn.getter();

        Self {
            getter,
            conn,
            line: 0,
            cache: None,
            value: None,
        }
    }

    /// Binds `conn` using a raw kind tag supplied by the host.
    ///
    /// An unknown tag, or a tag that disagrees with the connection, means
    /// the host's record is corrupt. The process exits with
    /// [`INVALID_KIND_EXIT`].
    pub fn bind_tagged(tag: u8, conn: &'c mut Connection) -> Self {
        match Kind::from_tag(tag) {
            Some(kind) if kind == conn.kind() => Self::bind(conn),
            _ => invalid_kind(tag, conn),
        }
    }

    /// Returns the next byte, taking the lookahead first.
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = match self.cache.take() {
            Some(byte) => Some(byte),
            None => self.getter.get(self.conn),
        };

        if byte == Some(b'\n') {
            self.line += 1;
        }

        byte
    }

    /// Returns the next byte without consuming it.
    pub fn peek(&mut self) -> Option<u8> {
        if self.cache.is_none() {
            self.cache = self.getter.get(self.conn);
        }

        self.cache
    }

    /// Returns `byte` to the lookahead slot, replacing anything there.
    pub fn unget(&mut self, byte: u8) {
        if byte == b'\n' {
            self.line = self.line.saturating_sub(1);
        }

        self.cache = Some(byte);
    }

    /// Number of line feeds consumed so far.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the value of the token being built, if one was set.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Stores the value of the token being built, replacing any previous one.
    pub fn set_value(&mut self, value: V) {
        self.value = Some(value);
    }

    /// Takes the stored token value, leaving the slot empty.
    pub fn take_value(&mut self) -> Option<V> {
        self.value.take()
    }

    /// Returns the bound connection, e.g. to check whether it is closed.
    pub fn connection(&self) -> &Connection {
        &*self.conn
    }

    /// Re-selects the getter and clears the scan state.
    pub fn reset(&mut self) {
        self.getter = self.conn.getter();
        self.line = 0;
        self.cache = None;
        self.value = None;
    }
}

impl<V: fmt::Debug> fmt::Debug for ScanFeed<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanFeed")
            .field("conn", &self.conn)
            .field("line", &self.line)
            .field("cache", &self.cache)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl<V> Iterator for ScanFeed<'_, V> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.next_byte()
    }
}

fn invalid_kind(tag: u8, conn: &Connection) -> ! {
    error!(tag, kind = %conn.kind(), "connection has an unknown kind tag");
    eprintln!(
        "connection {:p} has unknown kind tag {tag}",
        conn as *const Connection
    );

    std::process::exit(INVALID_KIND_EXIT);
}
