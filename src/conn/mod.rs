//! Source-agnostic byte connections.
//!
//! A [`Connection`] wraps either an operating-system file descriptor or an
//! in-memory byte buffer and hands out one byte at a time through a
//! [`ByteGetter`]. File-backed connections normalize `\r\n` and lone `\r`
//! into `\n`; string-backed connections deliver their bytes verbatim.
//!
//! Exhausting a connection (end of file, read failure, or end of buffer)
//! resets it to [`Kind::None`]; every later read returns `None`.

mod builder;
mod getter;
mod line;
mod write;

pub use builder::ConnectionBuilder;
pub use getter::{
    ByteGetter, FILE_GETTER, FileGetter, NULL_GETTER, NullGetter, STRING_GETTER, StringGetter,
};

use crate::sys::platform::{STDIO_MAX, sys_close, sys_set_nonblocking};

use std::fmt;
use std::os::fd::{FromRawFd, IntoRawFd, OwnedFd, RawFd};
use std::sync::Arc;
use tracing::{debug, warn};

/// The source behind a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Kind {
    /// Closed or exhausted. No handle.
    None = 0,
    /// Backed by a file descriptor.
    File = 1,
    /// Backed by an in-memory byte buffer.
    String = 2,
}

impl Kind {
    /// Decodes a raw kind tag as stored by a host object model.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Kind::None),
            1 => Some(Kind::File),
            2 => Some(Kind::String),
            _ => None,
        }
    }

    /// Returns the raw tag for this kind.
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::None => "closed",
            Kind::File => "file",
            Kind::String => "string",
        };

        f.write_str(name)
    }
}

/// Kind-dependent payload of a connection.
#[derive(Debug)]
pub(crate) enum Handle {
    None,
    File { fd: RawFd },
    String { data: Arc<[u8]>, cursor: usize },
}

/// The one-slot pushback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pushback {
    Empty,
    /// A byte to re-deliver on the next read.
    Byte(u8),
    /// The previous byte was a `\r`; drop the next byte if it is `\n`.
    SwallowLf,
}

/// A byte stream over a file descriptor or an in-memory buffer.
///
/// A connection has exactly one owner. All operations take `&mut self`,
/// and there is no internal locking.
///
/// When `finalize` is set (the default), dropping the connection closes
/// it. Descriptors 0, 1 and 2 are never closed.
#[derive(Debug)]
pub struct Connection {
    handle: Handle,
    pushback: Pushback,
    finalize: bool,
}

impl Connection {
    fn with_handle(handle: Handle) -> Self {
        Self {
            handle,
            pushback: Pushback::Empty,
            finalize: true,
        }
    }

    /// Creates a non-blocking connection that owns `fd`.
    ///
    /// The descriptor is switched to `O_NONBLOCK`. Reads that would block
    /// wait for readiness internally, so callers never see `EAGAIN`.
    pub fn file(fd: impl Into<OwnedFd>) -> Self {
        let fd = fd.into().into_raw_fd();

        if let Err(err) = sys_set_nonblocking(fd) {
            warn!(fd, error = %err, "could not set O_NONBLOCK; reads will block");
        }

        Self::with_handle(Handle::File { fd })
    }

    /// Creates a connection that owns `fd`, without touching its flags.
    pub fn file_blocking(fd: impl Into<OwnedFd>) -> Self {
        Self::with_handle(Handle::File {
            fd: fd.into().into_raw_fd(),
        })
    }

    /// Creates a file connection over a raw descriptor.
    ///
    /// This is how a connection is placed on a standard stream: descriptors
    /// 0, 1 and 2 are never closed by the connection.
    ///
    /// # Safety
    ///
    /// `fd` must be open, and the caller must own it: once passed in, the
    /// connection closes it on [`close`](Self::close) or drop (unless it is
    /// 0, 1 or 2), so nothing else may close it or keep using it as its own.
    pub unsafe fn from_raw_fd(fd: RawFd, blocking: bool) -> Self {
        if !blocking {
            if let Err(err) = sys_set_nonblocking(fd) {
                warn!(fd, error = %err, "could not set O_NONBLOCK; reads will block");
            }
        }

        Self::with_handle(Handle::File { fd })
    }

    /// Creates a read-only connection over an in-memory buffer.
    pub fn string(data: impl Into<Arc<[u8]>>) -> Self {
        Self::with_handle(Handle::String {
            data: data.into(),
            cursor: 0,
        })
    }

    /// Returns the current source kind.
    pub fn kind(&self) -> Kind {
        match self.handle {
            Handle::None => Kind::None,
            Handle::File { .. } => Kind::File,
            Handle::String { .. } => Kind::String,
        }
    }

    /// Returns `true` once the connection has been closed or exhausted.
    pub fn is_closed(&self) -> bool {
        matches!(self.handle, Handle::None)
    }

    /// Returns the descriptor of a file connection.
    pub fn fd(&self) -> Option<RawFd> {
        match self.handle {
            Handle::File { fd } => Some(fd),
            _ => None,
        }
    }

    /// Returns the read cursor of a string connection.
    pub fn position(&self) -> Option<usize> {
        match &self.handle {
            Handle::String { cursor, .. } => Some(*cursor),
            _ => None,
        }
    }

    /// Returns the number of unread bytes of a string connection.
    pub fn remaining(&self) -> Option<usize> {
        match &self.handle {
            Handle::String { data, cursor } => Some(data.len() - cursor),
            _ => None,
        }
    }

    /// Whether dropping the connection closes it.
    pub fn finalize(&self) -> bool {
        self.finalize
    }

    /// Sets whether dropping the connection closes it.
    pub fn set_finalize(&mut self, finalize: bool) {
        self.finalize = finalize;
    }

    /// Returns the getter matching the current kind.
    pub fn getter(&self) -> &'static dyn ByteGetter {
        getter::for_kind(self.kind())
    }

    /// Reads the next byte, or `None` at end-of-stream.
    pub fn get_byte(&mut self) -> Option<u8> {
        self.getter().get(self)
    }

    /// Pushes `byte` back so that the next read returns it.
    ///
    /// The slot holds one byte; a second push replaces the first.
    /// Pushing back onto a closed connection has no effect.
    pub fn push_back(&mut self, byte: u8) {
        if self.is_closed() {
            return;
        }

        self.pushback = Pushback::Byte(byte);
    }

    /// Takes a pushed-back byte, leaving the `\r` marker alone.
    fn take_pushed(&mut self) -> Option<u8> {
        match self.pushback {
            Pushback::Byte(byte) => {
                self.pushback = Pushback::Empty;
                Some(byte)
            }
            _ => None,
        }
    }

    /// Releases the underlying resource and resets to [`Kind::None`].
    ///
    /// Descriptors 0, 1 and 2 stay open. Closing twice is a no-op.
    pub fn close(&mut self) {
        match &self.handle {
            Handle::File { fd } if *fd > STDIO_MAX => {
                sys_close(*fd);
                debug!(fd = *fd, "closed file connection");
            }
            Handle::File { fd } => {
                debug!(fd = *fd, "detached standard stream without closing it");
            }
            Handle::String { cursor, .. } => {
                debug!(cursor = *cursor, "closed string connection");
            }
            Handle::None => {}
        }

        self.handle = Handle::None;
        self.pushback = Pushback::Empty;
    }

    /// Detaches and returns the descriptor without closing it.
    ///
    /// Ownership moves to the returned [`OwnedFd`], which closes the
    /// descriptor when dropped, standard streams included. The connection
    /// is left in [`Kind::None`].
    pub fn take_fd(&mut self) -> Option<OwnedFd> {
        let fd = self.fd()?;

        self.handle = Handle::None;
        self.pushback = Pushback::Empty;

        // The connection owned `fd` and has just given it up.
        Some(unsafe { OwnedFd::from_raw_fd(fd) })
    }
}

impl Drop for Connection {
    /// Closes the connection if `finalize` is set.
    fn drop(&mut self) {
        if self.finalize {
            self.close();
        }
    }
}
