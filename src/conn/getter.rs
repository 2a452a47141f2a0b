use super::{Connection, Handle, Kind, Pushback};
use crate::sys::platform::{RawFd, sys_read, sys_wait_readable};

use std::io;
use tracing::{debug, trace};

/// Produces the next byte of a connection.
///
/// Implementations return `None` at end-of-stream and on any read failure.
/// A failed or exhausted connection is closed before `None` is returned.
pub trait ByteGetter: Sync {
    fn get(&self, conn: &mut Connection) -> Option<u8>;
}

/// Getter for descriptor-backed connections.
///
/// Normalizes `\r\n` and lone `\r` to a single `\n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileGetter;

/// Getter for buffer-backed connections. Bytes are delivered verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringGetter;

/// Getter for closed connections. Always at end-of-stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGetter;

pub static FILE_GETTER: FileGetter = FileGetter;
pub static STRING_GETTER: StringGetter = StringGetter;
pub static NULL_GETTER: NullGetter = NullGetter;

/// Selects the getter for `kind`.
pub(crate) fn for_kind(kind: Kind) -> &'static dyn ByteGetter {
    match kind {
        Kind::None => &NULL_GETTER,
        Kind::File => &FILE_GETTER,
        Kind::String => &STRING_GETTER,
    }
}

impl ByteGetter for FileGetter {
    fn get(&self, conn: &mut Connection) -> Option<u8> {
        let fd = conn.fd()?;

        if let Some(byte) = conn.take_pushed() {
            return Some(byte);
        }

        loop {
            let Some(byte) = read_byte(fd) else {
                conn.close();
                return None;
            };

            if conn.pushback == Pushback::SwallowLf {
                conn.pushback = Pushback::Empty;

                if byte == b'\n' {
                    continue;
                }
            }

            if byte == b'\r' {
                conn.pushback = Pushback::SwallowLf;
                return Some(b'\n');
            }

            return Some(byte);
        }
    }
}

impl ByteGetter for StringGetter {
    fn get(&self, conn: &mut Connection) -> Option<u8> {
        if conn.is_closed() {
            return None;
        }

        if let Some(byte) = conn.take_pushed() {
            return Some(byte);
        }

        let Handle::String { data, cursor } = &mut conn.handle else {
            return None;
        };

        if *cursor >= data.len() {
            conn.close();
            return None;
        }

        let byte = data[*cursor];
        *cursor += 1;

        Some(byte)
    }
}

impl ByteGetter for NullGetter {
    fn get(&self, _conn: &mut Connection) -> Option<u8> {
        None
    }
}

/// Reads exactly one byte from `fd`, waiting for readiness as needed.
///
/// `EAGAIN` parks the thread in `poll(2)` with no timeout and then retries.
/// `EINTR` on either the read or the wait retries. End of file, any other
/// read error, or any other wait error yields `None`.
pub(crate) fn read_byte(fd: RawFd) -> Option<u8> {
    let mut buffer = [0u8; 1];

    loop {
        let n = sys_read(fd, &mut buffer);

        if n > 0 {
            return Some(buffer[0]);
        }

        if n == 0 {
            debug!(fd, "end of file");
            return None;
        }

        let err = io::Error::last_os_error();

        match err.kind() {
            io::ErrorKind::WouldBlock => {
                trace!(fd, "read would block; waiting for readiness");

                match sys_wait_readable(fd) {
                    Ok(()) => continue,
                    Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                    Err(err) => {
                        debug!(fd, error = %err, "readiness wait failed");
                        return None;
                    }
                }
            }

            io::ErrorKind::Interrupted => continue,

            _ => {
                debug!(fd, error = %err, "read failed");
                return None;
            }
        }
    }
}
