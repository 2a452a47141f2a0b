use super::Connection;
use crate::error::ConnError;
use crate::sys::platform::sys_write;

use std::io;

impl Connection {
    /// Writes `buffer` with a single `write(2)` call.
    ///
    /// Returns the number of bytes written, which may be short. No
    /// readiness wait happens here: a full non-blocking descriptor
    /// reports [`io::ErrorKind::WouldBlock`].
    ///
    /// # Errors
    ///
    /// [`ConnError::Unsupported`] unless this is a file connection, and
    /// [`ConnError::Io`] if the write fails.
    pub fn write(&mut self, buffer: &[u8]) -> Result<usize, ConnError> {
        let Some(fd) = self.fd() else {
            return Err(ConnError::Unsupported {
                op: "write",
                kind: self.kind(),
            });
        };

        let n = sys_write(fd, buffer);
        if n < 0 {
            return Err(io::Error::last_os_error().into());
        }

        Ok(n as usize)
    }

    /// Writes the bytes of `s`. See [`write`](Self::write).
    pub fn write_str(&mut self, s: &str) -> Result<usize, ConnError> {
        self.write(s.as_bytes())
    }
}
