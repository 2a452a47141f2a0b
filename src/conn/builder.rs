use super::Connection;

use std::os::fd::OwnedFd;
use std::sync::Arc;

/// Builder for configuring and creating connections.
///
/// # Examples
///
/// ```rust,ignore
/// let conn = ConnectionBuilder::new()
///     .blocking(true)
///     .finalize(false)
///     .file(fd);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConnectionBuilder {
    /// Leave the descriptor's flags alone instead of setting `O_NONBLOCK`.
    blocking: bool,

    /// Close the connection when it is dropped.
    finalize: bool,
}

impl ConnectionBuilder {
    /// Creates a builder for non-blocking, self-closing connections.
    pub fn new() -> Self {
        Self {
            blocking: false,
            finalize: true,
        }
    }

    /// Sets whether file connections keep the descriptor in blocking mode.
    pub fn blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }

    /// Sets whether the connection closes itself on drop.
    pub fn finalize(mut self, finalize: bool) -> Self {
        self.finalize = finalize;
        self
    }

    /// Builds a file connection that owns `fd`.
    pub fn file(self, fd: impl Into<OwnedFd>) -> Connection {
        let mut conn = if self.blocking {
            Connection::file_blocking(fd)
        } else {
            Connection::file(fd)
        };

        conn.set_finalize(self.finalize);
        conn
    }

    /// Builds a string connection over `data`. `blocking` does not apply.
    pub fn string(self, data: impl Into<Arc<[u8]>>) -> Connection {
        let mut conn = Connection::string(data);

        conn.set_finalize(self.finalize);
        conn
    }
}

impl Default for ConnectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
