use crate::conn::Kind;

use std::io;

/// Errors returned by connection operations that can be misused.
///
/// Reads never produce a `ConnError`: end-of-stream and read failures
/// both surface as `None` from the byte getters.
#[derive(Debug, thiserror::Error)]
pub enum ConnError {
    #[error("{op} is not supported on a {kind} connection")]
    Unsupported { op: &'static str, kind: Kind },

    #[error("line buffer must hold at least the terminator")]
    ZeroCapacity,

    #[error("connection I/O failed: {0}")]
    Io(#[from] io::Error),
}
