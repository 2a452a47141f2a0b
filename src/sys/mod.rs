//! Platform syscall layer.
//!
//! Connections talk to the operating system only through the helpers
//! re-exported here, so the byte getters never touch `libc` directly.

#[cfg(unix)]
pub(crate) mod unix;

#[cfg(unix)]
pub(crate) use unix as platform;
