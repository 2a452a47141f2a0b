#![allow(dead_code)]

use std::fs::File;
use std::io::{Read, Write};
use std::os::fd::{FromRawFd, OwnedFd, RawFd};

/// Installs a test subscriber; events show up when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Creates a pipe and returns `(read_end, write_end)`.
pub fn pipe() -> (OwnedFd, OwnedFd) {
    let mut fds = [0; 2];
    let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };
    assert_eq!(rc, 0, "pipe failed: {}", std::io::Error::last_os_error());

    unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) }
}

/// Creates a pipe whose write end already holds `data` and is closed.
pub fn pipe_with(data: &[u8]) -> OwnedFd {
    let (reader, writer) = pipe();

    let mut writer = File::from(writer);
    writer.write_all(data).expect("write to pipe");

    reader
}

/// Drains `fd` to end of file.
pub fn read_all(fd: OwnedFd) -> Vec<u8> {
    let mut reader = File::from(fd);
    let mut out = Vec::new();
    reader.read_to_end(&mut out).expect("read pipe");
    out
}

/// Returns `true` if `fd` refers to an open descriptor.
pub fn is_open(fd: RawFd) -> bool {
    unsafe { libc::fcntl(fd, libc::F_GETFD) != -1 }
}

/// Returns `true` if `fd` has `O_NONBLOCK` set.
pub fn is_nonblocking(fd: RawFd) -> bool {
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    flags >= 0 && flags & libc::O_NONBLOCK != 0
}
