use libc::{F_GETFL, F_SETFL, O_NONBLOCK, POLLIN, c_int, close, fcntl, poll, pollfd, read, write};
use std::io;

pub(crate) use std::os::fd::RawFd;

/// Highest descriptor number belonging to the process' standard streams.
pub(crate) const STDIO_MAX: RawFd = 2;

/// One `read(2)` into `buffer`: `0` at end of file, negative on error.
///
/// Blocking and non-blocking descriptors are both accepted; on a
/// non-blocking one an empty pipe shows up as `EAGAIN` in `errno`.
pub(crate) fn sys_read(fd: RawFd, buffer: &mut [u8]) -> isize {
    unsafe { read(fd, buffer.as_mut_ptr() as *mut _, buffer.len()) }
}

/// One `write(2)` of `buffer`. The count may be short; negative on error.
pub(crate) fn sys_write(fd: RawFd, buffer: &[u8]) -> isize {
    unsafe { write(fd, buffer.as_ptr() as *const _, buffer.len()) }
}

/// Releases a descriptor owned by a connection. Errors are ignored, the
/// descriptor is gone either way.
pub(crate) fn sys_close(fd: RawFd) {
    unsafe { close(fd) };
}

/// Adds `O_NONBLOCK` to the descriptor's status flags, keeping the rest.
pub(crate) fn sys_set_nonblocking(fd: RawFd) -> io::Result<()> {
    let flags = unsafe { fcntl(fd, F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }

    let rc = unsafe { fcntl(fd, F_SETFL, flags | O_NONBLOCK) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}

/// Blocks until `fd` is readable, hung up, or in error.
///
/// There is no timeout. `Ok(())` means the caller should retry its read;
/// the read itself reports hang-up or error.
pub(crate) fn sys_wait_readable(fd: RawFd) -> io::Result<()> {
    let mut pfd = pollfd {
        fd,
        events: POLLIN,
        revents: 0,
    };

    let rc: c_int = unsafe { poll(&mut pfd, 1, -1) };
    if rc < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}
