mod common;

use scanconn::{ConnError, Connection, ConnectionBuilder, Kind};

use std::fs::File;
use std::io::{ErrorKind, Write};
use std::os::fd::{AsRawFd, OwnedFd};

#[test]
fn write_passes_bytes_through_unchanged() {
    common::init_tracing();

    let (reader, writer) = common::pipe();
    let mut conn = Connection::file_blocking(writer);

    assert_eq!(conn.write(b"raw\r\n").unwrap(), 5);
    assert_eq!(conn.write_str("text").unwrap(), 4);
    drop(conn);

    assert_eq!(common::read_all(reader), b"raw\r\ntext");
}

#[test]
fn write_on_string_connection_is_unsupported() {
    let mut conn = Connection::string(b"read only".to_vec());

    let err = conn.write(b"nope").unwrap_err();

    assert!(matches!(
        err,
        ConnError::Unsupported { op: "write", kind: Kind::String }
    ));
    assert_eq!(err.to_string(), "write is not supported on a string connection");
}

#[test]
fn write_on_closed_connection_is_unsupported() {
    let (reader, writer) = common::pipe();
    let mut conn = Connection::file_blocking(writer);
    conn.close();

    assert!(matches!(
        conn.write_str("late"),
        Err(ConnError::Unsupported { kind: Kind::None, .. })
    ));

    assert!(common::read_all(reader).is_empty());
}

#[test]
fn write_to_broken_pipe_reports_io_error() {
    let (reader, writer) = common::pipe();
    drop(reader);

    let mut conn = Connection::file_blocking(writer);

    match conn.write(b"x") {
        Err(ConnError::Io(err)) => assert_eq!(err.kind(), ErrorKind::BrokenPipe),
        other => panic!("expected broken pipe, got {other:?}"),
    }
    assert_eq!(conn.kind(), Kind::File, "write errors do not close");
}

#[test]
fn close_is_idempotent() {
    let mut conn = Connection::file(common::pipe_with(b"abc"));

    conn.close();
    conn.close();

    assert_eq!(conn.kind(), Kind::None);
    assert_eq!(conn.fd(), None);
    for _ in 0..3 {
        assert_eq!(conn.get_byte(), None);
    }
}

#[test]
fn close_discards_pending_push_back() {
    let mut conn = Connection::string(b"abc".to_vec());
    conn.push_back(b'x');

    conn.close();

    assert_eq!(conn.get_byte(), None);
}

#[test]
fn standard_descriptors_survive_close_and_drop() {
    for fd in 0..=2 {
        let mut conn = unsafe { Connection::from_raw_fd(fd, true) };
        conn.close();

        assert_eq!(conn.kind(), Kind::None);
        assert!(common::is_open(fd), "descriptor {fd} was closed");

        drop(unsafe { Connection::from_raw_fd(fd, true) });
        assert!(common::is_open(fd), "descriptor {fd} was closed on drop");
    }
}

#[test]
fn drop_closes_owned_descriptor() {
    let (reader, writer) = common::pipe();

    drop(Connection::file_blocking(writer));

    assert!(common::read_all(reader).is_empty(), "reader should see end of file");
}

#[test]
fn connection_over_a_duplicate_leaves_the_original_open() {
    let (reader, writer) = common::pipe();
    let mut original = File::from(writer);

    let duplicate: OwnedFd = original.try_clone().expect("dup").into();
    let mut conn = Connection::file_blocking(duplicate);
    assert_ne!(conn.fd(), Some(original.as_raw_fd()));
    assert_eq!(conn.write_str("dup ").unwrap(), 4);
    drop(conn);

    assert!(common::is_open(original.as_raw_fd()));
    original.write_all(b"orig").expect("write through original handle");
    drop(original);

    assert_eq!(common::read_all(reader), b"dup orig");
}

#[test]
fn finalize_off_keeps_descriptor_open() {
    let (reader, writer) = common::pipe();

    let mut conn = Connection::file_blocking(writer);
    let raw = conn.fd().expect("file connection");
    conn.set_finalize(false);
    drop(conn);

    assert!(common::is_open(raw));

    // Nothing closed `raw`, so it is still ours to hand over.
    let mut again = unsafe { Connection::from_raw_fd(raw, true) };
    assert_eq!(again.write_str("still open").unwrap(), 10);
    drop(again);

    assert_eq!(common::read_all(reader), b"still open");
}

#[test]
fn take_fd_hands_back_ownership() {
    let (reader, writer) = common::pipe();
    let raw = writer.as_raw_fd();
    let mut conn = Connection::file_blocking(writer);

    let fd = conn.take_fd().expect("file connection");
    assert_eq!(fd.as_raw_fd(), raw);
    assert!(conn.is_closed());
    assert!(conn.take_fd().is_none());
    drop(conn);

    assert!(common::is_open(raw), "take_fd must not close");

    let mut writer = File::from(fd);
    writer.write_all(b"kept").expect("write through taken descriptor");
    drop(writer);

    assert_eq!(common::read_all(reader), b"kept");
}

#[test]
fn builder_applies_blocking_and_finalize() {
    let (reader, writer) = common::pipe();

    let conn = ConnectionBuilder::new().file(reader);
    assert!(common::is_nonblocking(conn.fd().expect("file connection")));
    assert!(conn.finalize());
    drop(conn);

    let mut conn = ConnectionBuilder::new()
        .blocking(true)
        .finalize(false)
        .file(writer);
    assert!(!common::is_nonblocking(conn.fd().expect("file connection")));
    assert!(!conn.finalize());

    conn.set_finalize(true);
    drop(conn);
}

#[test]
fn builder_makes_string_connections() {
    let mut conn = ConnectionBuilder::default().finalize(false).string(b"s".to_vec());

    assert_eq!(conn.kind(), Kind::String);
    assert!(!conn.finalize());
    assert_eq!(conn.get_byte(), Some(b's'));
}
