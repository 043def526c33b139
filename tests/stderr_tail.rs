// tests/stderr_tail.rs

use ktalk::exec::StderrTail;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

#[test]
fn keeps_the_most_recent_bytes() {
    let tail = StderrTail::new(8);
    tail.push(b"hello ");
    tail.push(b"world");
    assert_eq!(tail.snapshot(), "lo world");

    tail.push(b"0123456789abcdef");
    assert_eq!(tail.snapshot(), "89abcdef");
}

#[test]
fn zero_capacity_keeps_nothing() {
    let tail = StderrTail::new(0);
    tail.push(b"anything");
    assert_eq!(tail.snapshot(), "");
}

#[test]
fn huge_capacity_does_not_preallocate() {
    let tail = StderrTail::new(usize::MAX);
    tail.push(b"still works");
    assert_eq!(tail.snapshot(), "still works");
}

#[test]
fn clones_share_the_buffer() {
    let tail = StderrTail::new(16);
    let other = tail.clone();
    other.push(b"shared");
    assert_eq!(tail.snapshot(), "shared");
}

#[test]
fn invalid_utf8_is_decoded_lossily() {
    let tail = StderrTail::new(16);
    tail.push(&[b'o', b'k', 0xff]);
    assert_eq!(tail.snapshot(), "ok\u{fffd}");
}

#[tokio::test]
async fn forward_keeps_draining_when_the_writer_fails() {
    let (mut writer_end, reader_end) = tokio::io::duplex(64);
    let (sink, sink_reader) = tokio::io::duplex(64);
    drop(sink_reader);
    let tail = StderrTail::new(32);

    let handle = tail.forward(reader_end, sink);

    writer_end.write_all(b"first ").await.unwrap();
    writer_end.write_all(b"second").await.unwrap();
    drop(writer_end);
    handle.await.unwrap();

    assert_eq!(tail.snapshot(), "first second");
}

#[tokio::test]
async fn forward_tees_and_records() {
    let (mut writer_end, reader_end) = tokio::io::duplex(64);
    let (sink, mut sink_reader) = tokio::io::duplex(4096);
    let tail = StderrTail::new(5);

    let handle = tail.forward(reader_end, sink);

    writer_end.write_all(b"error: boom").await.unwrap();
    drop(writer_end);
    handle.await.unwrap();

    let mut forwarded = String::new();
    sink_reader.read_to_string(&mut forwarded).await.unwrap();
    assert_eq!(forwarded, "error: boom");
    assert_eq!(tail.snapshot(), " boom");
}
