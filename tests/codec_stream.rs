use futures::{SinkExt, StreamExt};
use pretty_assertions::assert_eq;
use smartparallel::protocol::READ_BUF_SIZE;
use smartparallel::serial::codec::FrameCodec;
use smartparallel::serial::SerialMessage;
use tokio::io::AsyncWriteExt;
use tokio_util::codec::{Decoder, Framed};

#[tokio::test]
async fn frames_arrive_across_split_writes() {
    let (mut device, host) = tokio::io::duplex(64);
    let mut frames = FrameCodec::default().framed(host);

    device.write_all(b"READY").await.unwrap();
    device.write_all(b"\nPF_").await.unwrap();
    device.write_all(b"EMPTY\n").await.unwrap();

    let first = frames.next().await.unwrap().unwrap();
    let second = frames.next().await.unwrap().unwrap();

    assert_eq!(first, b"READY");
    assert_eq!(second, b"PF_EMPTY");
}

#[tokio::test]
async fn oversized_frame_is_capped() {
    let (mut device, host) = tokio::io::duplex(4096);
    let mut frames = FrameCodec::default().framed(host);

    let mut blob = vec![b'z'; 2000];
    blob.push(b'\n');
    device.write_all(&blob).await.unwrap();

    let capped = frames.next().await.unwrap().unwrap();
    let rest = frames.next().await.unwrap().unwrap();

    assert_eq!(capped.len(), READ_BUF_SIZE);
    assert_eq!(rest.len(), 2000 - READ_BUF_SIZE);
}

#[tokio::test]
async fn sent_messages_get_the_null_terminator() {
    let (device, host) = tokio::io::duplex(64);
    let mut framed: Framed<_, FrameCodec> = FrameCodec::default().framed(host);

    framed.send(SerialMessage::from("hello")).await.unwrap();

    let mut device = tokio::io::BufReader::new(device);
    let mut received = vec![0u8; 6];
    tokio::io::AsyncReadExt::read_exact(&mut device, &mut received)
        .await
        .unwrap();

    assert_eq!(received, b"hello\0");
}

#[tokio::test]
async fn closed_device_ends_the_stream() {
    let (mut device, host) = tokio::io::duplex(64);
    let mut frames = FrameCodec::default().framed(host);

    device.write_all(b"last\n").await.unwrap();
    drop(device);

    assert_eq!(frames.next().await.unwrap().unwrap(), b"last");
    assert!(frames.next().await.is_none());
}

#[tokio::test]
async fn partial_frame_survives_device_close() {
    let (mut device, host) = tokio::io::duplex(64);
    let mut frames = FrameCodec::default().framed(host);

    // No terminator before the device goes away.
    device.write_all(b"partial").await.unwrap();
    drop(device);

    assert_eq!(frames.next().await.unwrap().unwrap(), b"partial");
    assert!(frames.next().await.is_none());
}
