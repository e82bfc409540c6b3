use std::{io, string};

use bytes::{Buf, BytesMut};
use thiserror::Error;
use tokio_util::codec::{Decoder, Encoder};

use crate::protocol::{READ_BUF_SIZE, RECEIVE_TERMINATOR, SEND_TERMINATOR};
use crate::serial::SerialMessage;

/// Errors the codec may produce.
#[derive(Debug, Error)]
pub enum CodecError {
    /// IO related errors.
    #[error("Underlying IO problem")]
    Io(#[from] io::Error),

    /// Utf8 related errors.
    #[error("Problem with UTF8 conversion")]
    Utf8(#[from] string::FromUtf8Error),
}

/// Framing codec for the SmartParallel link.
///
/// Decoding splits the byte stream at a delimiter (the device's receive
/// terminator by default), never yielding the delimiter itself. A frame
/// reaching the cap before any delimiter is yielded as-is, truncated,
/// matching the behaviour of the synchronous
/// [`FrameReader`](crate::serial::frame::FrameReader).
///
/// Encoding optionally appends a terminator to each message; by default
/// the device's *send* terminator (null), which is deliberately not the
/// same byte as the read delimiter.
#[derive(Debug, Clone)]
pub struct FrameCodec {
    /// How far we have looked for a delimiter into the buffer.
    cursor: usize,

    /// How to delimit incoming byte streams.
    /// This delimiter is not included in the yielded frames.
    read_delimiter: u8,

    /// If provided, which byte to append when writing (encoding) messages.
    /// If `None`, forwards the data as-is.
    write_terminator: Option<u8>,

    /// Cap on a single decoded frame.
    max_frame_len: usize,
}

impl FrameCodec {
    /// Create a new codec. A zero `max_frame_len` is treated as 1,
    /// since a zero cap would decode empty frames forever.
    pub fn new(read_delimiter: u8, write_terminator: Option<u8>, max_frame_len: usize) -> Self {
        Self {
            cursor: 0,
            read_delimiter,
            write_terminator,
            max_frame_len: max_frame_len.max(1),
        }
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(RECEIVE_TERMINATOR, Some(SEND_TERMINATOR), READ_BUF_SIZE)
    }
}

impl Decoder for FrameCodec {
    type Item = Vec<u8>;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // A frame can never be longer than the cap, so a delimiter past
        // it does not count for this frame.
        let read_to = src.len().min(self.max_frame_len);

        let look_at = &src[self.cursor..read_to];

        if let Some(position) = look_at.iter().position(|&byte| byte == self.read_delimiter) {
            // Since we might "start late" in the buffer (from the cursor),
            // the "global" position within the buffer has to be calculated.
            let actual_position = self.cursor + position;

            // Next time we need to start over.
            self.cursor = 0;

            // Split at the delimiter, getting a slice of the bytes before it.
            let line = src.split_to(actual_position);

            // Discard the delimiter by advancing the source buffer beyond it.
            src.advance(1);

            Ok(Some(line[..].to_vec()))
        } else if src.len() >= self.max_frame_len {
            // No delimiter within a full frame's worth of bytes.
            // Yield the capped frame; the remainder starts a new one.
            self.cursor = 0;

            let line = src.split_to(self.max_frame_len);

            Ok(Some(line[..].to_vec()))
        } else {
            // We did not find a full frame.
            // The next time we are called the same buffer `src` will be
            // provided to us (same starting point), but possibly with more
            // data. Since our job is to find the delimiter, we don't need
            // to re-read the bytes we have already looked at.
            self.cursor = read_to;

            // Indicate that we need more bytes to look at.
            Ok(None)
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None if src.is_empty() => Ok(None),
            None => {
                // The stream closed mid-frame. Whatever accumulated is
                // still the device's last message; hand it over rather
                // than erroring it away.
                self.cursor = 0;

                let rest = src.split_to(src.len());

                Ok(Some(rest[..].to_vec()))
            }
        }
    }
}

impl Encoder<Vec<u8>> for FrameCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Vec<u8>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(&item);

        if let Some(terminator) = self.write_terminator {
            dst.extend_from_slice(&[terminator]);
        }
        Ok(())
    }
}

impl Encoder<SerialMessage> for FrameCodec {
    type Error = CodecError;

    fn encode(&mut self, item: SerialMessage, dst: &mut BytesMut) -> Result<(), Self::Error> {
        Encoder::<Vec<u8>>::encode(self, item.into_bytes(), dst)
    }
}
