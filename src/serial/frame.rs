use std::io::{ErrorKind, Read};
use std::time::Duration;

use tracing::trace;

use crate::protocol::{READ_BUF_SIZE, RECEIVE_TERMINATOR};
use crate::serial::SerialMessage;

/// How a frame read ended.
///
/// The reader never returns an `Err`: every call yields whatever bytes
/// were accumulated, and this status says why accumulation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// The receive terminator was seen. The frame is complete;
    /// the terminator itself is not part of it.
    Complete,

    /// The frame hit the configured cap before any terminator.
    Truncated,

    /// The stream reported end-of-stream.
    Closed,

    /// The stream reported some other error, for example a read
    /// timeout configured on the port.
    Error(ErrorKind),
}

impl FrameStatus {
    /// Whether a terminator was seen.
    pub fn is_complete(&self) -> bool {
        matches!(self, FrameStatus::Complete)
    }
}

/// Reads newline-terminated frames from a serial byte stream into a
/// caller-supplied buffer.
///
/// The stream handle stays owned by the caller: the reader only borrows
/// it for the duration of one call and never closes it. The buffer is
/// likewise the caller's, reused across calls to avoid reallocation; it
/// is cleared at the start of every call.
///
/// One byte is read at a time. A read of zero bytes with no error means
/// "no data yet" on a serial line, so the reader sleeps for
/// [`idle_wait`](FrameReader::idle_wait) and tries again. There is no
/// deadline here; a caller wanting one should set a read timeout on the
/// port itself, which ends the frame with
/// [`FrameStatus::Error`]`(TimedOut)`.
#[derive(Debug, Clone)]
pub struct FrameReader {
    max_frame_len: usize,
    idle_wait: Duration,
}

impl Default for FrameReader {
    fn default() -> Self {
        Self {
            max_frame_len: READ_BUF_SIZE,
            idle_wait: Duration::from_millis(1),
        }
    }
}

impl FrameReader {
    /// A reader with the device defaults: 1024 byte cap, 1 ms idle wait.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cap on a single frame.
    pub fn max_frame_len(mut self, max: usize) -> Self {
        self.max_frame_len = max;
        self
    }

    /// Set how long to sleep after a zero-byte read before polling again.
    pub fn idle_wait(mut self, wait: Duration) -> Self {
        self.idle_wait = wait;
        self
    }

    /// Pull the next newline-terminated frame from `source` into `buf`.
    ///
    /// Any prior contents of `buf` are discarded. Returns the number of
    /// bytes accumulated (always equal to `buf.len()`, never more than
    /// the cap) and the reason accumulation stopped.
    pub fn read_frame<R: Read>(&self, source: &mut R, buf: &mut Vec<u8>) -> (usize, FrameStatus) {
        buf.clear();
        let mut byte = [0u8; 1];

        let status = loop {
            // Checked up front so the count can never pass the cap,
            // whatever the cap is.
            if buf.len() >= self.max_frame_len {
                break FrameStatus::Truncated;
            }

            match source.read(&mut byte) {
                Ok(0) => {
                    // No data yet. Unlike a file, a quiet serial line is
                    // not at its end; pace the poll and go again.
                    std::thread::sleep(self.idle_wait);
                }
                Ok(_) => {
                    if byte[0] == RECEIVE_TERMINATOR {
                        break FrameStatus::Complete;
                    }
                    buf.push(byte[0]);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e)
                    if e.kind() == ErrorKind::UnexpectedEof
                        || e.kind() == ErrorKind::BrokenPipe =>
                {
                    break FrameStatus::Closed;
                }
                Err(e) => {
                    trace!(kind = ?e.kind(), "Stream error ends frame");
                    break FrameStatus::Error(e.kind());
                }
            }
        };

        (buf.len(), status)
    }

    /// Like [`read_frame`](Self::read_frame), but also wraps the
    /// accumulated bytes as a lossy-UTF8 [`SerialMessage`].
    pub fn read_message<R: Read>(
        &self,
        source: &mut R,
        buf: &mut Vec<u8>,
    ) -> (SerialMessage, FrameStatus) {
        let (_, status) = self.read_frame(source, buf);
        (SerialMessage::new_lossy(buf.as_slice()), status)
    }
}
