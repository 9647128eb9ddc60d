//! Silence-delimited frame assembly.
//!
//! Neither adapter protocol carries an explicit end-of-frame marker on the
//! wire; a frame ends when the line goes quiet. The assembler drains the
//! transport into a buffer and reports the frame complete once no byte has
//! arrived for [`READ_TIMEOUT`](crate::constants::READ_TIMEOUT) milliseconds.

use bytes::{BufMut, BytesMut};
use log::warn;

use crate::constants::{BUFFER_SIZE, READ_TIMEOUT};
use crate::transport::Transport;

/// Accumulates received bytes into silence-delimited frames.
#[derive(Debug)]
pub struct FrameAssembler {
    buffer: BytesMut,
    last_read: u64,
}

impl Default for FrameAssembler {
    fn default() -> Self {
        FrameAssembler {
            buffer: BytesMut::with_capacity(BUFFER_SIZE),
            last_read: 0,
        }
    }
}

impl FrameAssembler {
    /// Drain every waiting byte from the transport into the frame buffer.
    ///
    /// Each drained byte restarts the silence window. A frame growing past
    /// the buffer cap is discarded wholesale; the next frame starts clean.
    pub fn push_from(&mut self, transport: &mut dyn Transport, now: u64) {
        while transport.bytes_available() {
            let Some(byte) = transport.read_byte() else {
                break;
            };

            if self.buffer.len() >= BUFFER_SIZE {
                warn!("receive buffer overflow, dropping frame");
                self.buffer.clear();
            }

            self.buffer.put_u8(byte);
            self.last_read = now;
        }
    }

    /// Whether a complete frame is sitting in the buffer.
    pub fn is_complete(&self, now: u64) -> bool {
        !self.buffer.is_empty() && now.saturating_sub(self.last_read) > READ_TIMEOUT
    }

    /// The bytes accumulated so far.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Whether nothing has been received yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discard the current frame.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestTransport;

    #[test]
    fn frame_completes_after_silence() {
        let mut transport = TestTransport::default();
        let mut assembler = FrameAssembler::default();

        transport.queue_rx(&[0x5A, 0x01, 0x00]);
        assembler.push_from(&mut transport, 100);
        assert!(!assembler.is_complete(100));
        assert!(!assembler.is_complete(110));
        assert!(assembler.is_complete(121));
        assert_eq!(assembler.buffer(), &[0x5A, 0x01, 0x00]);
    }

    #[test]
    fn late_bytes_restart_the_silence_window() {
        let mut transport = TestTransport::default();
        let mut assembler = FrameAssembler::default();

        transport.queue_rx(&[0x5A]);
        assembler.push_from(&mut transport, 100);
        transport.queue_rx(&[0x01]);
        assembler.push_from(&mut transport, 115);
        assert!(!assembler.is_complete(121));
        assert!(assembler.is_complete(136));
    }

    #[test]
    fn overflow_drops_the_frame() {
        let mut transport = TestTransport::default();
        let mut assembler = FrameAssembler::default();

        transport.queue_rx(&vec![0xAA; BUFFER_SIZE + 1]);
        assembler.push_from(&mut transport, 0);
        assert_eq!(assembler.buffer().len(), 1);
    }

    #[test]
    fn empty_buffer_is_never_complete() {
        let assembler = FrameAssembler::default();
        assert!(!assembler.is_complete(u64::MAX));
    }
}
