//! Byte transport abstraction.

/// A byte pipe to the AC unit.
///
/// Implementations are expected to be non-blocking: `read_byte` returns
/// immediately with `None` when nothing is buffered.
pub trait Transport {
    /// Whether at least one received byte is waiting.
    fn bytes_available(&mut self) -> bool;

    /// Take the next received byte, if any.
    fn read_byte(&mut self) -> Option<u8>;

    /// Queue an outgoing packet for transmission.
    fn write_all(&mut self, data: &[u8]);
}
