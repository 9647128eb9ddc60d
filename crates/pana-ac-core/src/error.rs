//! Protocol error types.

use thiserror::Error;

/// Reasons a received packet is rejected by a validator.
///
/// All of these are recovered locally: the driver clears its receive buffer,
/// logs the rejection and keeps running. None of them affect protocol state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Packet is too short to be valid.
    #[error("packet too short: expected at least {expected} bytes, got {actual}")]
    PacketTooShort {
        /// Expected minimum length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// First byte is not a known header for this variant.
    #[error("unknown header byte: 0x{0:02X}")]
    BadHeader(u8),

    /// Declared payload length does not match the received packet.
    #[error("length mismatch: length byte says {declared}, packet holds {actual}")]
    LengthMismatch {
        /// Payload length according to the length byte.
        declared: usize,
        /// Payload length actually received.
        actual: usize,
    },

    /// Additive checksum over the packet did not sum to zero.
    #[error("checksum mismatch: packet sums to 0x{sum:02X}, expected 0x00")]
    ChecksumMismatch {
        /// The non-zero sum.
        sum: u8,
    },

    /// A fixed-size response had the wrong total length.
    #[error("unexpected packet size: expected {expected} bytes, got {actual}")]
    UnexpectedSize {
        /// Required length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },
}
