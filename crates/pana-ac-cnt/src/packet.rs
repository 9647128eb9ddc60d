//! Packet framing: header, declared length, checksum.

use pana_ac_core::ProtocolError;

use crate::constants::MIN_PACKET_SIZE;

/// Wrap a payload into a full packet: header, payload length, payload,
/// checksum. The checksum makes the whole packet sum to zero modulo 256.
pub fn build_packet(header: u8, payload: &[u8]) -> Vec<u8> {
    let mut packet = Vec::with_capacity(payload.len() + 3);
    packet.push(header);
    packet.push(payload.len() as u8);
    packet.extend_from_slice(payload);
    let sum = packet.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    packet.push(sum.wrapping_neg());
    packet
}

/// Check a received packet's size, header, declared length and checksum.
pub fn validate(buffer: &[u8]) -> Result<(), ProtocolError> {
    if buffer.len() < MIN_PACKET_SIZE {
        return Err(ProtocolError::PacketTooShort {
            expected: MIN_PACKET_SIZE,
            actual: buffer.len(),
        });
    }

    if buffer[0] != crate::constants::CTRL_HEADER && buffer[0] != crate::constants::POLL_HEADER {
        return Err(ProtocolError::BadHeader(buffer[0]));
    }

    let declared = buffer[1] as usize;
    if declared != buffer.len() - 3 {
        return Err(ProtocolError::LengthMismatch {
            declared,
            actual: buffer.len() - 3,
        });
    }

    let sum = buffer.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != 0 {
        return Err(ProtocolError::ChecksumMismatch { sum });
    }

    Ok(())
}
