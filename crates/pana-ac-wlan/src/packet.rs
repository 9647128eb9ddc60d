//! Packet framing: header, counter, checksum.

use pana_ac_core::ProtocolError;

use crate::constants::*;

/// How a packet relates to the counter pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    /// A new command, numbered from the transmit counter.
    Normal,
    /// A reply to a unit-initiated packet, numbered from the receive
    /// counter.
    Response,
    /// A retransmission, reusing the previous transmit counter.
    Resend,
}

/// The byte that makes `data` plus itself sum to zero modulo 256.
pub fn checksum(data: &[u8]) -> u8 {
    let sum = data.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    sum.wrapping_neg()
}

/// Advance a packet counter, wrapping inside [COUNTER_MIN, COUNTER_MAX].
pub fn increment_counter(counter: u8) -> u8 {
    if counter == COUNTER_MAX {
        COUNTER_MIN
    } else {
        counter + 1
    }
}

/// Step a packet counter back, wrapping inside [COUNTER_MIN, COUNTER_MAX].
pub fn decrement_counter(counter: u8) -> u8 {
    if counter == COUNTER_MIN {
        COUNTER_MAX
    } else {
        counter - 1
    }
}

/// Wrap a payload into a full packet: header, counter, payload, checksum.
pub fn build_packet(counter: u8, payload: &[u8]) -> Vec<u8> {
    let mut packet = Vec::with_capacity(payload.len() + 3);
    packet.push(HEADER);
    packet.push(counter);
    packet.extend_from_slice(payload);
    packet.push(checksum(&packet));
    packet
}

/// Check a received packet's size, header and checksum.
///
/// Counter agreement is not checked here; the driver resynchronizes its
/// receive counter from traffic instead of rejecting packets over it.
pub fn validate(buffer: &[u8]) -> Result<(), ProtocolError> {
    if buffer.len() < MIN_PACKET_SIZE {
        return Err(ProtocolError::PacketTooShort {
            expected: MIN_PACKET_SIZE,
            actual: buffer.len(),
        });
    }

    if buffer[0] != HEADER {
        return Err(ProtocolError::BadHeader(buffer[0]));
    }

    let sum = buffer.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != 0 {
        return Err(ProtocolError::ChecksumMismatch { sum });
    }

    Ok(())
}
