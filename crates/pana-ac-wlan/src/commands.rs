//! Fixed command payloads.
//!
//! A payload is everything between the counter byte and the checksum; the
//! first two bytes are the packet type. Responses from the unit carry the
//! command's type with 0x80 added to the second byte.

/// First half of the handshake opener.
pub const CMD_HANDSHAKE_1: &[u8] = &[0x00, 0x08, 0x00, 0x00];
/// Second half of the handshake opener, sent right after the first.
pub const CMD_HANDSHAKE_2: &[u8] = &[0x00, 0x09, 0x00, 0x00];
pub const CMD_HANDSHAKE_3: &[u8] = &[0x00, 0x0C, 0x00, 0x00];
pub const CMD_HANDSHAKE_4: &[u8] = &[0x00, 0x10, 0x00, 0x00];
pub const CMD_HANDSHAKE_5: &[u8] = &[0x00, 0x11, 0x00, 0x00];
pub const CMD_HANDSHAKE_6: &[u8] = &[0x00, 0x12, 0x00, 0x00];
pub const CMD_HANDSHAKE_7: &[u8] = &[0x00, 0x41, 0x00, 0x00];
pub const CMD_HANDSHAKE_8: &[u8] = &[0x01, 0x4C, 0x00, 0x00];
pub const CMD_HANDSHAKE_9: &[u8] = &[0x10, 0x00, 0x00, 0x00];
pub const CMD_HANDSHAKE_10: &[u8] = &[0x10, 0x01, 0x00, 0x00];
pub const CMD_HANDSHAKE_11: &[u8] = &[0x00, 0x18, 0x00, 0x00];
pub const CMD_HANDSHAKE_12: &[u8] = &[0x01, 0x00, 0x00, 0x00];
pub const CMD_HANDSHAKE_13: &[u8] = &[0x01, 0x10, 0x00, 0x00];
/// Acknowledges the counter seed packet the unit sends late in the
/// handshake.
pub const CMD_HANDSHAKE_14: &[u8] = &[0x01, 0x89, 0x00, 0x00];
/// Acknowledges the packet that moves the link into its first poll.
pub const CMD_HANDSHAKE_15: &[u8] = &[0x00, 0xA0, 0x00, 0x00];
/// Handshake tail; the unit's response to this one marks the link ready.
pub const CMD_HANDSHAKE_16: &[u8] = &[0x01, 0x00, 0x00, 0x00];

/// Requests the full climate report.
pub const CMD_POLL: &[u8] = &[0x10, 0x09, 0x00, 0x00];
/// Reply to the unit's periodic ping.
pub const CMD_PING: &[u8] = &[0x01, 0x81, 0x00, 0x00];
/// Reply to an unsolicited change report.
pub const CMD_REPORT_ACK: &[u8] = &[0x10, 0x8A, 0x00, 0x00];
