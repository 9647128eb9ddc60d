//! Protocol constants for the CZ-TACG1 adapter.

/// Header byte of a control packet.
pub const CTRL_HEADER: u8 = 0xF0;
/// Header byte of a poll request and its response.
pub const POLL_HEADER: u8 = 0x70;

/// Interval (ms) between polls.
pub const POLL_INTERVAL: u64 = 5000;
/// Minimum quiet time (ms) on the line before a control packet goes out.
pub const CMD_INTERVAL: u64 = 250;

/// Shortest valid received packet.
pub const MIN_PACKET_SIZE: usize = 12;
/// Size of the register image holding the whole configuration.
pub const IMAGE_SIZE: usize = 10;

/// Poll request payload; the unit answers with the register image.
pub const CMD_POLL: [u8; IMAGE_SIZE] = [0; IMAGE_SIZE];

/// Offset of the register image in a poll response.
pub const IMAGE_OFFSET: usize = 2;
/// Offset of the indoor temperature byte in a poll response.
pub const CURRENT_TEMPERATURE_OFFSET: usize = 18;
/// Offset of the outdoor temperature byte in a poll response.
pub const OUTSIDE_TEMPERATURE_OFFSET: usize = 19;
/// Offset of the little-endian power reading in a poll response.
pub const POWER_OFFSET: usize = 20;
/// Offset of the meter bias subtracted from the power reading.
pub const POWER_BIAS_OFFSET: usize = 22;
