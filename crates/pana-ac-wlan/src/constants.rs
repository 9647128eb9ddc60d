//! Protocol constants for the DNSK-P11 adapter.

/// First byte of every packet in both directions.
pub const HEADER: u8 = 0x5A;

/// Byte the unit sends on its own when it wants the handshake to start
/// immediately, skipping the initial settle delay.
pub const SYNC: u8 = 0x66;

/// Settle time (ms) after power-up before the first handshake packet.
pub const INIT_TIMEOUT: u64 = 10000;
/// Delay (ms) before the final handshake packet is sent.
pub const INIT_END_TIMEOUT: u64 = 10000;
/// Delay (ms) between the handshake tail and the first poll.
pub const FIRST_POLL_TIMEOUT: u64 = 650;
/// Interval (ms) between periodic polls once the link is ready.
pub const POLL_INTERVAL: u64 = 30000;
/// Time (ms) to wait for a response before resending a packet.
pub const RESPONSE_TIMEOUT: u64 = 600;
/// Time (ms) after which an incomplete handshake marks the link failed.
pub const INIT_FAIL_TIMEOUT: u64 = 30000;

/// Lowest value the packet counters take; 0x00 and 0xFF never appear.
pub const COUNTER_MIN: u8 = 0x01;
/// Highest value the packet counters take before wrapping.
pub const COUNTER_MAX: u8 = 0xFE;

/// Shortest valid packet: header, counter, two type bytes and a checksum.
pub const MIN_PACKET_SIZE: usize = 5;
/// Exact size of a poll response carrying the full climate report.
pub const POLL_RESPONSE_SIZE: usize = 125;
/// Maximum number of key/value pairs queued for one set command.
pub const MAX_QUEUED_SETTINGS: usize = 15;
