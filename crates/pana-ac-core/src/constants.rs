//! Constants shared by both protocol variants.
//!
//! These mirror the limits of the Panasonic Comfort Cloud app, which is the
//! authoritative source for what the indoor unit accepts.

/// Maximum size of a single packet, receive and transmit.
pub const BUFFER_SIZE: usize = 128;

/// Inter-byte silence (ms) after which a received packet is considered
/// complete. The AC sends each packet as a single burst, then pauses.
pub const READ_TIMEOUT: u64 = 20;

/// Minimum target temperature in degrees Celsius.
pub const MIN_TEMPERATURE: u8 = 16;
/// Maximum target temperature in degrees Celsius.
pub const MAX_TEMPERATURE: u8 = 30;
/// Granularity of the target temperature.
pub const TEMPERATURE_STEP: f32 = 0.5;
/// Tolerance applied when deriving the heating/cooling action.
pub const TEMPERATURE_TOLERANCE: f32 = 2.0;
/// Temperatures above this are treated as invalid sensor reports.
pub const TEMPERATURE_THRESHOLD: i16 = 100;
/// Raw byte the AC reports for an unsupported temperature sensor.
pub const TEMPERATURE_SENTINEL: u8 = 0x80;
