//! Driver for the Panasonic CZ-TACG1 adapter protocol.
//!
//! The CZ-TACG1 speaks a far simpler protocol than the WLAN adapter: no
//! handshake and no counters. The whole climate configuration lives in a
//! ten byte register image. Polling returns the image plus sensor bytes;
//! controlling means mutating a copy of the image and writing the whole
//! thing back.
//!
//! Like its sibling the driver is non-blocking and clock-driven through
//! [`CntDriver::poll`].

mod codec;
mod constants;
mod driver;
mod packet;

pub use constants::*;
pub use driver::{CntDriver, LinkState};
pub use packet::{build_packet, validate};
