//! Driver for the Panasonic DNSK-P11 WLAN adapter protocol.
//!
//! The DNSK-P11 speaks a stateful, counter-synchronized protocol over the
//! CN-WLAN connector. Every packet starts with a 0x5A header and a rolling
//! counter byte, and ends with a checksum that makes the whole packet sum
//! to zero. Before any climate traffic flows the driver walks a sixteen
//! step handshake with the unit; only after the final handshake response
//! does the link reach [`LinkState::Ready`].
//!
//! The driver is single-threaded and non-blocking: the host calls
//! [`WlanDriver::poll`] with a monotonic millisecond clock, and every
//! timeout in the protocol is an elapsed-time comparison against that
//! clock.

mod codec;
mod commands;
mod constants;
mod driver;
mod packet;

pub use constants::*;
pub use driver::{LinkState, WlanDriver};
pub use packet::{build_packet, checksum, validate, CommandType};
