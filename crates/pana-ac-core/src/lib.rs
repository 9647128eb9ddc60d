//! Shared core for the Panasonic AC UART bridge.
//!
//! Panasonic indoor units expose a proprietary serial protocol on their
//! control board. Two adapter modules speak it, each with its own framing:
//!
//! - **DNSK-P11** via the CN-WLAN connector (`pana-ac-wlan`)
//! - **CZ-TACG1** via the CN-CNT connector (`pana-ac-cnt`)
//!
//! This crate holds everything the two protocol crates share: the semantic
//! climate state and its change-notification interface, the byte-channel
//! transport abstraction, the silence-delimited frame assembler, and the
//! protocol error type.
//!
//! # Example
//!
//! ```rust,ignore
//! use pana_ac_core::{ClimateEvents, ControlRequest, Transport};
//!
//! // A driver owns a Transport and reports decoded changes through
//! // a ClimateEvents implementation supplied by the host.
//! let mut driver = pana_ac_wlan::WlanDriver::new(transport, events, 0, 0, now_ms);
//! loop {
//!     driver.poll(now_ms);
//! }
//! ```

mod climate;
mod constants;
mod error;
mod frame;
mod transport;
mod types;

pub mod testutil;

pub use climate::*;
pub use constants::*;
pub use error::*;
pub use frame::*;
pub use transport::*;
pub use types::*;
