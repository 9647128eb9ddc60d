//! Shared test doubles for driver tests.

use crate::climate::{ClimateEvents, ClimateState};
use crate::transport::Transport;
use crate::types::{HorizontalSwing, VerticalSwing};

/// In-memory [`Transport`] with a scripted receive queue and captured
/// transmit history.
#[derive(Debug, Default)]
pub struct TestTransport {
    rx: std::collections::VecDeque<u8>,
    /// Every packet written by the driver, in order.
    pub tx: Vec<Vec<u8>>,
}

impl TestTransport {
    /// Make the given bytes available for reading.
    pub fn queue_rx(&mut self, data: &[u8]) {
        self.rx.extend(data.iter().copied());
    }

    /// The most recently written packet.
    pub fn last_tx(&self) -> Option<&[u8]> {
        self.tx.last().map(|p| p.as_slice())
    }
}

impl Transport for TestTransport {
    fn bytes_available(&mut self) -> bool {
        !self.rx.is_empty()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write_all(&mut self, data: &[u8]) {
        self.tx.push(data.to_vec());
    }
}

/// [`ClimateEvents`] sink that records what was published.
#[derive(Debug, Default)]
pub struct RecordingEvents {
    /// Number of aggregate climate updates.
    pub climate_updates: usize,
    /// Latest published climate snapshot.
    pub last_state: Option<ClimateState>,
    /// Published outdoor temperatures, in order.
    pub outside_temperatures: Vec<i16>,
    /// Published vertical louver positions.
    pub vertical_swings: Vec<VerticalSwing>,
    /// Published horizontal louver positions.
    pub horizontal_swings: Vec<HorizontalSwing>,
    /// Published nanoe(X) toggles.
    pub nanoex: Vec<bool>,
    /// Published eco toggles.
    pub eco: Vec<bool>,
    /// Published econavi toggles.
    pub econavi: Vec<bool>,
    /// Published mild dry toggles.
    pub mild_dry: Vec<bool>,
    /// Published defrost flags.
    pub defrost: Vec<bool>,
    /// Published power readings in watts.
    pub powers: Vec<u16>,
    /// Published day energy totals in kWh.
    pub energies: Vec<f64>,
    /// Whether the driver reported a dead link.
    pub link_failed: bool,
}

impl ClimateEvents for RecordingEvents {
    fn climate_updated(&mut self, state: &ClimateState) {
        self.climate_updates += 1;
        self.last_state = Some(state.clone());
    }

    fn outside_temperature_updated(&mut self, celsius: i16) {
        self.outside_temperatures.push(celsius);
    }

    fn vertical_swing_updated(&mut self, position: VerticalSwing) {
        self.vertical_swings.push(position);
    }

    fn horizontal_swing_updated(&mut self, position: HorizontalSwing) {
        self.horizontal_swings.push(position);
    }

    fn nanoex_updated(&mut self, on: bool) {
        self.nanoex.push(on);
    }

    fn eco_updated(&mut self, on: bool) {
        self.eco.push(on);
    }

    fn econavi_updated(&mut self, on: bool) {
        self.econavi.push(on);
    }

    fn mild_dry_updated(&mut self, on: bool) {
        self.mild_dry.push(on);
    }

    fn defrost_updated(&mut self, active: bool) {
        self.defrost.push(active);
    }

    fn power_updated(&mut self, watts: u16) {
        self.powers.push(watts);
    }

    fn energy_updated(&mut self, kwh: f64) {
        self.energies.push(kwh);
    }

    fn link_failed(&mut self) {
        self.link_failed = true;
    }
}
