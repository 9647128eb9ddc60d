//! Decoded climate state and the host notification interface.
//!
//! Drivers decode packets into a [`Climate`], then call [`Climate::publish`]
//! once per handled packet. Publishing diffs the working state against the
//! last values handed to the host, so re-decoding an identical packet emits
//! no notifications at all.

use log::{trace, warn};

use crate::constants::*;
use crate::types::*;

/// Everything the bridge knows about the AC.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClimateState {
    /// Operating mode.
    pub mode: ClimateMode,
    /// Derived current action.
    pub action: ClimateAction,
    /// Target temperature in degrees Celsius, offset-corrected.
    pub target_temperature: Option<f32>,
    /// Room temperature in degrees Celsius, offset-corrected.
    pub current_temperature: Option<i16>,
    /// Outdoor temperature in degrees Celsius, offset-corrected.
    pub outside_temperature: Option<i16>,
    /// Fan speed.
    pub fan_speed: FanSpeed,
    /// Aggregate swing mode.
    pub swing_mode: SwingMode,
    /// Manual vertical louver position.
    pub vertical_swing: VerticalSwing,
    /// Manual horizontal louver position.
    pub horizontal_swing: HorizontalSwing,
    /// Active preset.
    pub preset: Preset,
    /// nanoe(X) air treatment enabled.
    pub nanoex: bool,
    /// Eco mode enabled.
    pub eco: bool,
    /// Econavi mode enabled.
    pub econavi: bool,
    /// Mild dry mode enabled.
    pub mild_dry: bool,
    /// Outdoor unit defrosting.
    pub defrost: bool,
    /// Instantaneous power draw in watts.
    pub power: Option<u16>,
    /// Energy consumed today in kWh, integrated from power readings.
    pub energy_today: f64,
}

/// Change notifications from driver to host.
///
/// All methods default to no-ops so a host only implements the values it
/// has somewhere to put. Each method fires only when the value actually
/// changed since the last publish.
pub trait ClimateEvents {
    /// Mode, action, temperatures, fan, swing mode or preset changed.
    fn climate_updated(&mut self, _state: &ClimateState) {}
    /// Outdoor temperature changed.
    fn outside_temperature_updated(&mut self, _celsius: i16) {}
    /// Manual vertical louver position changed.
    fn vertical_swing_updated(&mut self, _position: VerticalSwing) {}
    /// Manual horizontal louver position changed.
    fn horizontal_swing_updated(&mut self, _position: HorizontalSwing) {}
    /// nanoe(X) toggle changed.
    fn nanoex_updated(&mut self, _on: bool) {}
    /// Eco toggle changed.
    fn eco_updated(&mut self, _on: bool) {}
    /// Econavi toggle changed.
    fn econavi_updated(&mut self, _on: bool) {}
    /// Mild dry toggle changed.
    fn mild_dry_updated(&mut self, _on: bool) {}
    /// Defrost flag changed.
    fn defrost_updated(&mut self, _active: bool) {}
    /// Instantaneous power draw changed.
    fn power_updated(&mut self, _watts: u16) {}
    /// Accumulated day energy changed (3 decimal places).
    fn energy_updated(&mut self, _kwh: f64) {}
    /// The link gave up permanently (WLAN handshake never completed).
    fn link_failed(&mut self) {}
}

/// Working climate state plus the de-duplication bookkeeping.
#[derive(Debug, Default)]
pub struct Climate {
    state: ClimateState,
    published: ClimateState,
    current_temperature_offset: i8,
    outside_temperature_offset: i8,
    last_power_read: Option<u64>,
}

impl Climate {
    /// Create a facade with the configured temperature offsets.
    pub fn new(current_temperature_offset: i8, outside_temperature_offset: i8) -> Self {
        Climate {
            current_temperature_offset,
            outside_temperature_offset,
            ..Default::default()
        }
    }

    /// The current working state.
    pub fn state(&self) -> &ClimateState {
        &self.state
    }

    /// Set the operating mode.
    pub fn set_mode(&mut self, mode: ClimateMode) {
        self.state.mode = mode;
    }

    /// Set the fan speed.
    pub fn set_fan_speed(&mut self, fan: FanSpeed) {
        self.state.fan_speed = fan;
    }

    /// Set the aggregate swing mode.
    pub fn set_swing_mode(&mut self, swing: SwingMode) {
        self.state.swing_mode = swing;
    }

    /// Set the manual vertical louver position.
    pub fn set_vertical_swing(&mut self, position: VerticalSwing) {
        self.state.vertical_swing = position;
    }

    /// Set the manual horizontal louver position.
    pub fn set_horizontal_swing(&mut self, position: HorizontalSwing) {
        self.state.horizontal_swing = position;
    }

    /// Set the preset.
    pub fn set_preset(&mut self, preset: Preset) {
        self.state.preset = preset;
    }

    /// Set the nanoe(X) toggle.
    pub fn set_nanoex(&mut self, on: bool) {
        self.state.nanoex = on;
    }

    /// Set the eco toggle.
    pub fn set_eco(&mut self, on: bool) {
        self.state.eco = on;
    }

    /// Set the econavi toggle.
    pub fn set_econavi(&mut self, on: bool) {
        self.state.econavi = on;
    }

    /// Set the mild dry toggle.
    pub fn set_mild_dry(&mut self, on: bool) {
        self.state.mild_dry = on;
    }

    /// Set the defrost flag.
    pub fn set_defrost(&mut self, active: bool) {
        self.state.defrost = active;
    }

    /// The raw protocol byte for a requested target temperature, clamped
    /// to the range the unit accepts and with the configured offset
    /// removed.
    pub fn encode_target_temperature(&self, celsius: f32) -> u8 {
        let celsius = celsius.clamp(MIN_TEMPERATURE as f32, MAX_TEMPERATURE as f32);
        ((celsius - self.current_temperature_offset as f32) / TEMPERATURE_STEP) as u8
    }

    /// Update the target temperature from its raw protocol byte.
    ///
    /// The wire value is half-degrees; the configured offset is applied on
    /// top. Out-of-range reports are dropped and the previous value kept.
    pub fn set_target_temperature_raw(&mut self, raw: u8) {
        let temperature = raw as f32 * TEMPERATURE_STEP + self.current_temperature_offset as f32;
        trace!("received target temperature {:.1}", temperature);

        if raw == TEMPERATURE_SENTINEL || temperature > TEMPERATURE_THRESHOLD as f32 {
            warn!("dropping out of range target temperature {:.1}", temperature);
            return;
        }

        self.state.target_temperature = Some(temperature);
    }

    /// Update the room temperature from its raw protocol byte.
    pub fn set_current_temperature_raw(&mut self, raw: u8) {
        let temperature = raw as i8 as i16 + self.current_temperature_offset as i16;
        trace!("received current temperature {}", temperature);

        if raw == TEMPERATURE_SENTINEL || temperature > TEMPERATURE_THRESHOLD {
            warn!("dropping out of range current temperature {}", temperature);
            return;
        }

        self.state.current_temperature = Some(temperature);
    }

    /// Update the outdoor temperature from its raw protocol byte.
    pub fn set_outside_temperature_raw(&mut self, raw: u8) {
        let temperature = raw as i8 as i16 + self.outside_temperature_offset as i16;
        trace!("received outside temperature {}", temperature);

        if raw == TEMPERATURE_SENTINEL || temperature > TEMPERATURE_THRESHOLD {
            warn!("dropping out of range outside temperature {}", temperature);
            return;
        }

        self.state.outside_temperature = Some(temperature);
    }

    /// Update the instantaneous power draw and integrate day energy over
    /// the wall-clock time since the previous reading.
    pub fn set_power(&mut self, watts: u16, now: u64) {
        if let Some(last) = self.last_power_read {
            let elapsed_ms = now.saturating_sub(last);
            self.state.energy_today +=
                watts as f64 * (elapsed_ms as f64 / 3_600_000.0) / 1000.0;
        }

        self.last_power_read = Some(now);
        self.state.power = Some(watts);
    }

    /// Re-derive the current action from mode and temperatures.
    pub fn refresh_action(&mut self) {
        self.state.action = match self.state.mode {
            ClimateMode::Off => ClimateAction::Off,
            ClimateMode::FanOnly => ClimateAction::Fan,
            ClimateMode::Dry => ClimateAction::Drying,
            mode => match (self.state.current_temperature, self.state.target_temperature) {
                (Some(current), Some(target)) => {
                    if matches!(mode, ClimateMode::Cool | ClimateMode::HeatCool)
                        && current as f32 + TEMPERATURE_TOLERANCE >= target
                    {
                        ClimateAction::Cooling
                    } else if matches!(mode, ClimateMode::Heat | ClimateMode::HeatCool)
                        && current as f32 - TEMPERATURE_TOLERANCE <= target
                    {
                        ClimateAction::Heating
                    } else {
                        ClimateAction::Idle
                    }
                }
                _ => ClimateAction::Idle,
            },
        };
    }

    /// Notify the host of every field that changed since the last publish.
    pub fn publish(&mut self, events: &mut dyn ClimateEvents) {
        let state = &self.state;
        let published = &self.published;

        let climate_changed = state.mode != published.mode
            || state.action != published.action
            || state.target_temperature != published.target_temperature
            || state.current_temperature != published.current_temperature
            || state.fan_speed != published.fan_speed
            || state.swing_mode != published.swing_mode
            || state.preset != published.preset;

        if climate_changed {
            events.climate_updated(state);
        }

        if state.outside_temperature != published.outside_temperature {
            if let Some(celsius) = state.outside_temperature {
                events.outside_temperature_updated(celsius);
            }
        }

        if state.vertical_swing != published.vertical_swing {
            events.vertical_swing_updated(state.vertical_swing);
        }
        if state.horizontal_swing != published.horizontal_swing {
            events.horizontal_swing_updated(state.horizontal_swing);
        }
        if state.nanoex != published.nanoex {
            events.nanoex_updated(state.nanoex);
        }
        if state.eco != published.eco {
            events.eco_updated(state.eco);
        }
        if state.econavi != published.econavi {
            events.econavi_updated(state.econavi);
        }
        if state.mild_dry != published.mild_dry {
            events.mild_dry_updated(state.mild_dry);
        }
        if state.defrost != published.defrost {
            events.defrost_updated(state.defrost);
        }
        if state.power != published.power {
            if let Some(watts) = state.power {
                events.power_updated(watts);
            }
        }

        // Energy only counts as changed once the third decimal moves.
        let rounded = (state.energy_today * 1000.0).round() / 1000.0;
        let published_rounded = (published.energy_today * 1000.0).round() / 1000.0;
        if rounded != published_rounded {
            events.energy_updated(rounded);
        }

        self.published = self.state.clone();
    }
}
