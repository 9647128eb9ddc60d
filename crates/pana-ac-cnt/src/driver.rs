//! The CZ-TACG1 link driver.

use log::{debug, info, trace, warn};

use pana_ac_core::{Climate, ClimateEvents, ControlRequest, FrameAssembler, Transport};

use crate::codec;
use crate::constants::*;
use crate::packet::{build_packet, validate};

/// Where the link currently is in its lifecycle. There is no handshake;
/// the first answered poll establishes the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No poll answered yet.
    Initializing,
    /// The unit is answering polls.
    Ready,
}

/// Driver for one CZ-TACG1 adapter on one serial line.
///
/// Control requests mutate a pending copy of the register image; the copy
/// is written back once the line has been quiet for the command interval,
/// so several requests arriving close together collapse into one write.
pub struct CntDriver<T, E> {
    transport: T,
    events: E,
    climate: Climate,
    assembler: FrameAssembler,
    state: LinkState,
    data: [u8; IMAGE_SIZE],
    pending: Option<[u8; IMAGE_SIZE]>,
    last_packet_sent: u64,
}

impl<T: Transport, E: ClimateEvents> CntDriver<T, E> {
    pub fn new(
        transport: T,
        events: E,
        current_temperature_offset: i8,
        outside_temperature_offset: i8,
        now: u64,
    ) -> Self {
        CntDriver {
            transport,
            events,
            climate: Climate::new(current_temperature_offset, outside_temperature_offset),
            assembler: FrameAssembler::default(),
            state: LinkState::Initializing,
            data: [0; IMAGE_SIZE],
            pending: None,
            last_packet_sent: now,
        }
    }

    /// Current link state.
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// The decoded climate facade.
    pub fn climate(&self) -> &Climate {
        &self.climate
    }

    /// The underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// The host notification sink.
    pub fn events(&self) -> &E {
        &self.events
    }

    /// Run one iteration of the driver: handle a completed frame, drain
    /// the transport, flush a pending control write, and fire a due poll.
    pub fn poll(&mut self, now: u64) {
        if self.assembler.is_complete(now) {
            let buffer = self.assembler.buffer().to_vec();
            self.assembler.clear();

            match validate(&buffer) {
                Ok(()) => {
                    trace!("received {:02X?}", buffer);
                    self.handle_packet(&buffer, now);
                }
                Err(err) => warn!("dropping invalid packet: {err}"),
            }
        }

        self.assembler.push_from(&mut self.transport, now);
        self.flush_pending(now);
        self.handle_poll(now);
    }

    /// Apply a control request. Ignored wholesale unless the link is
    /// ready. Nothing goes on the wire here; the mutated image is flushed
    /// from [`poll`](Self::poll) once the command interval has passed.
    pub fn apply(&mut self, request: &ControlRequest, _now: u64) {
        if self.state != LinkState::Ready {
            warn!("ignoring control request, link is not ready");
            return;
        }

        let mut image = self.pending.unwrap_or(self.data);
        let mut touched = false;

        if let Some(mode) = request.mode {
            match codec::encode_mode(mode) {
                Some(byte) => image[0] = byte,
                // Turning off keeps the mode nibble so the unit resumes
                // where it left off.
                None => image[0] &= 0xF0,
            }
            touched = true;
        }

        if let Some(target) = request.target_temperature {
            image[1] = self.climate.encode_target_temperature(target);
            touched = true;
        }

        if let Some(fan) = request.fan_speed {
            image[3] = codec::encode_fan_speed(fan);
            touched = true;
        }

        if let Some(swing) = request.swing_mode {
            use pana_ac_core::SwingMode::*;
            image[4] = match swing {
                Both => 0xFD,
                Off => 0x36,
                Vertical => 0xF6,
                Horizontal => 0x3D,
            };
            touched = true;
        }

        if let Some(position) = request.vertical_swing {
            match codec::vertical_swing_bits(position) {
                Some(bits) => {
                    image[4] = (image[4] & 0x0F) | bits;
                    touched = true;
                }
                None => warn!("vertical louver position {position:?} cannot be commanded"),
            }
        }

        if let Some(position) = request.horizontal_swing {
            match codec::horizontal_swing_bits(position) {
                Some(bits) => {
                    image[4] = (image[4] & 0xF0) | bits;
                    touched = true;
                }
                None => warn!("horizontal louver position {position:?} cannot be commanded"),
            }
        }

        if let Some(preset) = request.preset {
            image[5] = (image[5] & 0xF0) | codec::preset_bits(preset);
            touched = true;
        }

        if let Some(on) = request.nanoex {
            image[5] = if on {
                (image[5] & 0x0F) | 0x40
            } else {
                image[5] & 0x0F
            };
            touched = true;
        }

        if let Some(on) = request.eco {
            image[8] = codec::encode_eco(on);
            touched = true;
        }

        if let Some(on) = request.mild_dry {
            image[2] = codec::encode_mild_dry(on);
            touched = true;
        }

        if request.econavi.is_some() {
            warn!("econavi is not supported on this adapter");
        }

        if touched {
            self.pending = Some(image);
        }
    }

    fn handle_packet(&mut self, buffer: &[u8], now: u64) {
        match buffer[0] {
            POLL_HEADER => self.handle_poll_response(buffer, now),
            CTRL_HEADER => debug!("control write acknowledged"),
            _ => {}
        }
    }

    fn handle_poll_response(&mut self, buffer: &[u8], now: u64) {
        if buffer.len() <= OUTSIDE_TEMPERATURE_OFFSET {
            warn!("poll response has only {} bytes, ignoring", buffer.len());
            return;
        }

        self.data
            .copy_from_slice(&buffer[IMAGE_OFFSET..IMAGE_OFFSET + IMAGE_SIZE]);
        let image = self.data;
        self.decode_image(&image);

        self.climate
            .set_current_temperature_raw(buffer[CURRENT_TEMPERATURE_OFFSET]);
        self.climate
            .set_outside_temperature_raw(buffer[OUTSIDE_TEMPERATURE_OFFSET]);

        if buffer.len() > POWER_BIAS_OFFSET + 1 {
            let raw = u16::from_le_bytes([buffer[POWER_OFFSET], buffer[POWER_OFFSET + 1]]);
            let watts = raw.saturating_sub(buffer[POWER_BIAS_OFFSET] as u16);
            self.climate.set_power(watts, now);
        }

        self.climate.refresh_action();
        self.climate.publish(&mut self.events);

        if self.state != LinkState::Ready {
            info!("link established");
            self.state = LinkState::Ready;
        }
    }

    fn decode_image(&mut self, image: &[u8; IMAGE_SIZE]) {
        match codec::decode_mode(image[0]) {
            Some(mode) => self.climate.set_mode(mode),
            None => warn!("received unknown mode register {:#04X}", image[0]),
        }

        self.climate.set_target_temperature_raw(image[1]);

        if let Some(on) = codec::decode_mild_dry(image[2]) {
            self.climate.set_mild_dry(on);
        }

        match codec::decode_fan_speed(image[3]) {
            Some(fan) => self.climate.set_fan_speed(fan),
            None => warn!("received unknown fan register {:#04X}", image[3]),
        }

        match (
            codec::decode_vertical_swing(image[4]),
            codec::decode_horizontal_swing(image[4]),
        ) {
            (Some(vertical), Some(horizontal)) => {
                self.climate.set_vertical_swing(vertical);
                self.climate.set_horizontal_swing(horizontal);
                self.climate
                    .set_swing_mode(codec::aggregate_swing(vertical, horizontal));
            }
            _ => warn!("received unknown swing register {:#04X}", image[4]),
        }

        match codec::decode_preset(image[5]) {
            Some(preset) => self.climate.set_preset(preset),
            None => warn!("received unknown preset register {:#04X}", image[5]),
        }
        self.climate.set_nanoex(codec::decode_nanoex(image[5]));
        self.climate.set_eco(codec::decode_eco(image[8]));
    }

    fn flush_pending(&mut self, now: u64) {
        let Some(image) = self.pending else {
            return;
        };

        if now.saturating_sub(self.last_packet_sent) <= CMD_INTERVAL {
            return;
        }

        let packet = build_packet(CTRL_HEADER, &image);
        trace!("sending {:02X?}", packet);
        self.transport.write_all(&packet);
        self.last_packet_sent = now;

        self.data = image;
        self.pending = None;

        // The unit does not echo a control write; report the new image
        // right away and let the next poll confirm it.
        self.decode_image(&image);
        self.climate.refresh_action();
        self.climate.publish(&mut self.events);
    }

    fn handle_poll(&mut self, now: u64) {
        if now.saturating_sub(self.last_packet_sent) > POLL_INTERVAL {
            let packet = build_packet(POLL_HEADER, &CMD_POLL);
            trace!("sending {:02X?}", packet);
            self.transport.write_all(&packet);
            self.last_packet_sent = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pana_ac_core::testutil::{RecordingEvents, TestTransport};
    use pana_ac_core::{ClimateMode, FanSpeed, SwingMode};

    type TestDriver = CntDriver<TestTransport, RecordingEvents>;

    fn new_driver() -> TestDriver {
        CntDriver::new(TestTransport::default(), RecordingEvents::default(), 0, 0, 0)
    }

    fn deliver(driver: &mut TestDriver, now: &mut u64, packet: &[u8]) {
        driver.transport_mut().queue_rx(packet);
        *now += 5;
        driver.poll(*now);
        *now += 25;
        driver.poll(*now);
    }

    fn poll_response(
        image: &[u8; IMAGE_SIZE],
        current: u8,
        outside: u8,
        power: Option<(u16, u8)>,
    ) -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(image);
        payload.extend_from_slice(&[0; 6]);
        payload.push(current);
        payload.push(outside);
        if let Some((raw, bias)) = power {
            payload.extend_from_slice(&raw.to_le_bytes());
            payload.push(bias);
        }
        build_packet(POLL_HEADER, &payload)
    }

    const COOLING_IMAGE: [u8; IMAGE_SIZE] =
        [0x34, 0x3C, 0x00, 0xA0, 0xFD, 0x00, 0x00, 0x00, 0x00, 0x00];

    #[test]
    fn register_image_decodes() {
        let mut driver = new_driver();
        let mut now = 0;
        deliver(&mut driver, &mut now, &poll_response(&COOLING_IMAGE, 22, 18, None));

        assert_eq!(driver.state(), LinkState::Ready);
        let state = driver.events().last_state.clone().unwrap();
        assert_eq!(state.mode, ClimateMode::Cool);
        assert_eq!(state.target_temperature, Some(30.0));
        assert_eq!(state.fan_speed, FanSpeed::Automatic);
        assert_eq!(state.swing_mode, SwingMode::Both);
        assert_eq!(state.current_temperature, Some(22));
        assert_eq!(driver.events().outside_temperatures, vec![18]);
    }

    #[test]
    fn identical_responses_publish_once() {
        let mut driver = new_driver();
        let mut now = 0;
        deliver(&mut driver, &mut now, &poll_response(&COOLING_IMAGE, 22, 18, None));
        let updates = driver.events().climate_updates;

        deliver(&mut driver, &mut now, &poll_response(&COOLING_IMAGE, 22, 18, None));
        assert_eq!(driver.events().climate_updates, updates);
        assert_eq!(driver.events().outside_temperatures, vec![18]);
    }

    #[test]
    fn poll_request_goes_out_on_schedule() {
        let mut driver = new_driver();
        driver.poll(POLL_INTERVAL + 1);
        assert_eq!(
            driver.transport_mut().last_tx(),
            Some(build_packet(POLL_HEADER, &CMD_POLL).as_slice())
        );

        let sent = driver.transport_mut().tx.len();
        driver.poll(POLL_INTERVAL + 100);
        assert_eq!(driver.transport_mut().tx.len(), sent);
    }

    #[test]
    fn control_writes_back_the_mutated_image() {
        let mut driver = new_driver();
        let mut now = 0;
        deliver(&mut driver, &mut now, &poll_response(&COOLING_IMAGE, 22, 18, None));

        let request = ControlRequest {
            mode: Some(ClimateMode::Heat),
            target_temperature: Some(21.0),
            ..Default::default()
        };
        driver.apply(&request, now);
        assert!(driver.transport_mut().tx.is_empty());

        now += CMD_INTERVAL + 1;
        driver.poll(now);

        let packet = driver.transport_mut().last_tx().unwrap().to_vec();
        assert_eq!(packet[0], CTRL_HEADER);
        assert_eq!(packet[1], IMAGE_SIZE as u8);
        assert_eq!(packet[2], 0x44); // heat, powered on
        assert_eq!(packet[3], 42); // 21.0 C
        assert_eq!(&packet[4..12], &COOLING_IMAGE[2..]);
        let sum = packet.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
        assert_eq!(sum, 0);

        // The new image is reported without waiting for the next poll.
        let state = driver.events().last_state.clone().unwrap();
        assert_eq!(state.mode, ClimateMode::Heat);
        assert_eq!(state.target_temperature, Some(21.0));
    }

    #[test]
    fn close_requests_collapse_into_one_write() {
        let mut driver = new_driver();
        let mut now = 0;
        deliver(&mut driver, &mut now, &poll_response(&COOLING_IMAGE, 22, 18, None));

        driver.apply(
            &ControlRequest {
                mode: Some(ClimateMode::Heat),
                ..Default::default()
            },
            now,
        );
        driver.apply(
            &ControlRequest {
                fan_speed: Some(FanSpeed::Level3),
                ..Default::default()
            },
            now + 10,
        );

        now += CMD_INTERVAL + 1;
        driver.poll(now);

        assert_eq!(driver.transport_mut().tx.len(), 1);
        let packet = driver.transport_mut().last_tx().unwrap();
        assert_eq!(packet[2], 0x44);
        assert_eq!(packet[5], 0x50);
    }

    #[test]
    fn written_images_round_trip_through_the_unit() {
        let modes = [
            ClimateMode::HeatCool,
            ClimateMode::Cool,
            ClimateMode::Heat,
            ClimateMode::Dry,
            ClimateMode::FanOnly,
        ];
        let fans = [
            FanSpeed::Automatic,
            FanSpeed::Level1,
            FanSpeed::Level2,
            FanSpeed::Level3,
            FanSpeed::Level4,
            FanSpeed::Level5,
        ];

        for (mode, fan) in modes.iter().zip(fans.iter().cycle()) {
            let mut driver = new_driver();
            let mut now = 0;
            deliver(&mut driver, &mut now, &poll_response(&COOLING_IMAGE, 22, 18, None));

            driver.apply(
                &ControlRequest {
                    mode: Some(*mode),
                    fan_speed: Some(*fan),
                    target_temperature: Some(24.0),
                    ..Default::default()
                },
                now,
            );
            now += CMD_INTERVAL + 1;
            driver.poll(now);

            // The unit stores the image verbatim and reports it back.
            let written = driver.transport_mut().last_tx().unwrap().to_vec();
            let mut image = [0u8; IMAGE_SIZE];
            image.copy_from_slice(&written[2..2 + IMAGE_SIZE]);
            deliver(&mut driver, &mut now, &poll_response(&image, 22, 18, None));

            let state = driver.events().last_state.clone().unwrap();
            assert_eq!(state.mode, *mode);
            assert_eq!(state.fan_speed, *fan);
            assert_eq!(state.target_temperature, Some(24.0));
        }
    }

    #[test]
    fn power_reading_integrates_into_energy() {
        let mut driver = new_driver();
        let mut now = 0;
        deliver(
            &mut driver,
            &mut now,
            &poll_response(&COOLING_IMAGE, 22, 18, Some((1005, 5))),
        );
        assert_eq!(driver.events().powers, vec![1000]);
        assert!(driver.events().energies.is_empty());

        now = 3_600_000;
        deliver(
            &mut driver,
            &mut now,
            &poll_response(&COOLING_IMAGE, 22, 18, Some((1005, 5))),
        );
        let energy = *driver.events().energies.last().unwrap();
        assert!((energy - 1.0).abs() < 0.01);
    }

    #[test]
    fn control_is_ignored_before_ready() {
        let mut driver = new_driver();
        driver.apply(
            &ControlRequest {
                mode: Some(ClimateMode::Cool),
                ..Default::default()
            },
            0,
        );
        driver.poll(CMD_INTERVAL + 1);
        assert!(driver.transport_mut().tx.is_empty());
    }

    #[test]
    fn corrupted_responses_are_dropped() {
        let mut driver = new_driver();
        let mut now = 0;
        let mut packet = poll_response(&COOLING_IMAGE, 22, 18, None);
        let last = packet.len() - 1;
        packet[last] ^= 0xFF;
        deliver(&mut driver, &mut now, &packet);

        assert_eq!(driver.state(), LinkState::Initializing);
        assert_eq!(driver.events().climate_updates, 0);
    }
}
