//! The DNSK-P11 link driver.

use log::{debug, error, info, trace, warn};

use pana_ac_core::{
    Climate, ClimateEvents, ClimateMode, ControlRequest, FrameAssembler, ProtocolError, Transport,
};

use crate::codec;
use crate::commands::*;
use crate::constants::*;
use crate::packet::{build_packet, decrement_counter, increment_counter, validate, CommandType};

/// Where the link currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Waiting out the settle delay after power-up.
    Initializing,
    /// Walking the handshake sequence.
    Handshake,
    /// Handshake done, waiting to issue the first poll.
    FirstPoll,
    /// First poll answered, waiting to send the handshake tail.
    HandshakeEnding,
    /// Link established, climate traffic flowing.
    Ready,
    /// The handshake never completed; the driver has given up.
    Failed,
}

/// Driver for one DNSK-P11 adapter on one serial line.
///
/// The host owns the clock: every method takes the current monotonic time
/// in milliseconds and the driver never sleeps or blocks.
pub struct WlanDriver<T, E> {
    transport: T,
    events: E,
    climate: Climate,
    assembler: FrameAssembler,
    state: LinkState,
    init_time: u64,
    last_packet_sent: u64,
    transmit_counter: u8,
    receive_counter: u8,
    waiting_for_response: bool,
    sync_received: bool,
    last_command: Vec<u8>,
    set_queue: Vec<(u8, u8)>,
}

impl<T: Transport, E: ClimateEvents> WlanDriver<T, E> {
    /// Create a driver over the given transport. The settle delay starts
    /// counting from `now`.
    pub fn new(
        transport: T,
        events: E,
        current_temperature_offset: i8,
        outside_temperature_offset: i8,
        now: u64,
    ) -> Self {
        WlanDriver {
            transport,
            events,
            climate: Climate::new(current_temperature_offset, outside_temperature_offset),
            assembler: FrameAssembler::default(),
            state: LinkState::Initializing,
            init_time: now,
            last_packet_sent: now,
            transmit_counter: COUNTER_MIN,
            receive_counter: COUNTER_MIN,
            waiting_for_response: false,
            sync_received: false,
            last_command: Vec::new(),
            set_queue: Vec::new(),
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

    /// Run one iteration of the driver: advance the handshake, handle a
    /// completed frame, drain the transport, and fire any due resend or
    /// poll.
    pub fn poll(&mut self, now: u64) {
        if self.state == LinkState::Failed {
            return;
        }

        if self.state != LinkState::Ready {
            self.handle_init(now);

            if self.state != LinkState::Ready
                && now.saturating_sub(self.init_time) > INIT_FAIL_TIMEOUT
            {
                error!("handshake did not complete, giving up on the link");
                self.state = LinkState::Failed;
                self.events.link_failed();
                return;
            }
        }

        if self.assembler.is_complete(now) {
            let buffer = self.assembler.buffer().to_vec();
            self.assembler.clear();

            match validate(&buffer) {
                Ok(()) => {
                    trace!("received {:02X?}", buffer);
                    self.resync_counters(&buffer);
                    // Any valid packet counts as a response; the resend
                    // watchdog only covers a silent line.
                    self.waiting_for_response = false;
                    self.dispatch(&buffer, now);
                }
                Err(err) => warn!("dropping invalid packet: {err}"),
            }
        }

        self.assembler.push_from(&mut self.transport, now);
        self.handle_resend(now);
        self.handle_poll(now);
    }

    /// Apply a control request. Ignored wholesale unless the link is
    /// ready.
    pub fn apply(&mut self, request: &ControlRequest, now: u64) {
        if self.state != LinkState::Ready {
            warn!("ignoring control request, link is not ready");
            return;
        }

        if let Some(mode) = request.mode {
            match codec::encode_mode(mode) {
                Some(byte) => {
                    self.queue_setting(0xB0, byte);
                    self.queue_setting(0x80, 0x30);
                }
                None => self.queue_setting(0x80, 0x31),
            }
            // The unit acknowledges but never echoes a mode change, so
            // report it back right away.
            self.climate.set_mode(mode);
        }

        if let Some(target) = request.target_temperature {
            let raw = self.climate.encode_target_temperature(target);
            self.queue_setting(0x31, raw);
        }

        if let Some(fan) = request.fan_speed {
            self.queue_setting(0xB2, 0x41);
            self.queue_setting(0xA0, codec::encode_fan_speed(fan));
        }

        if let Some(swing) = request.swing_mode {
            use pana_ac_core::SwingMode::*;
            match swing {
                Both => self.queue_setting(0xA1, 0x41),
                Off => {
                    self.queue_setting(0xA1, 0x42);
                    self.queue_setting(0xA4, 0x43);
                    self.queue_setting(0xA5, 0x43);
                    self.queue_setting(0x35, 0x42);
                }
                Vertical => {
                    self.queue_setting(0xA1, 0x43);
                    self.queue_setting(0xA5, 0x43);
                }
                Horizontal => {
                    self.queue_setting(0xA1, 0x44);
                    self.queue_setting(0xA4, 0x43);
                }
            }
        }

        if let Some(position) = request.vertical_swing {
            match codec::encode_vertical_swing(position) {
                Some(byte) => self.queue_setting(0xA4, byte),
                None => warn!("vertical louver position {position:?} cannot be commanded"),
            }
        }

        if let Some(position) = request.horizontal_swing {
            match codec::encode_horizontal_swing(position) {
                Some(byte) => self.queue_setting(0xA5, byte),
                None => warn!("horizontal louver position {position:?} cannot be commanded"),
            }
        }

        if let Some(preset) = request.preset {
            self.queue_setting(0xB2, codec::encode_preset(preset));
            self.queue_setting(0x35, 0x42);
            self.queue_setting(0x34, 0x42);
        }

        if let Some(on) = request.nanoex {
            self.queue_setting(0x33, codec::encode_nanoex(on));
        }

        if request.eco.is_some() || request.econavi.is_some() || request.mild_dry.is_some() {
            warn!("eco, econavi and mild dry are not supported on this adapter");
        }

        if !self.set_queue.is_empty() {
            self.send_set_command(now);
        }

        if request.mode.is_some() {
            self.climate.publish(&mut self.events);
        }
    }

    fn handle_init(&mut self, now: u64) {
        match self.state {
            LinkState::Initializing => {
                if self.assembler.buffer().first() == Some(&SYNC) {
                    debug!("sync byte received, skipping the settle delay");
                    self.assembler.clear();
                    self.sync_received = true;
                }

                if self.sync_received || now.saturating_sub(self.init_time) > INIT_TIMEOUT {
                    info!("starting handshake");
                    self.send_command(CMD_HANDSHAKE_1, CommandType::Normal, now);
                    self.send_command(CMD_HANDSHAKE_2, CommandType::Normal, now);
                    self.state = LinkState::Handshake;
                }
            }
            LinkState::FirstPoll
                if now.saturating_sub(self.last_packet_sent) > FIRST_POLL_TIMEOUT =>
            {
                self.send_command(CMD_POLL, CommandType::Normal, now);
                self.state = LinkState::HandshakeEnding;
            }
            LinkState::HandshakeEnding
                if now.saturating_sub(self.last_packet_sent) > INIT_END_TIMEOUT =>
            {
                self.send_command(CMD_HANDSHAKE_16, CommandType::Normal, now);
            }
            _ => {}
        }
    }

    /// The receive counter follows the unit's traffic rather than the
    /// other way around; a mismatch resyncs instead of rejecting.
    fn resync_counters(&mut self, buffer: &[u8]) {
        if self.state != LinkState::Ready {
            return;
        }

        let counter = buffer[1];

        if self.waiting_for_response {
            if counter != decrement_counter(self.transmit_counter) && counter != COUNTER_MAX {
                debug!("resynchronizing receive counter to {counter:#04X}");
                self.receive_counter = counter;
            }
        } else if counter != self.receive_counter {
            debug!("resynchronizing receive counter to {counter:#04X}");
            self.receive_counter = counter;
        }
    }

    fn dispatch(&mut self, buffer: &[u8], now: u64) {
        match self.state {
            LinkState::Ready | LinkState::FirstPoll | LinkState::HandshakeEnding => {
                self.handle_packet(buffer, now)
            }
            _ => self.handle_handshake_packet(buffer, now),
        }
    }

    fn handle_packet(&mut self, buffer: &[u8], now: u64) {
        match (buffer[2], buffer[3]) {
            (0x01, 0x01) => {
                debug!("answering ping");
                self.send_command(CMD_PING, CommandType::Response, now);
            }
            (0x10, 0x89) => self.handle_poll_response(buffer),
            (0x10, 0x88) => debug!("set command acknowledged"),
            (0x10, 0x0A) => {
                self.send_command(CMD_REPORT_ACK, CommandType::Response, now);
                self.handle_report(buffer);
            }
            (0x01, 0x80) => {
                if self.state != LinkState::Ready {
                    info!("link established");
                    self.state = LinkState::Ready;
                }
            }
            (a, b) => warn!("received unknown packet type {a:#04X} {b:#04X}"),
        }
    }

    fn handle_poll_response(&mut self, buffer: &[u8]) {
        if buffer.len() != POLL_RESPONSE_SIZE {
            let err = ProtocolError::UnexpectedSize {
                expected: POLL_RESPONSE_SIZE,
                actual: buffer.len(),
            };
            warn!("dropping poll response: {err}");
            return;
        }

        if buffer[14] == 0x31 {
            self.climate.set_mode(ClimateMode::Off);
        } else if let Some(mode) = codec::decode_mode(buffer[18]) {
            self.climate.set_mode(mode);
        } else {
            warn!("received unknown mode byte {:#04X}", buffer[18]);
        }

        self.climate.set_target_temperature_raw(buffer[22]);

        if let Some(fan) = codec::decode_fan_speed(buffer[26]) {
            self.climate.set_fan_speed(fan);
        } else {
            warn!("received unknown fan speed byte {:#04X}", buffer[26]);
        }

        if let Some(swing) = codec::decode_swing_mode(buffer[30]) {
            self.climate.set_swing_mode(swing);
        } else {
            warn!("received unknown swing mode byte {:#04X}", buffer[30]);
        }

        if let Some(position) = codec::decode_horizontal_swing(buffer[34]) {
            self.climate.set_horizontal_swing(position);
        } else {
            warn!("received unknown horizontal louver byte {:#04X}", buffer[34]);
        }

        if let Some(position) = codec::decode_vertical_swing(buffer[38]) {
            self.climate.set_vertical_swing(position);
        } else {
            warn!("received unknown vertical louver byte {:#04X}", buffer[38]);
        }

        if let Some(preset) = codec::decode_preset(buffer[42]) {
            self.climate.set_preset(preset);
        } else {
            warn!("received unknown preset byte {:#04X}", buffer[42]);
        }

        self.climate.set_nanoex(codec::decode_nanoex(buffer[50]));
        self.climate.set_current_temperature_raw(buffer[62]);
        self.climate.set_outside_temperature_raw(buffer[66]);

        self.climate.publish(&mut self.events);
    }

    fn handle_report(&mut self, buffer: &[u8]) {
        if buffer.len() < 12 {
            warn!("change report too short, ignoring");
            return;
        }

        let count = buffer[10] as usize;
        if buffer.len() < 12 + count * 4 {
            warn!("change report claims {count} settings but is truncated, ignoring");
            return;
        }

        for i in 0..count {
            let key = buffer[12 + i * 4];
            let value = buffer[12 + i * 4 + 2];

            match key {
                0x80 => {
                    if value == 0x31 {
                        self.climate.set_mode(ClimateMode::Off);
                    }
                }
                0xB0 => {
                    if let Some(mode) = codec::decode_mode(value) {
                        self.climate.set_mode(mode);
                    } else {
                        warn!("report carries unknown mode byte {value:#04X}");
                    }
                }
                0x31 => self.climate.set_target_temperature_raw(value),
                0xA0 => {
                    if let Some(fan) = codec::decode_fan_speed(value) {
                        self.climate.set_fan_speed(fan);
                    } else {
                        warn!("report carries unknown fan speed byte {value:#04X}");
                    }
                }
                0xB2 => {
                    if let Some(preset) = codec::decode_preset(value) {
                        self.climate.set_preset(preset);
                    } else {
                        warn!("report carries unknown preset byte {value:#04X}");
                    }
                }
                0xA1 => {
                    if let Some(swing) = codec::decode_swing_mode(value) {
                        self.climate.set_swing_mode(swing);
                    } else {
                        warn!("report carries unknown swing mode byte {value:#04X}");
                    }
                }
                0xA5 => {
                    if let Some(position) = codec::decode_horizontal_swing(value) {
                        self.climate.set_horizontal_swing(position);
                    } else {
                        warn!("report carries unknown horizontal louver byte {value:#04X}");
                    }
                }
                0xA4 => {
                    if let Some(position) = codec::decode_vertical_swing(value) {
                        self.climate.set_vertical_swing(position);
                    } else {
                        warn!("report carries unknown vertical louver byte {value:#04X}");
                    }
                }
                0x33 => self.climate.set_nanoex(codec::decode_nanoex(value)),
                // Periodic timestamp marker, nothing to decode.
                0x20 => {}
                _ => debug!("report carries unknown key {key:#04X}"),
            }
        }

        self.climate.refresh_action();
        self.climate.publish(&mut self.events);
    }

    fn handle_handshake_packet(&mut self, buffer: &[u8], now: u64) {
        match (buffer[2], buffer[3]) {
            (0x00, 0x89) => self.send_command(CMD_HANDSHAKE_3, CommandType::Normal, now),
            (0x00, 0x8C) => self.send_command(CMD_HANDSHAKE_4, CommandType::Normal, now),
            (0x00, 0x90) => self.send_command(CMD_HANDSHAKE_5, CommandType::Normal, now),
            (0x00, 0x91) => self.send_command(CMD_HANDSHAKE_6, CommandType::Normal, now),
            (0x00, 0x92) => self.send_command(CMD_HANDSHAKE_7, CommandType::Normal, now),
            (0x00, 0xC1) => self.send_command(CMD_HANDSHAKE_8, CommandType::Normal, now),
            (0x01, 0xCC) => self.send_command(CMD_HANDSHAKE_9, CommandType::Normal, now),
            (0x10, 0x80) => self.send_command(CMD_HANDSHAKE_10, CommandType::Normal, now),
            (0x10, 0x81) => self.send_command(CMD_HANDSHAKE_11, CommandType::Normal, now),
            (0x00, 0x98) => self.send_command(CMD_HANDSHAKE_12, CommandType::Normal, now),
            (0x01, 0x80) => self.send_command(CMD_HANDSHAKE_13, CommandType::Normal, now),
            // Stray set acknowledgement from a previous session.
            (0x10, 0x88) => {}
            (0x01, 0x09) => {
                // The unit picks the counters; adopt its value before
                // acknowledging.
                self.receive_counter = buffer[1];
                self.send_command(CMD_HANDSHAKE_14, CommandType::Response, now);
            }
            (0x00, 0x20) => {
                self.state = LinkState::FirstPoll;
                self.send_command(CMD_HANDSHAKE_15, CommandType::Response, now);
            }
            (a, b) => warn!("received unknown handshake packet {a:#04X} {b:#04X}"),
        }
    }

    fn queue_setting(&mut self, key: u8, value: u8) {
        if self.set_queue.len() >= MAX_QUEUED_SETTINGS {
            error!("set queue overflow, dropping queued settings");
            self.set_queue.clear();
            return;
        }

        self.set_queue.push((key, value));
    }

    fn send_set_command(&mut self, now: u64) {
        let count = self.set_queue.len() as u8;

        let mut payload = vec![0x10, 0x08, 0x00, count * 4 - 1 + 6, 0x01, 0x01, 0x30, 0x01, count, 0x00];
        for (key, value) in &self.set_queue {
            payload.extend_from_slice(&[*key, 0x01, *value, 0x00]);
        }
        // The final filler byte gives its place to the checksum.
        payload.pop();

        self.set_queue.clear();
        self.send_command(&payload, CommandType::Normal, now);
    }

    fn send_command(&mut self, payload: &[u8], kind: CommandType, now: u64) {
        let counter = match kind {
            CommandType::Normal => self.transmit_counter,
            CommandType::Response => self.receive_counter,
            CommandType::Resend => decrement_counter(self.transmit_counter),
        };

        let packet = build_packet(counter, payload);

        match kind {
            CommandType::Normal => {
                self.transmit_counter = increment_counter(self.transmit_counter);
                self.last_command = payload.to_vec();
                self.waiting_for_response = true;
            }
            CommandType::Response => {
                self.receive_counter = increment_counter(self.receive_counter);
            }
            CommandType::Resend => {
                self.waiting_for_response = true;
            }
        }

        trace!("sending {:02X?}", packet);
        self.transport.write_all(&packet);
        self.last_packet_sent = now;
    }

    fn handle_resend(&mut self, now: u64) {
        if self.waiting_for_response
            && now.saturating_sub(self.last_packet_sent) > RESPONSE_TIMEOUT
            && self.assembler.is_empty()
            && !self.transport.bytes_available()
            && !self.last_command.is_empty()
        {
            debug!("no response after {RESPONSE_TIMEOUT} ms, resending");
            let payload = std::mem::take(&mut self.last_command);
            self.send_command(&payload, CommandType::Resend, now);
            self.last_command = payload;
        }
    }

    fn handle_poll(&mut self, now: u64) {
        if self.state == LinkState::Ready
            && now.saturating_sub(self.last_packet_sent) > POLL_INTERVAL
        {
            self.send_command(CMD_POLL, CommandType::Normal, now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::checksum;
    use pana_ac_core::testutil::{RecordingEvents, TestTransport};
    use pana_ac_core::{FanSpeed, SwingMode};

    type TestDriver = WlanDriver<TestTransport, RecordingEvents>;

    fn new_driver() -> TestDriver {
        WlanDriver::new(TestTransport::default(), RecordingEvents::default(), 0, 0, 0)
    }

    /// Queue a packet, let the driver read it, then advance past the
    /// silence window so it gets handled.
    fn deliver(driver: &mut TestDriver, now: &mut u64, packet: &[u8]) {
        driver.transport_mut().queue_rx(packet);
        *now += 5;
        driver.poll(*now);
        *now += 25;
        driver.poll(*now);
    }

    fn poll_response(counter: u8) -> Vec<u8> {
        poll_response_with_target(counter, 44) // 22.0 C
    }

    fn poll_response_with_target(counter: u8, target_raw: u8) -> Vec<u8> {
        let mut packet = vec![0u8; POLL_RESPONSE_SIZE];
        packet[0] = HEADER;
        packet[1] = counter;
        packet[2] = 0x10;
        packet[3] = 0x89;
        packet[14] = 0x30; // powered on
        packet[18] = 0x42; // cooling
        packet[22] = target_raw;
        packet[26] = 0x41; // automatic fan
        packet[30] = 0x42; // swing off
        packet[34] = 0x43; // louvers centered
        packet[38] = 0x43;
        packet[42] = 0x41; // normal preset
        packet[50] = 0x42; // nanoex off
        packet[62] = 22; // 22 C current
        packet[66] = 18; // 18 C outside
        let last = packet.len() - 1;
        packet[last] = checksum(&packet[..last]);
        packet
    }

    /// Walk the whole handshake and leave the driver ready.
    fn run_handshake(driver: &mut TestDriver, now: &mut u64) {
        *now = INIT_TIMEOUT + 1;
        driver.poll(*now);
        assert_eq!(driver.transport_mut().tx.len(), 2);
        assert_eq!(driver.state(), LinkState::Handshake);

        for body in [
            [0x00, 0x89],
            [0x00, 0x8C],
            [0x00, 0x90],
            [0x00, 0x91],
            [0x00, 0x92],
            [0x00, 0xC1],
            [0x01, 0xCC],
            [0x10, 0x80],
            [0x10, 0x81],
            [0x00, 0x98],
            [0x01, 0x80],
        ] {
            deliver(driver, now, &build_packet(0x01, &body));
        }

        // The unit seeds the counters, then releases the first poll.
        deliver(driver, now, &build_packet(0x05, &[0x01, 0x09]));
        deliver(driver, now, &build_packet(0x06, &[0x00, 0x20]));
        assert_eq!(driver.state(), LinkState::FirstPoll);

        *now += FIRST_POLL_TIMEOUT + 1;
        driver.poll(*now);
        assert_eq!(driver.state(), LinkState::HandshakeEnding);
        deliver(driver, now, &poll_response(0x07));

        *now += INIT_END_TIMEOUT + 1;
        driver.poll(*now);
        deliver(driver, now, &build_packet(0x08, &[0x01, 0x80]));
        assert_eq!(driver.state(), LinkState::Ready);
    }

    #[test]
    fn handshake_reaches_ready() {
        let mut driver = new_driver();
        let mut now = 0;
        run_handshake(&mut driver, &mut now);

        // Two openers, eleven follow-ups, two acknowledgements, the first
        // poll and the tail.
        assert_eq!(driver.transport_mut().tx.len(), 17);
        assert_eq!(
            driver.transport_mut().tx[0],
            build_packet(COUNTER_MIN, CMD_HANDSHAKE_1)
        );
        for packet in &driver.transport_mut().tx {
            let sum = packet.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
            assert_eq!(sum, 0);
        }
    }

    #[test]
    fn counter_seed_is_adopted_and_echoed() {
        let mut driver = new_driver();
        let mut now = 0;
        run_handshake(&mut driver, &mut now);

        // The acknowledgement of the seed packet reuses its counter.
        let seed_ack = build_packet(0x05, CMD_HANDSHAKE_14);
        assert!(driver.transport_mut().tx.contains(&seed_ack));
    }

    #[test]
    fn handshake_timeout_fails_the_link() {
        let mut driver = new_driver();
        driver.poll(INIT_FAIL_TIMEOUT + 1);
        assert_eq!(driver.state(), LinkState::Failed);
        assert!(driver.events().link_failed);

        // A failed link goes quiet for good.
        let sent = driver.transport_mut().tx.len();
        driver.poll(INIT_FAIL_TIMEOUT + 60_000);
        assert_eq!(driver.transport_mut().tx.len(), sent);
    }

    #[test]
    fn sync_byte_skips_the_settle_delay() {
        let mut driver = new_driver();
        driver.transport_mut().queue_rx(&[SYNC]);
        driver.poll(100);
        driver.poll(101);
        driver.poll(102);
        assert_eq!(driver.state(), LinkState::Handshake);
        assert_eq!(driver.transport_mut().tx.len(), 2);
    }

    #[test]
    fn ping_is_answered_with_the_units_counter() {
        let mut driver = new_driver();
        let mut now = 0;
        run_handshake(&mut driver, &mut now);

        deliver(&mut driver, &mut now, &build_packet(0x20, &[0x01, 0x01]));
        assert_eq!(
            driver.transport_mut().last_tx(),
            Some(build_packet(0x20, CMD_PING).as_slice())
        );
    }

    #[test]
    fn poll_response_decodes_and_deduplicates() {
        let mut driver = new_driver();
        let mut now = 0;
        run_handshake(&mut driver, &mut now);
        let updates_after_handshake = driver.events().climate_updates;

        deliver(&mut driver, &mut now, &poll_response_with_target(0x10, 46));
        let state = driver.events().last_state.clone().unwrap();
        assert_eq!(state.mode, ClimateMode::Cool);
        assert_eq!(state.target_temperature, Some(23.0));
        assert_eq!(state.current_temperature, Some(22));
        assert_eq!(state.fan_speed, FanSpeed::Automatic);
        assert_eq!(state.swing_mode, SwingMode::Off);
        assert_eq!(driver.events().outside_temperatures, vec![18]);

        // An identical report produces no further notifications.
        let updates = driver.events().climate_updates;
        assert!(updates > updates_after_handshake);
        deliver(&mut driver, &mut now, &poll_response_with_target(0x10, 46));
        assert_eq!(driver.events().climate_updates, updates);
        assert_eq!(driver.events().outside_temperatures, vec![18]);
    }

    #[test]
    fn change_report_is_acknowledged_and_applied() {
        let mut driver = new_driver();
        let mut now = 0;
        run_handshake(&mut driver, &mut now);

        // Two settings: heat mode and a 21.0 C target.
        let payload = [
            0x10, 0x0A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, //
            0xB0, 0x01, 0x43, 0x00, //
            0x31, 0x01, 42, 0x00,
        ];
        deliver(&mut driver, &mut now, &build_packet(0x30, &payload));

        assert_eq!(
            driver.transport_mut().last_tx(),
            Some(build_packet(0x30, CMD_REPORT_ACK).as_slice())
        );
        let state = driver.events().last_state.clone().unwrap();
        assert_eq!(state.mode, ClimateMode::Heat);
        assert_eq!(state.target_temperature, Some(21.0));
    }

    #[test]
    fn set_command_layout() {
        let mut driver = new_driver();
        let mut now = 0;
        run_handshake(&mut driver, &mut now);

        let request = ControlRequest {
            mode: Some(ClimateMode::Heat),
            ..Default::default()
        };
        driver.apply(&request, now);

        let packet = driver.transport_mut().last_tx().unwrap().to_vec();
        assert_eq!(packet.len(), 20);
        assert_eq!(&packet[2..12], &[0x10, 0x08, 0x00, 0x0D, 0x01, 0x01, 0x30, 0x01, 0x02, 0x00]);
        assert_eq!(&packet[12..16], &[0xB0, 0x01, 0x43, 0x00]);
        assert_eq!(&packet[16..19], &[0x80, 0x01, 0x30]);
        let sum = packet.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
        assert_eq!(sum, 0);

        // The mode change is reported optimistically, before any ack.
        assert_eq!(
            driver.events().last_state.as_ref().unwrap().mode,
            ClimateMode::Heat
        );
    }

    #[test]
    fn full_request_fits_one_set_command() {
        let mut driver = new_driver();
        let mut now = 0;
        run_handshake(&mut driver, &mut now);

        let request = ControlRequest {
            mode: Some(ClimateMode::Heat),
            target_temperature: Some(23.5),
            fan_speed: Some(FanSpeed::Level2),
            swing_mode: Some(SwingMode::Off),
            vertical_swing: Some(pana_ac_core::VerticalSwing::Down),
            horizontal_swing: Some(pana_ac_core::HorizontalSwing::Left),
            preset: Some(pana_ac_core::Preset::Quiet),
            nanoex: Some(true),
            ..Default::default()
        };
        driver.apply(&request, now);

        let packet = driver.transport_mut().last_tx().unwrap().to_vec();
        assert_eq!(packet.len(), 12 + 4 * 15);
        assert_eq!(packet[10], 15);
        let sum = packet.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
        assert_eq!(sum, 0);
    }

    #[test]
    fn queue_overflow_drops_every_pending_setting() {
        let mut driver = new_driver();
        for i in 0..MAX_QUEUED_SETTINGS {
            driver.queue_setting(0x31, i as u8);
        }
        assert_eq!(driver.set_queue.len(), MAX_QUEUED_SETTINGS);

        // One past the cap wipes the queue, so nothing goes out this
        // cycle.
        driver.queue_setting(0x31, 0xFF);
        assert!(driver.set_queue.is_empty());
    }

    #[test]
    fn control_is_ignored_before_ready() {
        let mut driver = new_driver();
        let request = ControlRequest {
            mode: Some(ClimateMode::Cool),
            ..Default::default()
        };
        driver.apply(&request, 0);
        assert!(driver.transport_mut().tx.is_empty());
    }

    #[test]
    fn unanswered_poll_is_resent_verbatim() {
        let mut driver = new_driver();
        let mut now = 0;
        run_handshake(&mut driver, &mut now);

        now += POLL_INTERVAL + 1;
        driver.poll(now);
        let poll_packet = driver.transport_mut().last_tx().unwrap().to_vec();
        assert_eq!(&poll_packet[2..6], CMD_POLL);

        now += RESPONSE_TIMEOUT + 1;
        driver.poll(now);
        assert_eq!(driver.transport_mut().last_tx(), Some(poll_packet.as_slice()));
        assert_eq!(
            driver.transport_mut().tx.iter().filter(|p| **p == poll_packet).count(),
            2
        );
    }

    #[test]
    fn any_valid_traffic_disarms_the_resend_watchdog() {
        let mut driver = new_driver();
        let mut now = 0;
        run_handshake(&mut driver, &mut now);

        now += POLL_INTERVAL + 1;
        driver.poll(now);
        let poll_packet = driver.transport_mut().last_tx().unwrap().to_vec();
        assert_eq!(&poll_packet[2..6], CMD_POLL);

        // A ping arrives instead of the poll response.
        deliver(&mut driver, &mut now, &build_packet(0x21, &[0x01, 0x01]));

        // The response window expires, but the line was not silent, so
        // the poll must not go out again.
        now += RESPONSE_TIMEOUT + 1;
        let sent = driver.transport_mut().tx.len();
        driver.poll(now);
        assert_eq!(driver.transport_mut().tx.len(), sent);
        assert_eq!(
            driver.transport_mut().tx.iter().filter(|p| **p == poll_packet).count(),
            1
        );
    }

    #[test]
    fn transmit_counter_wraps_across_many_polls() {
        let mut driver = new_driver();
        let mut now = 0;
        run_handshake(&mut driver, &mut now);

        let sent_before = driver.transport_mut().tx.len();
        for _ in 0..300 {
            now += POLL_INTERVAL + 1;
            driver.poll(now);
            deliver(&mut driver, &mut now, &poll_response(0x20));
        }

        let counters: Vec<u8> = driver.transport_mut().tx[sent_before..]
            .iter()
            .filter(|p| &p[2..6] == CMD_POLL)
            .map(|p| p[1])
            .collect();

        assert_eq!(counters.len(), 300);
        assert!(counters.iter().all(|c| *c != 0x00 && *c != 0xFF));
        for pair in counters.windows(2) {
            assert_eq!(pair[1], increment_counter(pair[0]));
        }
        // 300 sends from a post-handshake seed must cross the wrap.
        assert!(counters
            .windows(2)
            .any(|pair| pair[0] == COUNTER_MAX && pair[1] == COUNTER_MIN));
    }
}
