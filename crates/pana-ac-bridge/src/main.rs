//! Serial bridge for Panasonic AC adapter protocols.
//!
//! Opens a serial port wired to the unit's CN-WLAN or CN-CNT connector,
//! runs the matching driver, and logs every state change. Optionally
//! applies a one-shot control request once the link is up.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use pana_ac_core::{
    AdapterKind, ClimateEvents, ClimateMode, ClimateState, ControlRequest, Transport,
};

#[derive(Parser)]
#[command(name = "pana-ac-bridge", version, about)]
struct Args {
    /// Serial device wired to the adapter connector, e.g. /dev/ttyUSB0
    port: String,

    /// Which adapter module is attached
    #[arg(long, value_enum, default_value_t = Adapter::Wlan)]
    adapter: Adapter,

    /// Baud rate of the serial line
    #[arg(long, default_value_t = 9600)]
    baud: u32,

    /// Correction added to the reported indoor temperature
    #[arg(long, default_value_t = 0)]
    current_temperature_offset: i8,

    /// Correction added to the reported outdoor temperature
    #[arg(long, default_value_t = 0)]
    outside_temperature_offset: i8,

    /// Switch the unit to this mode once the link is up
    #[arg(long, value_enum)]
    set_mode: Option<Mode>,

    /// Set this target temperature once the link is up
    #[arg(long)]
    set_target: Option<f32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Adapter {
    /// DNSK-P11 on the CN-WLAN connector
    Wlan,
    /// CZ-TACG1 on the CN-CNT connector
    Cnt,
}

impl From<Adapter> for AdapterKind {
    fn from(adapter: Adapter) -> Self {
        match adapter {
            Adapter::Wlan => AdapterKind::DnskP11,
            Adapter::Cnt => AdapterKind::CzTacg1,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Off,
    Auto,
    Cool,
    Heat,
    Dry,
    Fan,
}

impl From<Mode> for ClimateMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Off => ClimateMode::Off,
            Mode::Auto => ClimateMode::HeatCool,
            Mode::Cool => ClimateMode::Cool,
            Mode::Heat => ClimateMode::Heat,
            Mode::Dry => ClimateMode::Dry,
            Mode::Fan => ClimateMode::FanOnly,
        }
    }
}

/// Non-blocking [`Transport`] over a host serial port.
struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
    rx: VecDeque<u8>,
}

impl SerialTransport {
    /// The units talk 9600 8E1 on both connectors.
    fn open(path: &str, baud: u32) -> Result<Self> {
        let port = serialport::new(path, baud)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::Even)
            .stop_bits(serialport::StopBits::One)
            .timeout(Duration::from_millis(1))
            .open()
            .with_context(|| format!("opening serial port {path}"))?;

        Ok(SerialTransport {
            port,
            rx: VecDeque::new(),
        })
    }

    fn pump(&mut self) {
        let waiting = match self.port.bytes_to_read() {
            Ok(n) => n as usize,
            Err(err) => {
                warn!("serial port query failed: {err}");
                return;
            }
        };

        if waiting == 0 {
            return;
        }

        let mut buffer = vec![0; waiting];
        match self.port.read(&mut buffer) {
            Ok(read) => self.rx.extend(&buffer[..read]),
            Err(err) if err.kind() == std::io::ErrorKind::TimedOut => {}
            Err(err) => warn!("serial read failed: {err}"),
        }
    }
}

impl Transport for SerialTransport {
    fn bytes_available(&mut self) -> bool {
        self.pump();
        !self.rx.is_empty()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write_all(&mut self, data: &[u8]) {
        if let Err(err) = self.port.write_all(data) {
            error!("serial write failed: {err}");
        }
    }
}

/// Logs every change the driver reports.
struct LogEvents;

impl ClimateEvents for LogEvents {
    fn climate_updated(&mut self, state: &ClimateState) {
        info!(
            "climate: mode {:?}, action {:?}, target {:?}, current {:?}, fan {:?}, swing {:?}, preset {:?}",
            state.mode,
            state.action,
            state.target_temperature,
            state.current_temperature,
            state.fan_speed,
            state.swing_mode,
            state.preset,
        );
    }

    fn outside_temperature_updated(&mut self, celsius: i16) {
        info!("outside temperature: {celsius} C");
    }

    fn vertical_swing_updated(&mut self, position: pana_ac_core::VerticalSwing) {
        info!("vertical louver: {position:?}");
    }

    fn horizontal_swing_updated(&mut self, position: pana_ac_core::HorizontalSwing) {
        info!("horizontal louver: {position:?}");
    }

    fn nanoex_updated(&mut self, on: bool) {
        info!("nanoex: {on}");
    }

    fn eco_updated(&mut self, on: bool) {
        info!("eco: {on}");
    }

    fn mild_dry_updated(&mut self, on: bool) {
        info!("mild dry: {on}");
    }

    fn power_updated(&mut self, watts: u16) {
        info!("power: {watts} W");
    }

    fn energy_updated(&mut self, kwh: f64) {
        info!("energy today: {kwh:.3} kWh");
    }

    fn link_failed(&mut self) {
        error!("link failed");
    }
}

fn control_request(args: &Args) -> ControlRequest {
    ControlRequest {
        mode: args.set_mode.map(Into::into),
        target_temperature: args.set_target,
        ..Default::default()
    }
}

fn run_wlan(args: &Args, transport: SerialTransport) -> Result<()> {
    use pana_ac_wlan::{LinkState, WlanDriver};

    let start = Instant::now();
    let mut driver = WlanDriver::new(
        transport,
        LogEvents,
        args.current_temperature_offset,
        args.outside_temperature_offset,
        0,
    );

    let request = control_request(args);
    let mut applied = request.is_empty();

    loop {
        let now = start.elapsed().as_millis() as u64;
        driver.poll(now);

        match driver.state() {
            LinkState::Failed => bail!("the unit never completed the handshake"),
            LinkState::Ready if !applied => {
                driver.apply(&request, now);
                applied = true;
            }
            _ => {}
        }

        std::thread::sleep(Duration::from_millis(5));
    }
}

fn run_cnt(args: &Args, transport: SerialTransport) -> Result<()> {
    use pana_ac_cnt::{CntDriver, LinkState};

    let start = Instant::now();
    let mut driver = CntDriver::new(
        transport,
        LogEvents,
        args.current_temperature_offset,
        args.outside_temperature_offset,
        0,
    );

    let request = control_request(args);
    let mut applied = request.is_empty();

    loop {
        let now = start.elapsed().as_millis() as u64;
        driver.poll(now);

        if driver.state() == LinkState::Ready && !applied {
            driver.apply(&request, now);
            applied = true;
        }

        std::thread::sleep(Duration::from_millis(5));
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let transport = SerialTransport::open(&args.port, args.baud)?;

    match AdapterKind::from(args.adapter) {
        AdapterKind::DnskP11 => run_wlan(&args, transport),
        AdapterKind::CzTacg1 => run_cnt(&args, transport),
    }
}
