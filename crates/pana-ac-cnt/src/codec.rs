//! Field encoding for the CZ-TACG1 register image.
//!
//! Most registers pack two settings into one byte, one per nibble. The
//! mutation helpers therefore take the current byte and rewrite only their
//! own nibble.

use pana_ac_core::{ClimateMode, FanSpeed, HorizontalSwing, Preset, SwingMode, VerticalSwing};

/// Mode register: the low nibble is the power state, the high nibble the
/// selected mode. A zero low nibble means the unit is off.
pub fn decode_mode(byte: u8) -> Option<ClimateMode> {
    if byte & 0x0F == 0 {
        return Some(ClimateMode::Off);
    }

    match byte >> 4 {
        0x0 => Some(ClimateMode::HeatCool),
        0x3 => Some(ClimateMode::Cool),
        0x4 => Some(ClimateMode::Heat),
        0x2 => Some(ClimateMode::Dry),
        0x6 => Some(ClimateMode::FanOnly),
        _ => None,
    }
}

/// The full mode register byte for a powered-on mode. Turning off keeps
/// the mode nibble and clears the power nibble instead.
pub fn encode_mode(mode: ClimateMode) -> Option<u8> {
    match mode {
        ClimateMode::HeatCool => Some(0x04),
        ClimateMode::Cool => Some(0x34),
        ClimateMode::Heat => Some(0x44),
        ClimateMode::Dry => Some(0x24),
        ClimateMode::FanOnly => Some(0x64),
        ClimateMode::Off => None,
    }
}

pub fn decode_fan_speed(byte: u8) -> Option<FanSpeed> {
    match byte {
        0xA0 => Some(FanSpeed::Automatic),
        0x30 => Some(FanSpeed::Level1),
        0x40 => Some(FanSpeed::Level2),
        0x50 => Some(FanSpeed::Level3),
        0x60 => Some(FanSpeed::Level4),
        0x70 => Some(FanSpeed::Level5),
        _ => None,
    }
}

pub fn encode_fan_speed(fan: FanSpeed) -> u8 {
    match fan {
        FanSpeed::Automatic => 0xA0,
        FanSpeed::Level1 => 0x30,
        FanSpeed::Level2 => 0x40,
        FanSpeed::Level3 => 0x50,
        FanSpeed::Level4 => 0x60,
        FanSpeed::Level5 => 0x70,
    }
}

/// High nibble of the swing register.
pub fn decode_vertical_swing(byte: u8) -> Option<VerticalSwing> {
    match byte >> 4 {
        0xF => Some(VerticalSwing::Auto),
        0x1 => Some(VerticalSwing::Up),
        0x2 => Some(VerticalSwing::UpCenter),
        0x3 => Some(VerticalSwing::Center),
        0x4 => Some(VerticalSwing::DownCenter),
        0x5 => Some(VerticalSwing::Down),
        0x0 => Some(VerticalSwing::Unsupported),
        _ => None,
    }
}

/// The vertical louver's contribution to the swing register.
pub fn vertical_swing_bits(position: VerticalSwing) -> Option<u8> {
    match position {
        VerticalSwing::Auto => Some(0xF0),
        VerticalSwing::Up => Some(0x10),
        VerticalSwing::UpCenter => Some(0x20),
        VerticalSwing::Center => Some(0x30),
        VerticalSwing::DownCenter => Some(0x40),
        VerticalSwing::Down => Some(0x50),
        VerticalSwing::Unsupported => None,
    }
}

/// Low nibble of the swing register.
pub fn decode_horizontal_swing(byte: u8) -> Option<HorizontalSwing> {
    match byte & 0x0F {
        0xD => Some(HorizontalSwing::Auto),
        0x9 => Some(HorizontalSwing::Left),
        0xA => Some(HorizontalSwing::LeftCenter),
        0x6 => Some(HorizontalSwing::Center),
        0xB => Some(HorizontalSwing::RightCenter),
        0xC => Some(HorizontalSwing::Right),
        0x0 => Some(HorizontalSwing::Unsupported),
        _ => None,
    }
}

/// The horizontal louver's contribution to the swing register.
pub fn horizontal_swing_bits(position: HorizontalSwing) -> Option<u8> {
    match position {
        HorizontalSwing::Auto => Some(0x0D),
        HorizontalSwing::Left => Some(0x09),
        HorizontalSwing::LeftCenter => Some(0x0A),
        HorizontalSwing::Center => Some(0x06),
        HorizontalSwing::RightCenter => Some(0x0B),
        HorizontalSwing::Right => Some(0x0C),
        HorizontalSwing::Unsupported => None,
    }
}

/// The aggregate swing mode is not its own register; it falls out of
/// which louvers are sweeping.
pub fn aggregate_swing(vertical: VerticalSwing, horizontal: HorizontalSwing) -> SwingMode {
    match (vertical, horizontal) {
        (VerticalSwing::Auto, HorizontalSwing::Auto) => SwingMode::Both,
        (VerticalSwing::Auto, _) => SwingMode::Vertical,
        (_, HorizontalSwing::Auto) => SwingMode::Horizontal,
        _ => SwingMode::Off,
    }
}

/// Low nibble of the preset register.
pub fn decode_preset(byte: u8) -> Option<Preset> {
    match byte & 0x0F {
        0x0 => Some(Preset::Normal),
        0x2 => Some(Preset::Powerful),
        0x4 => Some(Preset::Quiet),
        _ => None,
    }
}

pub fn preset_bits(preset: Preset) -> u8 {
    match preset {
        Preset::Normal => 0x0,
        Preset::Powerful => 0x2,
        Preset::Quiet => 0x4,
    }
}

/// nanoe(X) shares the preset register, in the high nibble.
pub fn decode_nanoex(byte: u8) -> bool {
    byte & 0xF0 == 0x40
}

pub fn decode_eco(byte: u8) -> bool {
    byte == 0x40
}

pub fn encode_eco(on: bool) -> u8 {
    if on {
        0x40
    } else {
        0x00
    }
}

pub fn decode_mild_dry(byte: u8) -> Option<bool> {
    match byte {
        0x7F => Some(true),
        0x80 => Some(false),
        _ => None,
    }
}

pub fn encode_mild_dry(on: bool) -> u8 {
    if on {
        0x7F
    } else {
        0x80
    }
}
