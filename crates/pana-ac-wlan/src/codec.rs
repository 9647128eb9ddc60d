//! Field encoding for the DNSK-P11 protocol.
//!
//! Settings travel as key/value pairs; this module maps the value bytes to
//! and from the semantic types. Unknown bytes decode to `None` so the
//! driver can keep the previous value and log the packet.

use pana_ac_core::{ClimateMode, FanSpeed, HorizontalSwing, Preset, SwingMode, VerticalSwing};

pub fn decode_mode(byte: u8) -> Option<ClimateMode> {
    match byte {
        0x41 => Some(ClimateMode::HeatCool),
        0x42 => Some(ClimateMode::Cool),
        0x43 => Some(ClimateMode::Heat),
        0x44 => Some(ClimateMode::Dry),
        0x45 => Some(ClimateMode::FanOnly),
        _ => None,
    }
}

/// The mode byte for a set command. `Off` has no mode byte; it is sent as
/// a power pair instead.
pub fn encode_mode(mode: ClimateMode) -> Option<u8> {
    match mode {
        ClimateMode::HeatCool => Some(0x41),
        ClimateMode::Cool => Some(0x42),
        ClimateMode::Heat => Some(0x43),
        ClimateMode::Dry => Some(0x44),
        ClimateMode::FanOnly => Some(0x45),
        ClimateMode::Off => None,
    }
}

pub fn decode_fan_speed(byte: u8) -> Option<FanSpeed> {
    match byte {
        0x41 => Some(FanSpeed::Automatic),
        0x32 => Some(FanSpeed::Level1),
        0x33 => Some(FanSpeed::Level2),
        0x34 => Some(FanSpeed::Level3),
        0x35 => Some(FanSpeed::Level4),
        0x36 => Some(FanSpeed::Level5),
        _ => None,
    }
}

pub fn encode_fan_speed(fan: FanSpeed) -> u8 {
    match fan {
        FanSpeed::Automatic => 0x41,
        FanSpeed::Level1 => 0x32,
        FanSpeed::Level2 => 0x33,
        FanSpeed::Level3 => 0x34,
        FanSpeed::Level4 => 0x35,
        FanSpeed::Level5 => 0x36,
    }
}

pub fn decode_preset(byte: u8) -> Option<Preset> {
    match byte {
        0x41 => Some(Preset::Normal),
        0x42 => Some(Preset::Powerful),
        0x43 => Some(Preset::Quiet),
        _ => None,
    }
}

pub fn encode_preset(preset: Preset) -> u8 {
    match preset {
        Preset::Normal => 0x41,
        Preset::Powerful => 0x42,
        Preset::Quiet => 0x43,
    }
}

pub fn decode_swing_mode(byte: u8) -> Option<SwingMode> {
    match byte {
        0x41 => Some(SwingMode::Both),
        0x42 => Some(SwingMode::Off),
        0x43 => Some(SwingMode::Vertical),
        0x44 => Some(SwingMode::Horizontal),
        _ => None,
    }
}

pub fn decode_vertical_swing(byte: u8) -> Option<VerticalSwing> {
    match byte {
        0x41 => Some(VerticalSwing::Up),
        0x44 => Some(VerticalSwing::UpCenter),
        0x43 => Some(VerticalSwing::Center),
        0x45 => Some(VerticalSwing::DownCenter),
        0x42 => Some(VerticalSwing::Down),
        _ => None,
    }
}

/// Only fixed positions can be commanded; sweep is selected through the
/// swing mode instead.
pub fn encode_vertical_swing(position: VerticalSwing) -> Option<u8> {
    match position {
        VerticalSwing::Up => Some(0x41),
        VerticalSwing::UpCenter => Some(0x44),
        VerticalSwing::Center => Some(0x43),
        VerticalSwing::DownCenter => Some(0x45),
        VerticalSwing::Down => Some(0x42),
        VerticalSwing::Auto | VerticalSwing::Unsupported => None,
    }
}

pub fn decode_horizontal_swing(byte: u8) -> Option<HorizontalSwing> {
    match byte {
        0x42 => Some(HorizontalSwing::Left),
        0x5C => Some(HorizontalSwing::LeftCenter),
        0x43 => Some(HorizontalSwing::Center),
        0x56 => Some(HorizontalSwing::RightCenter),
        0x41 => Some(HorizontalSwing::Right),
        _ => None,
    }
}

pub fn encode_horizontal_swing(position: HorizontalSwing) -> Option<u8> {
    match position {
        HorizontalSwing::Left => Some(0x42),
        HorizontalSwing::LeftCenter => Some(0x5C),
        HorizontalSwing::Center => Some(0x43),
        HorizontalSwing::RightCenter => Some(0x56),
        HorizontalSwing::Right => Some(0x41),
        HorizontalSwing::Auto | HorizontalSwing::Unsupported => None,
    }
}

pub fn decode_nanoex(byte: u8) -> bool {
    byte != 0x42
}

pub fn encode_nanoex(on: bool) -> u8 {
    if on {
        0x45
    } else {
        0x42
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_bytes_round_trip() {
        for mode in [
            ClimateMode::HeatCool,
            ClimateMode::Cool,
            ClimateMode::Heat,
            ClimateMode::Dry,
            ClimateMode::FanOnly,
        ] {
            let byte = encode_mode(mode).unwrap();
            assert_eq!(decode_mode(byte), Some(mode));
        }
        assert_eq!(encode_mode(ClimateMode::Off), None);
        assert_eq!(decode_mode(0x99), None);
    }

    #[test]
    fn fan_bytes_are_ascii_digits_plus_auto() {
        assert_eq!(decode_fan_speed(0x41), Some(FanSpeed::Automatic));
        assert_eq!(decode_fan_speed(0x32), Some(FanSpeed::Level1));
        assert_eq!(decode_fan_speed(0x36), Some(FanSpeed::Level5));
        assert_eq!(encode_fan_speed(FanSpeed::Level3), 0x34);

        for fan in [
            FanSpeed::Automatic,
            FanSpeed::Level1,
            FanSpeed::Level2,
            FanSpeed::Level3,
            FanSpeed::Level4,
            FanSpeed::Level5,
        ] {
            assert_eq!(decode_fan_speed(encode_fan_speed(fan)), Some(fan));
        }
    }

    #[test]
    fn preset_and_louver_bytes_round_trip() {
        for preset in [Preset::Normal, Preset::Powerful, Preset::Quiet] {
            assert_eq!(decode_preset(encode_preset(preset)), Some(preset));
        }
        for position in [
            VerticalSwing::Up,
            VerticalSwing::UpCenter,
            VerticalSwing::Center,
            VerticalSwing::DownCenter,
            VerticalSwing::Down,
        ] {
            let byte = encode_vertical_swing(position).unwrap();
            assert_eq!(decode_vertical_swing(byte), Some(position));
        }
        for position in [
            HorizontalSwing::Left,
            HorizontalSwing::LeftCenter,
            HorizontalSwing::Center,
            HorizontalSwing::RightCenter,
            HorizontalSwing::Right,
        ] {
            let byte = encode_horizontal_swing(position).unwrap();
            assert_eq!(decode_horizontal_swing(byte), Some(position));
        }
    }

    #[test]
    fn louver_sweep_positions_cannot_be_commanded() {
        assert_eq!(encode_vertical_swing(VerticalSwing::Auto), None);
        assert_eq!(encode_horizontal_swing(HorizontalSwing::Unsupported), None);
        assert_eq!(encode_vertical_swing(VerticalSwing::Down), Some(0x42));
        assert_eq!(
            decode_horizontal_swing(0x56),
            Some(HorizontalSwing::RightCenter)
        );
    }

    #[test]
    fn nanoex_is_off_only_for_its_off_byte() {
        assert!(!decode_nanoex(0x42));
        assert!(decode_nanoex(0x45));
        assert_eq!(encode_nanoex(false), 0x42);
    }
}
