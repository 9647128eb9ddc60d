//! Semantic field types shared by both protocol variants.

/// Which adapter module is attached to the indoor unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    /// DNSK-P11 module via the CN-WLAN connector.
    DnskP11,
    /// CZ-TACG1 module via the CN-CNT connector.
    CzTacg1,
}

/// Operating mode of the AC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClimateMode {
    /// Unit is off.
    #[default]
    Off,
    /// Automatic heat/cool.
    HeatCool,
    /// Cooling.
    Cool,
    /// Heating.
    Heat,
    /// Dehumidify.
    Dry,
    /// Fan only, no heating or cooling.
    FanOnly,
}

/// What the unit is currently doing, derived from mode and temperatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClimateAction {
    /// Unit is off.
    #[default]
    Off,
    /// Circulating air only.
    Fan,
    /// Dehumidifying.
    Drying,
    /// Actively cooling.
    Cooling,
    /// Actively heating.
    Heating,
    /// On, but setpoint reached.
    Idle,
}

/// Fan speed setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanSpeed {
    /// Fan speed controlled by the unit.
    #[default]
    Automatic,
    /// Lowest speed.
    Level1,
    /// Level 2.
    Level2,
    /// Level 3.
    Level3,
    /// Level 4.
    Level4,
    /// Highest speed.
    Level5,
}

/// Manual position of the vertical (up/down) louver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalSwing {
    /// Louver sweeping automatically.
    Auto,
    /// Fixed fully up.
    Up,
    /// Fixed between up and center.
    UpCenter,
    /// Fixed center.
    #[default]
    Center,
    /// Fixed between center and down.
    DownCenter,
    /// Fixed fully down.
    Down,
    /// Unit reports no vertical louver.
    Unsupported,
}

/// Manual position of the horizontal (left/right) louver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalSwing {
    /// Louver sweeping automatically.
    Auto,
    /// Fixed fully left.
    Left,
    /// Fixed between left and center.
    LeftCenter,
    /// Fixed center.
    #[default]
    Center,
    /// Fixed between center and right.
    RightCenter,
    /// Fixed fully right.
    Right,
    /// Unit reports no horizontal louver.
    Unsupported,
}

/// Aggregate swing mode as exposed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwingMode {
    /// Both louvers fixed.
    #[default]
    Off,
    /// Vertical louver sweeping.
    Vertical,
    /// Horizontal louver sweeping.
    Horizontal,
    /// Both louvers sweeping.
    Both,
}

/// Operating preset, independent of the toggle switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Regular operation.
    #[default]
    Normal,
    /// Boosted output.
    Powerful,
    /// Reduced noise.
    Quiet,
}

/// A control intent from the host.
///
/// Any subset of fields may be set; drivers ignore the whole request unless
/// the link is in its ready state. Fields left `None` are untouched.
#[derive(Debug, Clone, Default)]
pub struct ControlRequest {
    /// Requested operating mode.
    pub mode: Option<ClimateMode>,
    /// Requested target temperature in degrees Celsius.
    pub target_temperature: Option<f32>,
    /// Requested fan speed.
    pub fan_speed: Option<FanSpeed>,
    /// Requested aggregate swing mode.
    pub swing_mode: Option<SwingMode>,
    /// Requested fixed vertical louver position.
    pub vertical_swing: Option<VerticalSwing>,
    /// Requested fixed horizontal louver position.
    pub horizontal_swing: Option<HorizontalSwing>,
    /// Requested preset.
    pub preset: Option<Preset>,
    /// Toggle nanoe(X) air treatment.
    pub nanoex: Option<bool>,
    /// Toggle eco mode.
    pub eco: Option<bool>,
    /// Toggle econavi mode.
    pub econavi: Option<bool>,
    /// Toggle mild dry mode.
    pub mild_dry: Option<bool>,
}

impl ControlRequest {
    /// True if no field is set.
    pub fn is_empty(&self) -> bool {
        self.mode.is_none()
            && self.target_temperature.is_none()
            && self.fan_speed.is_none()
            && self.swing_mode.is_none()
            && self.vertical_swing.is_none()
            && self.horizontal_swing.is_none()
            && self.preset.is_none()
            && self.nanoex.is_none()
            && self.eco.is_none()
            && self.econavi.is_none()
            && self.mild_dry.is_none()
    }
}
