use crate::{
    Result,
    constants::{
        BLINK_BIT, BLINK_SHIFT, COLOR_MASK, DATA_MASK, INDICATOR_ADDRESS, LEVER_ADDRESS,
        MAX_BUS_ADDRESS,
    },
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 7-bit address of a peripheral on the shared bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BusAddress(u8);

impl BusAddress {
    /// Address of the tri-color indicator.
    pub const INDICATOR: BusAddress = BusAddress(INDICATOR_ADDRESS);

    /// Address of the lever switch.
    pub const LEVER: BusAddress = BusAddress(LEVER_ADDRESS);

    /// Create a new bus address with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidAddress` if the address does not fit 7 bits.
    pub fn new(address: u8) -> Result<Self> {
        if address > MAX_BUS_ADDRESS {
            return Err(Error::InvalidAddress(address));
        }
        Ok(BusAddress(address))
    }

    /// Get the raw address.
    #[must_use]
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for BusAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

impl TryFrom<u8> for BusAddress {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        BusAddress::new(value)
    }
}

impl From<BusAddress> for u8 {
    fn from(address: BusAddress) -> u8 {
        address.0
    }
}

/// The two peripheral kinds that share the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Peripheral {
    Indicator,
    Lever,
}

impl Peripheral {
    /// Factory-default bus address of this peripheral.
    #[must_use]
    pub fn address(&self) -> BusAddress {
        match self {
            Peripheral::Indicator => BusAddress::INDICATOR,
            Peripheral::Lever => BusAddress::LEVER,
        }
    }
}

impl fmt::Display for Peripheral {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Peripheral::Indicator => write!(f, "indicator"),
            Peripheral::Lever => write!(f, "lever"),
        }
    }
}

/// Named indicator colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    None = 0,
    Red = 1,
    Green = 2,
}

impl Color {
    #[must_use]
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Map a raw color code to a named color.
    ///
    /// # Errors
    /// Returns `Error::InvalidColorCode` for codes without a name.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Color::None),
            1 => Ok(Color::Red),
            2 => Ok(Color::Green),
            _ => Err(Error::InvalidColorCode(code)),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::None => write!(f, "off"),
            Color::Red => write!(f, "red"),
            Color::Green => write!(f, "green"),
        }
    }
}

/// Raw 3-bit color code as carried in the indicator data nibble.
///
/// The wire accepts every value 0-7. Codes without a [`Color`] name are kept
/// as they are and light no lamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct ColorCode(u8);

impl ColorCode {
    /// Build a color code, masking to the low 3 bits.
    #[must_use]
    pub fn new(raw: u8) -> Self {
        ColorCode(raw & COLOR_MASK)
    }

    #[must_use]
    pub fn as_u8(&self) -> u8 {
        self.0
    }

    /// Named color for this code, if it has one.
    #[must_use]
    pub fn color(&self) -> Option<Color> {
        Color::from_code(self.0).ok()
    }
}

impl From<u8> for ColorCode {
    fn from(raw: u8) -> Self {
        ColorCode::new(raw)
    }
}

impl From<ColorCode> for u8 {
    fn from(code: ColorCode) -> Self {
        code.0
    }
}

impl From<Color> for ColorCode {
    fn from(color: Color) -> Self {
        ColorCode(color.code())
    }
}

impl fmt::Display for ColorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.color() {
            Some(color) => write!(f, "{color}"),
            None => write!(f, "code {}", self.0),
        }
    }
}

/// Desired or reported indicator setting: a color plus the blink flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IndicatorSetting {
    pub color: ColorCode,
    pub blink: bool,
}

impl IndicatorSetting {
    #[must_use]
    pub fn new(color: impl Into<ColorCode>, blink: bool) -> Self {
        Self {
            color: color.into(),
            blink,
        }
    }

    /// Indicator dark and steady.
    #[must_use]
    pub fn off() -> Self {
        Self::default()
    }

    /// Pack into the 4-bit data nibble: bit 3 blink, bits 2-0 color.
    #[must_use]
    pub fn to_data(&self) -> u8 {
        (u8::from(self.blink) << BLINK_SHIFT) | self.color.as_u8()
    }

    /// Unpack from a data nibble. Bits above the nibble are ignored.
    #[must_use]
    pub fn from_data(data: u8) -> Self {
        let data = data & DATA_MASK;
        Self {
            color: ColorCode::new(data),
            blink: data & BLINK_BIT != 0,
        }
    }
}

impl fmt::Display for IndicatorSetting {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.blink {
            write!(f, "{} blink", self.color)
        } else {
            write!(f, "{}", self.color)
        }
    }
}

/// Parses the textual commands fed to the host by its command source.
///
/// `"red"`, `"green"`, `"red blink"` and `"green blink"` select a setting;
/// any other text switches the indicator off.
impl std::str::FromStr for IndicatorSetting {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let setting = match s.trim() {
            "red" => IndicatorSetting::new(Color::Red, false),
            "green" => IndicatorSetting::new(Color::Green, false),
            "red blink" => IndicatorSetting::new(Color::Red, true),
            "green blink" => IndicatorSetting::new(Color::Green, true),
            _ => IndicatorSetting::off(),
        };
        Ok(setting)
    }
}

/// Committed lever status as stored on the lever peripheral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeverStatus {
    Closed = 1,
    Open = 2,
    Unknown = 3,
}

impl LeverStatus {
    #[must_use]
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// # Errors
    /// Returns `Error::InvalidLeverStatus` for codes outside 1-3.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            1 => Ok(LeverStatus::Closed),
            2 => Ok(LeverStatus::Open),
            3 => Ok(LeverStatus::Unknown),
            _ => Err(Error::InvalidLeverStatus(code)),
        }
    }
}

impl fmt::Display for LeverStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LeverStatus::Closed => write!(f, "closed"),
            LeverStatus::Open => write!(f, "open"),
            LeverStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Host-side view of a lever status byte.
///
/// Both flags are tracked independently: having the lever open and closed
/// at once makes no physical sense, yet both inputs can be active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LeverPosition {
    pub open: bool,
    pub closed: bool,
}

/// Coarse description of a [`LeverPosition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeverDescription {
    Open,
    Closed,
    Neutral,
}

impl fmt::Display for LeverDescription {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LeverDescription::Open => write!(f, "open"),
            LeverDescription::Closed => write!(f, "closed"),
            LeverDescription::Neutral => write!(f, "neutral"),
        }
    }
}

impl LeverPosition {
    /// Decode a status byte: bit 1 is "open", bit 0 is "closed".
    #[must_use]
    pub fn from_status(status: u8) -> Self {
        Self {
            open: status & 0x02 != 0,
            closed: status & 0x01 != 0,
        }
    }

    #[must_use]
    pub fn describe(&self) -> LeverDescription {
        match (self.open, self.closed) {
            (true, false) => LeverDescription::Open,
            (false, true) => LeverDescription::Closed,
            _ => LeverDescription::Neutral,
        }
    }
}

impl From<LeverStatus> for LeverPosition {
    fn from(status: LeverStatus) -> Self {
        LeverPosition::from_status(status.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0x00)]
    #[case(0x20)]
    #[case(0x7F)]
    fn test_bus_address_valid(#[case] raw: u8) {
        let address = BusAddress::new(raw).unwrap();
        assert_eq!(address.as_u8(), raw);
    }

    #[rstest]
    #[case(0x80)]
    #[case(0xFF)]
    fn test_bus_address_invalid(#[case] raw: u8) {
        assert!(matches!(
            BusAddress::new(raw),
            Err(Error::InvalidAddress(r)) if r == raw
        ));
    }

    #[test]
    fn test_bus_address_display() {
        assert_eq!(BusAddress::INDICATOR.to_string(), "0x20");
        assert_eq!(Peripheral::Lever.address().to_string(), "0x24");
    }

    #[test]
    fn test_color_code_masks_to_three_bits() {
        assert_eq!(ColorCode::new(0x0A).as_u8(), 0x02);
        assert_eq!(ColorCode::new(0x02).color(), Some(Color::Green));
        assert_eq!(ColorCode::new(0x05).color(), None);
        assert!(Color::from_code(3).is_err());
    }

    #[rstest]
    #[case(IndicatorSetting::new(Color::Red, true), 0x09)]
    #[case(IndicatorSetting::new(Color::Green, false), 0x02)]
    #[case(IndicatorSetting::off(), 0x00)]
    fn test_indicator_setting_data(#[case] setting: IndicatorSetting, #[case] data: u8) {
        assert_eq!(setting.to_data(), data);
        assert_eq!(IndicatorSetting::from_data(data), setting);
    }

    #[rstest]
    #[case("red", Color::Red, false)]
    #[case("green", Color::Green, false)]
    #[case("red blink", Color::Red, true)]
    #[case("green blink", Color::Green, true)]
    #[case("", Color::None, false)]
    #[case("purple", Color::None, false)]
    fn test_indicator_setting_from_str(
        #[case] input: &str,
        #[case] color: Color,
        #[case] blink: bool,
    ) {
        let setting: IndicatorSetting = input.parse().unwrap();
        assert_eq!(setting, IndicatorSetting::new(color, blink));
    }

    #[test]
    fn test_indicator_setting_display() {
        assert_eq!(IndicatorSetting::new(Color::Red, true).to_string(), "red blink");
        assert_eq!(IndicatorSetting::new(ColorCode::new(6), false).to_string(), "code 6");
    }

    #[test]
    fn test_indicator_setting_deserialize_masks_color() {
        let setting: IndicatorSetting =
            serde_json::from_str(r#"{"color":200,"blink":false}"#).unwrap();
        assert_eq!(setting.color, ColorCode::new(200));
        assert_eq!(setting.color.as_u8(), 0x00);
        assert!(setting.to_data() <= DATA_MASK);

        let setting: IndicatorSetting =
            serde_json::from_str(r#"{"color":14,"blink":true}"#).unwrap();
        assert_eq!(setting.to_data(), 0x0E);
        assert_eq!(serde_json::to_string(&setting).unwrap(), r#"{"color":6,"blink":true}"#);
    }

    #[rstest]
    #[case(1, LeverStatus::Closed)]
    #[case(2, LeverStatus::Open)]
    #[case(3, LeverStatus::Unknown)]
    fn test_lever_status_codes(#[case] code: u8, #[case] status: LeverStatus) {
        assert_eq!(LeverStatus::from_code(code).unwrap(), status);
        assert_eq!(status.code(), code);
    }

    #[rstest]
    #[case(0)]
    #[case(4)]
    #[case(15)]
    fn test_lever_status_invalid(#[case] code: u8) {
        assert!(matches!(
            LeverStatus::from_code(code),
            Err(Error::InvalidLeverStatus(c)) if c == code
        ));
    }

    #[rstest]
    #[case(LeverStatus::Open, LeverDescription::Open)]
    #[case(LeverStatus::Closed, LeverDescription::Closed)]
    #[case(LeverStatus::Unknown, LeverDescription::Neutral)]
    fn test_lever_position_describe(
        #[case] status: LeverStatus,
        #[case] expected: LeverDescription,
    ) {
        assert_eq!(LeverPosition::from(status).describe(), expected);
    }

    #[test]
    fn test_lever_position_neither_asserted_is_neutral() {
        let position = LeverPosition::from_status(0);
        assert!(!position.open && !position.closed);
        assert_eq!(position.describe(), LeverDescription::Neutral);
    }
}
