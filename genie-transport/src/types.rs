//! Value types shared between the daemon backend and the editor

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// RGB color value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    /// Create a new RGB color
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Whether this is the "off" color
    pub fn is_off(&self) -> bool {
        *self == Self::OFF
    }

    /// Format as `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Black (LED off)
    pub const OFF: Self = Self { r: 0, g: 0, b: 0 };
    /// White
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };
    /// Red
    pub const RED: Self = Self { r: 255, g: 0, b: 0 };
    /// Green
    pub const GREEN: Self = Self { r: 0, g: 255, b: 0 };
    /// Blue
    pub const BLUE: Self = Self { r: 0, g: 0, b: 255 };
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for RgbColor {
    type Err = String;

    /// Accepts `#rrggbb`, `rrggbb`, `#rgb`, `r,g,b` and a few color names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "off" | "black" => return Ok(Self::OFF),
            "white" => return Ok(Self::WHITE),
            "red" => return Ok(Self::RED),
            "green" => return Ok(Self::GREEN),
            "blue" => return Ok(Self::BLUE),
            _ => {}
        }

        if s.contains(',') {
            let parts: Vec<&str> = s.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                return Err(format!("expected r,g,b but got '{s}'"));
            }
            let channel = |p: &str| {
                p.parse::<u8>()
                    .map_err(|e| format!("invalid channel '{p}': {e}"))
            };
            return Ok(Self::new(
                channel(parts[0])?,
                channel(parts[1])?,
                channel(parts[2])?,
            ));
        }

        let hex = s.strip_prefix('#').unwrap_or(s);
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return Err(format!("invalid color '{s}' (expected #rrggbb)")),
        };
        let value = u32::from_str_radix(&expanded, 16)
            .map_err(|e| format!("invalid color '{s}': {e}"))?;
        Ok(Self::new(
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        ))
    }
}

impl Serialize for RgbColor {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RgbColor {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Addressable matrix size of a device (rows x columns)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatrixDimensions {
    pub rows: usize,
    pub cols: usize,
}

impl MatrixDimensions {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// True when the device exposes no addressable cells
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Check whether (row, col) addresses a cell
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }
}

impl fmt::Display for MatrixDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

impl FromStr for MatrixDimensions {
    type Err = String;

    /// Parse `ROWSxCOLS`, e.g. `6x22`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rows, cols) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("invalid dimensions '{s}' (expected ROWSxCOLS)"))?;
        let rows = rows
            .trim()
            .parse()
            .map_err(|e| format!("invalid row count '{rows}': {e}"))?;
        let cols = cols
            .trim()
            .parse()
            .map_err(|e| format!("invalid column count '{cols}': {e}"))?;
        Ok(Self::new(rows, cols))
    }
}

/// Device category as reported by the daemon
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Keyboard,
    Mousepad,
    Mouse,
    Headset,
    Other(String),
}

impl DeviceType {
    /// Daemon string for this type
    pub fn as_str(&self) -> &str {
        match self {
            Self::Keyboard => "keyboard",
            Self::Mousepad => "mousepad",
            Self::Mouse => "mouse",
            Self::Headset => "headset",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for DeviceType {
    fn from(s: &str) -> Self {
        match s {
            "keyboard" => Self::Keyboard,
            // older daemons report "mousemat"
            "mousepad" | "mousemat" => Self::Mousepad,
            "mouse" => Self::Mouse,
            "headset" => Self::Headset,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical layout identifier reported for keyboards the daemon does not know
pub const UNKNOWN_LAYOUT: &str = "unknown";

/// One device as listed by discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSummary {
    pub serial: String,
    pub name: String,
    pub device_type: DeviceType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!("#ff0000".parse::<RgbColor>().unwrap(), RgbColor::RED);
        assert_eq!("00ff00".parse::<RgbColor>().unwrap(), RgbColor::GREEN);
        assert_eq!("#00f".parse::<RgbColor>().unwrap(), RgbColor::BLUE);
        assert_eq!(
            "#1a2B3c".parse::<RgbColor>().unwrap(),
            RgbColor::new(0x1a, 0x2b, 0x3c)
        );
    }

    #[test]
    fn test_parse_triplet_and_names() {
        assert_eq!(
            "10, 20,30".parse::<RgbColor>().unwrap(),
            RgbColor::new(10, 20, 30)
        );
        assert_eq!("Off".parse::<RgbColor>().unwrap(), RgbColor::OFF);
        assert!("1,2".parse::<RgbColor>().is_err());
        assert!("256,0,0".parse::<RgbColor>().is_err());
        assert!("#12345".parse::<RgbColor>().is_err());
        assert!("#gggggg".parse::<RgbColor>().is_err());
    }

    #[test]
    fn test_hex_display() {
        assert_eq!(RgbColor::new(255, 8, 0).to_string(), "#ff0800");
    }

    #[test]
    fn test_dimensions() {
        let dims: MatrixDimensions = "6x22".parse().unwrap();
        assert_eq!(dims, MatrixDimensions::new(6, 22));
        assert_eq!(dims.len(), 132);
        assert!(dims.contains(5, 21));
        assert!(!dims.contains(6, 0));
        assert!(!dims.contains(0, 22));
        assert!("6-22".parse::<MatrixDimensions>().is_err());
    }

    #[test]
    fn test_device_type_strings() {
        assert_eq!(DeviceType::from("keyboard"), DeviceType::Keyboard);
        assert_eq!(DeviceType::from("mousemat"), DeviceType::Mousepad);
        assert_eq!(
            DeviceType::from("core"),
            DeviceType::Other("core".to_string())
        );
        assert_eq!(DeviceType::Mousepad.to_string(), "mousepad");
    }
}
