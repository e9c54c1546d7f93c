//! `--simulate` device descriptions
//!
//! Format: `ROWSxCOLS[:TYPE[:LAYOUT]]`, e.g. `6x22`, `1x15:mousepad` or
//! `6x22:keyboard:German`. The type defaults to `keyboard` and the layout to
//! `unknown`.

use std::str::FromStr;

use genie_transport::{DeviceType, MatrixDimensions, SimulatedDevice, UNKNOWN_LAYOUT};

/// Parameters for a simulated device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedProfile {
    pub dimensions: MatrixDimensions,
    pub device_type: DeviceType,
    pub layout: String,
}

impl SimulatedProfile {
    pub fn build(&self) -> SimulatedDevice {
        SimulatedDevice::new(self.device_type.clone(), self.dimensions)
            .with_layout(self.layout.clone())
    }
}

impl FromStr for SimulatedProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let dimensions: MatrixDimensions = parts.next().unwrap_or_default().parse()?;
        if dimensions.is_empty() {
            return Err(format!("'{s}' has no matrix cells"));
        }
        let device_type = match parts.next() {
            Some(t) if !t.is_empty() => DeviceType::from(t.to_lowercase().as_str()),
            _ => DeviceType::Keyboard,
        };
        let layout = match parts.next() {
            Some(l) if !l.is_empty() => l.to_string(),
            _ => UNKNOWN_LAYOUT.to_string(),
        };
        Ok(Self {
            dimensions,
            device_type,
            layout,
        })
    }
}
