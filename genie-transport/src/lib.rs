//! Device collaborator layer for the RazerGenie custom matrix editor
//!
//! The lighting daemon owns the hardware; this crate is the editor's only
//! view of it:
//!
//! - [`Device`] / [`DeviceDiscovery`]: the capability interface
//! - [`dbus`]: the daemon backend on the session bus
//! - [`SimulatedDevice`]: an in-memory device for running without a daemon
//! - [`MonitorDevice`]: call tracing middleware

pub mod device;
pub mod error;
pub mod monitor;
pub mod simulated;
pub mod types;

#[cfg(feature = "dbus")]
pub mod dbus;

pub use device::{Device, DeviceDiscovery};
pub use error::DeviceError;
pub use monitor::{MonitorConfig, MonitorDevice, MonitorSink};
pub use simulated::{DeviceCall, SimulatedDevice, SimulatedDiscovery};
pub use types::{DeviceSummary, DeviceType, MatrixDimensions, RgbColor, UNKNOWN_LAYOUT};

#[cfg(feature = "dbus")]
pub use dbus::{DbusDevice, DbusDiscovery};
