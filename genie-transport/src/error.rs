//! Device collaborator error types

use thiserror::Error;

/// Errors that can occur while talking to a lighting device
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// No device with this serial is exposed by the daemon
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// The daemon could not be reached on the bus
    #[error("Daemon not reachable: {0}")]
    DaemonUnavailable(String),

    /// The daemon accepted the call but reported failure
    #[error("Device rejected {call}: {reason}")]
    Rejected { call: &'static str, reason: String },

    /// The device does not implement the requested capability
    #[error("Capability not supported: {0}")]
    NotSupported(String),

    /// Argument cannot be encoded for the device
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Reply had an unexpected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Bus-level failure
    #[error("D-Bus error: {0}")]
    Bus(String),
}

impl DeviceError {
    /// Shorthand for a rejected call
    pub fn rejected(call: &'static str, reason: impl Into<String>) -> Self {
        Self::Rejected {
            call,
            reason: reason.into(),
        }
    }
}

#[cfg(feature = "dbus")]
impl From<zbus::Error> for DeviceError {
    fn from(e: zbus::Error) -> Self {
        match e {
            zbus::Error::MethodError(name, detail, _) => {
                let name = name.to_string();
                let detail = detail.unwrap_or_default();
                if name.ends_with("UnknownMethod") || name.ends_with("UnknownInterface") {
                    DeviceError::NotSupported(format!("{name}: {detail}"))
                } else if name.ends_with("ServiceUnknown") || name.ends_with("NameHasNoOwner") {
                    DeviceError::DaemonUnavailable(detail)
                } else {
                    DeviceError::Bus(format!("{name}: {detail}"))
                }
            }
            zbus::Error::InputOutput(io) => DeviceError::DaemonUnavailable(io.to_string()),
            other => DeviceError::Bus(other.to_string()),
        }
    }
}

#[cfg(feature = "dbus")]
impl From<zbus::fdo::Error> for DeviceError {
    fn from(e: zbus::fdo::Error) -> Self {
        match e {
            zbus::fdo::Error::ServiceUnknown(msg) | zbus::fdo::Error::NameHasNoOwner(msg) => {
                DeviceError::DaemonUnavailable(msg)
            }
            zbus::fdo::Error::UnknownMethod(msg) | zbus::fdo::Error::UnknownInterface(msg) => {
                DeviceError::NotSupported(msg)
            }
            other => DeviceError::Bus(other.to_string()),
        }
    }
}
