//! Device collaborator traits
//!
//! The daemon owns the hardware. Everything the editor needs from it goes
//! through [`Device`]: a handful of capability queries plus the two calls that
//! make up a custom frame update (define a row, then display the frame).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DeviceError;
use crate::types::{DeviceSummary, DeviceType, MatrixDimensions, RgbColor};

/// A lighting device with an addressable custom matrix
///
/// This trait is object-safe for dynamic dispatch (`Arc<dyn Device>`).
#[async_trait]
pub trait Device: Send + Sync {
    /// Daemon serial identifying this device
    fn serial(&self) -> &str;

    /// Human readable device name
    async fn name(&self) -> Result<String, DeviceError>;

    /// Device category (keyboard, mousepad, ...)
    async fn device_type(&self) -> Result<DeviceType, DeviceError>;

    /// Addressable matrix size
    async fn matrix_dimensions(&self) -> Result<MatrixDimensions, DeviceError>;

    /// Physical keyboard layout identifier, `"unknown"` if the daemon has none
    async fn keyboard_layout(&self) -> Result<String, DeviceError>;

    /// Buffer colors for one row of the custom frame
    ///
    /// `colors` covers columns `col_start..=col_end`.
    async fn define_custom_frame(
        &self,
        row: usize,
        col_start: usize,
        col_end: usize,
        colors: &[RgbColor],
    ) -> Result<(), DeviceError>;

    /// Show the currently buffered custom frame
    async fn display_custom_frame(&self) -> Result<(), DeviceError>;
}

/// Device enumeration abstraction
#[async_trait]
pub trait DeviceDiscovery: Send + Sync {
    /// List currently available devices
    async fn list_devices(&self) -> Result<Vec<DeviceSummary>, DeviceError>;

    /// Open a device by serial
    async fn open_device(&self, serial: &str) -> Result<Arc<dyn Device>, DeviceError>;

    /// Open the first device that exposes a custom matrix
    async fn open_first(&self) -> Result<Arc<dyn Device>, DeviceError> {
        let devices = self.list_devices().await?;
        for summary in &devices {
            let device = self.open_device(&summary.serial).await?;
            match device.matrix_dimensions().await {
                Ok(dims) if !dims.is_empty() => return Ok(device),
                Ok(_) => tracing::debug!("{} has no custom matrix", summary.serial),
                Err(e) => tracing::debug!("{}: matrix query failed: {}", summary.serial, e),
            }
        }
        Err(DeviceError::DeviceNotFound(
            "no device with a custom matrix".into(),
        ))
    }
}
