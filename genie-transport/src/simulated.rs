//! In-memory device for running the editor without a daemon
//!
//! Keeps a defined frame buffer and a displayed frame, records every call and
//! can be told to fail either half of a frame update.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::trace;

use crate::device::{Device, DeviceDiscovery};
use crate::error::DeviceError;
use crate::types::{DeviceSummary, DeviceType, MatrixDimensions, RgbColor, UNKNOWN_LAYOUT};

/// One recorded collaborator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    Define {
        row: usize,
        col_start: usize,
        col_end: usize,
        colors: Vec<RgbColor>,
    },
    Display,
}

#[derive(Debug)]
struct SimState {
    defined: Vec<RgbColor>,
    displayed: Vec<RgbColor>,
    calls: Vec<DeviceCall>,
    fail_define: bool,
    fail_display: bool,
}

/// Simulated lighting device
pub struct SimulatedDevice {
    serial: String,
    name: String,
    device_type: DeviceType,
    dims: MatrixDimensions,
    layout: String,
    state: Mutex<SimState>,
}

impl SimulatedDevice {
    /// Create a simulated device with the given type and matrix size
    pub fn new(device_type: DeviceType, dims: MatrixDimensions) -> Self {
        Self {
            serial: "SIM0000000000".to_string(),
            name: format!("Simulated {device_type}"),
            device_type,
            dims,
            layout: UNKNOWN_LAYOUT.to_string(),
            state: Mutex::new(SimState {
                defined: vec![RgbColor::OFF; dims.len()],
                displayed: vec![RgbColor::OFF; dims.len()],
                calls: Vec::new(),
                fail_define: false,
                fail_display: false,
            }),
        }
    }

    /// Set the reported physical keyboard layout
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Set the serial
    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = serial.into();
        self
    }

    /// Make subsequent row definitions fail
    pub fn fail_define(&self, fail: bool) {
        self.state.lock().fail_define = fail;
    }

    /// Make subsequent display commits fail
    pub fn fail_display(&self, fail: bool) {
        self.state.lock().fail_display = fail;
    }

    /// All calls received so far
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.state.lock().calls.clone()
    }

    /// Forget the recorded calls
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Color currently buffered for a cell
    pub fn defined(&self, row: usize, col: usize) -> Option<RgbColor> {
        self.dims
            .contains(row, col)
            .then(|| self.state.lock().defined[row * self.dims.cols + col])
    }

    /// Color currently shown on a cell
    pub fn displayed(&self, row: usize, col: usize) -> Option<RgbColor> {
        self.dims
            .contains(row, col)
            .then(|| self.state.lock().displayed[row * self.dims.cols + col])
    }
}

#[async_trait]
impl Device for SimulatedDevice {
    fn serial(&self) -> &str {
        &self.serial
    }

    async fn name(&self) -> Result<String, DeviceError> {
        Ok(self.name.clone())
    }

    async fn device_type(&self) -> Result<DeviceType, DeviceError> {
        Ok(self.device_type.clone())
    }

    async fn matrix_dimensions(&self) -> Result<MatrixDimensions, DeviceError> {
        Ok(self.dims)
    }

    async fn keyboard_layout(&self) -> Result<String, DeviceError> {
        Ok(self.layout.clone())
    }

    async fn define_custom_frame(
        &self,
        row: usize,
        col_start: usize,
        col_end: usize,
        colors: &[RgbColor],
    ) -> Result<(), DeviceError> {
        let mut state = self.state.lock();
        state.calls.push(DeviceCall::Define {
            row,
            col_start,
            col_end,
            colors: colors.to_vec(),
        });
        trace!("sim define row {} cols {}..={}", row, col_start, col_end);

        if state.fail_define {
            return Err(DeviceError::rejected("define_custom_frame", "injected failure"));
        }
        if row >= self.dims.rows
            || col_end >= self.dims.cols
            || col_end < col_start
            || colors.len() != col_end - col_start + 1
        {
            return Err(DeviceError::InvalidParameter(format!(
                "row {row} cols {col_start}..={col_end} with {} colors on a {} matrix",
                colors.len(),
                self.dims
            )));
        }

        let base = row * self.dims.cols;
        state.defined[base + col_start..=base + col_end].copy_from_slice(colors);
        Ok(())
    }

    async fn display_custom_frame(&self) -> Result<(), DeviceError> {
        let mut state = self.state.lock();
        state.calls.push(DeviceCall::Display);
        if state.fail_display {
            return Err(DeviceError::rejected("display_custom_frame", "injected failure"));
        }
        state.displayed = state.defined.clone();
        Ok(())
    }
}

/// Discovery that hands out a fixed set of simulated devices
#[derive(Default)]
pub struct SimulatedDiscovery {
    devices: Vec<Arc<SimulatedDevice>>,
}

impl SimulatedDiscovery {
    pub fn new(devices: Vec<Arc<SimulatedDevice>>) -> Self {
        Self { devices }
    }
}

#[async_trait]
impl DeviceDiscovery for SimulatedDiscovery {
    async fn list_devices(&self) -> Result<Vec<DeviceSummary>, DeviceError> {
        Ok(self
            .devices
            .iter()
            .map(|d| DeviceSummary {
                serial: d.serial.clone(),
                name: d.name.clone(),
                device_type: d.device_type.clone(),
            })
            .collect())
    }

    async fn open_device(&self, serial: &str) -> Result<Arc<dyn Device>, DeviceError> {
        self.devices
            .iter()
            .find(|d| d.serial == serial)
            .map(|d| Arc::clone(d) as Arc<dyn Device>)
            .ok_or_else(|| DeviceError::DeviceNotFound(serial.to_string()))
    }
}
