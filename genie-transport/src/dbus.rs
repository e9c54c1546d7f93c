//! D-Bus backend for the openrazer device daemon
//!
//! Bus name: `org.razer`
//! Manager object: `/org/razer` (`razer.devices`)
//! Device objects: `/org/razer/device/<serial>`

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use zbus::{Connection, Proxy};

use crate::device::{Device, DeviceDiscovery};
use crate::error::DeviceError;
use crate::types::{DeviceSummary, DeviceType, MatrixDimensions, RgbColor};

/// Well-known bus name of the daemon
pub const SERVICE: &str = "org.razer";
/// Object path of the device manager
pub const MANAGER_PATH: &str = "/org/razer";

const DEVICES_IFACE: &str = "razer.devices";
const MISC_IFACE: &str = "razer.device.misc";
const CHROMA_IFACE: &str = "razer.device.lighting.chroma";

/// Object path for a device serial
pub fn device_path(serial: &str) -> String {
    format!("{MANAGER_PATH}/device/{serial}")
}

/// Encode a `setKeyRow` payload: `[row, col_start, col_end, r, g, b, ...]`
pub fn encode_key_row(
    row: usize,
    col_start: usize,
    col_end: usize,
    colors: &[RgbColor],
) -> Result<Vec<u8>, DeviceError> {
    let byte = |what: &str, v: usize| {
        u8::try_from(v)
            .map_err(|_| DeviceError::InvalidParameter(format!("{what} {v} does not fit a byte")))
    };

    if col_end < col_start {
        return Err(DeviceError::InvalidParameter(format!(
            "column span {col_start}..={col_end} is empty"
        )));
    }
    let span = col_end - col_start + 1;
    if colors.len() != span {
        return Err(DeviceError::InvalidParameter(format!(
            "{} colors for a span of {span} columns",
            colors.len()
        )));
    }

    let mut payload = Vec::with_capacity(3 + colors.len() * 3);
    payload.push(byte("row", row)?);
    payload.push(byte("start column", col_start)?);
    payload.push(byte("end column", col_end)?);
    for c in colors {
        payload.extend_from_slice(&[c.r, c.g, c.b]);
    }
    Ok(payload)
}

/// A daemon-managed device reached over the session bus
pub struct DbusDevice {
    serial: String,
    misc: Proxy<'static>,
    chroma: Proxy<'static>,
}

impl DbusDevice {
    /// Bind proxies for the device with the given serial
    pub async fn open(conn: &Connection, serial: &str) -> Result<Self, DeviceError> {
        let path = device_path(serial);
        let misc = Proxy::new_owned(conn.clone(), SERVICE, path.clone(), MISC_IFACE).await?;
        let chroma = Proxy::new_owned(conn.clone(), SERVICE, path, CHROMA_IFACE).await?;
        debug!("Bound D-Bus proxies for {}", serial);
        Ok(Self {
            serial: serial.to_string(),
            misc,
            chroma,
        })
    }
}

#[async_trait]
impl Device for DbusDevice {
    fn serial(&self) -> &str {
        &self.serial
    }

    async fn name(&self) -> Result<String, DeviceError> {
        Ok(self.misc.call("getDeviceName", &()).await?)
    }

    async fn device_type(&self) -> Result<DeviceType, DeviceError> {
        let kind: String = self.misc.call("getDeviceType", &()).await?;
        Ok(DeviceType::from(kind.as_str()))
    }

    async fn matrix_dimensions(&self) -> Result<MatrixDimensions, DeviceError> {
        let dims: Vec<i32> = self.misc.call("getMatrixDimensions", &()).await?;
        match dims.as_slice() {
            [rows, cols] if *rows >= 0 && *cols >= 0 => {
                Ok(MatrixDimensions::new(*rows as usize, *cols as usize))
            }
            other => Err(DeviceError::UnexpectedResponse(format!(
                "matrix dimensions {other:?}"
            ))),
        }
    }

    async fn keyboard_layout(&self) -> Result<String, DeviceError> {
        Ok(self.misc.call("getKeyboardLayout", &()).await?)
    }

    async fn define_custom_frame(
        &self,
        row: usize,
        col_start: usize,
        col_end: usize,
        colors: &[RgbColor],
    ) -> Result<(), DeviceError> {
        let payload = encode_key_row(row, col_start, col_end, colors)?;
        self.chroma
            .call_method("setKeyRow", &(payload,))
            .await
            .map_err(|e| DeviceError::rejected("setKeyRow", DeviceError::from(e).to_string()))?;
        Ok(())
    }

    async fn display_custom_frame(&self) -> Result<(), DeviceError> {
        self.chroma
            .call_method("setCustom", &())
            .await
            .map_err(|e| DeviceError::rejected("setCustom", DeviceError::from(e).to_string()))?;
        Ok(())
    }
}

/// Device discovery through the daemon's manager object
pub struct DbusDiscovery {
    conn: Connection,
    manager: Proxy<'static>,
}

impl DbusDiscovery {
    /// Connect to the session bus
    pub async fn session() -> Result<Self, DeviceError> {
        let conn = Connection::session()
            .await
            .map_err(|e| DeviceError::DaemonUnavailable(e.to_string()))?;
        Self::with_connection(conn).await
    }

    /// Use an existing bus connection
    pub async fn with_connection(conn: Connection) -> Result<Self, DeviceError> {
        let manager = Proxy::new_owned(conn.clone(), SERVICE, MANAGER_PATH, DEVICES_IFACE).await?;
        Ok(Self { conn, manager })
    }
}

#[async_trait]
impl DeviceDiscovery for DbusDiscovery {
    async fn list_devices(&self) -> Result<Vec<DeviceSummary>, DeviceError> {
        let serials: Vec<String> = self.manager.call("getDevices", &()).await?;
        let mut devices = Vec::with_capacity(serials.len());
        for serial in serials {
            let device = DbusDevice::open(&self.conn, &serial).await?;
            let name = match device.name().await {
                Ok(name) => name,
                Err(e) => {
                    warn!("{}: name query failed: {}", serial, e);
                    serial.clone()
                }
            };
            let device_type = device
                .device_type()
                .await
                .unwrap_or_else(|_| DeviceType::Other("unknown".into()));
            devices.push(DeviceSummary {
                serial,
                name,
                device_type,
            });
        }
        Ok(devices)
    }

    async fn open_device(&self, serial: &str) -> Result<Arc<dyn Device>, DeviceError> {
        let serials: Vec<String> = self.manager.call("getDevices", &()).await?;
        if !serials.iter().any(|s| s == serial) {
            return Err(DeviceError::DeviceNotFound(serial.to_string()));
        }
        Ok(Arc::new(DbusDevice::open(&self.conn, serial).await?))
    }
}
