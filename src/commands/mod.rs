//! Command handlers for the CLI application.
//!
//! - `query`: read-only device commands (list, info)
//! - `layout`: offline layout selection
//! - `paint`: one-shot frame updates (paint, clear)
//! - `edit`: the interactive editor
//! - `settings`: show or create the config file

pub mod edit;
pub mod layout;
pub mod paint;
pub mod query;
pub mod settings;

use std::sync::Arc;

use anyhow::Context;
use genie_transport::{
    Device, DeviceDiscovery, MonitorConfig, MonitorDevice, MonitorSink, SimulatedDiscovery,
};
use tracing::info;

use crate::cli::DeviceArgs;

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// Discovery backend selected by the global flags
pub async fn discovery(args: &DeviceArgs) -> anyhow::Result<Box<dyn DeviceDiscovery>> {
    if let Some(profile) = &args.simulate {
        info!("Simulating a {} {} device", profile.dimensions, profile.device_type);
        return Ok(Box::new(SimulatedDiscovery::new(vec![Arc::new(profile.build())])));
    }
    daemon_discovery().await
}

#[cfg(feature = "dbus")]
async fn daemon_discovery() -> anyhow::Result<Box<dyn DeviceDiscovery>> {
    let discovery = genie_transport::DbusDiscovery::session()
        .await
        .context("Cannot reach the openrazer daemon (is it running?)")?;
    Ok(Box::new(discovery))
}

#[cfg(not(feature = "dbus"))]
async fn daemon_discovery() -> anyhow::Result<Box<dyn DeviceDiscovery>> {
    anyhow::bail!("Built without D-Bus support; use --simulate ROWSxCOLS")
}

/// Open the device selected by the global flags
///
/// With `--monitor` the device is wrapped so every call is reported to `sink`.
/// `--monitor-colors` adds the row colors to each definition line.
pub async fn open_device(args: &DeviceArgs, sink: MonitorSink) -> anyhow::Result<Arc<dyn Device>> {
    let discovery = discovery(args).await?;
    let device = match &args.device {
        Some(serial) => discovery
            .open_device(serial)
            .await
            .with_context(|| format!("Cannot open device {serial}"))?,
        None => discovery
            .open_first()
            .await
            .context("No device with a custom lighting matrix found")?,
    };
    info!("Opened device {}", device.serial());

    if args.monitor {
        Ok(MonitorDevice::wrap(
            device,
            MonitorConfig::default()
                .with_sink(sink)
                .with_colors(args.monitor_colors),
        ))
    } else {
        Ok(device)
    }
}
