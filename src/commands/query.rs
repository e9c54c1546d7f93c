//! Query (read-only) command handlers.

use genie_transport::{DeviceType, MonitorSink};

use super::{discovery, open_device, CommandResult};
use crate::cli::DeviceArgs;

/// List devices exposed by the daemon
pub async fn list(args: &DeviceArgs) -> CommandResult {
    let discovery = discovery(args).await?;
    let devices = discovery.list_devices().await?;
    if devices.is_empty() {
        println!("No devices found");
        return Ok(());
    }

    println!("{} device(s):", devices.len());
    for device in devices {
        println!(
            "  {:<16} {:<10} {}",
            device.serial, device.device_type, device.name
        );
    }
    Ok(())
}

/// Show device name, type, matrix size and keyboard layout
pub async fn info(args: &DeviceArgs) -> CommandResult {
    let device = open_device(args, MonitorSink::Stderr).await?;

    let name = device.name().await?;
    let device_type = device.device_type().await?;
    println!("Device:  {name}");
    println!("Serial:  {}", device.serial());
    println!("Type:    {device_type}");

    match device.matrix_dimensions().await {
        Ok(dims) => println!("Matrix:  {dims} ({} cells)", dims.len()),
        Err(e) => println!("Matrix:  unavailable ({e})"),
    }
    if device_type == DeviceType::Keyboard {
        match device.keyboard_layout().await {
            Ok(layout) => println!("Layout:  {layout}"),
            Err(e) => println!("Layout:  unavailable ({e})"),
        }
    }
    Ok(())
}
