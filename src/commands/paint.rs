//! One-shot frame updates for scripting
//!
//! These do not read the current frame back from the device: `paint` pushes
//! the target row with every other cell off.

use genie_matrix::{push_all, push_row, GridModel, MatrixPos};
use genie_transport::{MonitorSink, RgbColor};
use tracing::info;

use super::{open_device, CommandResult};
use crate::cli::DeviceArgs;

/// Paint one cell and push its row
pub async fn paint(args: &DeviceArgs, row: usize, col: usize, color: RgbColor) -> CommandResult {
    let device = open_device(args, MonitorSink::Stderr).await?;
    let dims = device.matrix_dimensions().await?;

    let mut grid = GridModel::new(dims);
    let pos = MatrixPos::new(row, col);
    grid.paint(pos, color)?;
    push_row(device.as_ref(), &grid, row).await?;

    info!("Painted {} with {}", pos, color);
    println!("{pos} = {color}");
    Ok(())
}

/// Turn every cell off
pub async fn clear(args: &DeviceArgs) -> CommandResult {
    let device = open_device(args, MonitorSink::Stderr).await?;
    let dims = device.matrix_dimensions().await?;

    push_all(device.as_ref(), &GridModel::new(dims)).await?;
    println!("Cleared {dims} matrix");
    Ok(())
}
