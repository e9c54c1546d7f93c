//! Row synchronization: pushing grid rows to the device
//!
//! A push is two calls: define the row's colors for columns `0..=cols-1`,
//! then display the buffered frame. Display is global, so a definition that
//! is not followed by a successful display stays buffered on the device and
//! shows up with the next successful display. There is no rollback.

use genie_transport::{Device, RgbColor};
use tracing::{debug, warn};

use crate::error::{MatrixError, SyncError};
use crate::grid::GridModel;

async fn define_row(
    device: &dyn Device,
    row: usize,
    colors: &[RgbColor],
) -> Result<(), SyncError> {
    if colors.is_empty() {
        return Err(MatrixError::NoColumns.into());
    }
    device
        .define_custom_frame(row, 0, colors.len() - 1, colors)
        .await
        .map_err(|source| SyncError::Define { row, source })
}

async fn display(device: &dyn Device) -> Result<(), SyncError> {
    device
        .display_custom_frame()
        .await
        .map_err(|source| SyncError::Display { source })
}

/// Send one row of the grid and display it
///
/// Display is skipped when the definition fails.
pub async fn push_row(device: &dyn Device, grid: &GridModel, row: usize) -> Result<(), SyncError> {
    let colors = grid.row_snapshot(row)?;
    define_row(device, row, colors).await?;
    display(device).await?;
    debug!("Pushed row {}", row);
    Ok(())
}

/// Send every row of the grid, then display once
///
/// All rows are attempted even if some fail; the first failure is returned.
pub async fn push_all(device: &dyn Device, grid: &GridModel) -> Result<(), SyncError> {
    let mut first_err = None;

    for row in 0..grid.dimensions().rows {
        let colors = grid.row_snapshot(row)?;
        if let Err(e) = define_row(device, row, colors).await {
            warn!("{}", e);
            first_err.get_or_insert(e);
        }
    }

    if let Err(e) = display(device).await {
        warn!("{}", e);
        first_err.get_or_insert(e);
    }

    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
