//! The custom matrix editor
//!
//! Owns the grid model, the paint/erase mode and the paint color, plus the
//! buttons built from the selected layout. A host UI renders
//! [`CustomEditor::layout`], maps its own widgets to [`ButtonId`]s via
//! [`CustomEditor::buttons`], forwards clicks to
//! [`CustomEditor::on_cell_activated`] and shows whatever
//! [`CustomEditor::drain_notices`] returns.

use std::sync::Arc;

use genie_transport::{Device, DeviceError, DeviceType, MatrixDimensions, RgbColor, UNKNOWN_LAYOUT};
use tracing::{debug, info, warn};

use crate::error::{MatrixError, SyncError};
use crate::grid::GridModel;
use crate::layout::{Layout, LayoutCell, MatrixPos};
use crate::loader::LayoutLoader;
use crate::notice::{Notice, Notices};
use crate::select::{select_layout, LayoutOrigin, LayoutRequest};
use crate::sync::{push_all, push_row};

/// What a click on a matrix cell does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawStatus {
    /// Paint with the selected color
    #[default]
    Set,
    /// Turn the cell off
    Clear,
}

/// Opaque handle for an interactive cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ButtonId(usize);

impl ButtonId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// An enabled key bound to a matrix position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixButton {
    pub id: ButtonId,
    pub pos: MatrixPos,
    pub label: String,
    /// Row and column of the key inside [`Layout::rows`]
    pub slot: (usize, usize),
}

/// Build the button list for a layout
///
/// Disabled keys, keys without a matrix position and keys outside the device
/// matrix get no button.
pub fn build_buttons(layout: &Layout, dims: MatrixDimensions) -> Vec<MatrixButton> {
    let mut buttons = Vec::new();
    for (r, row) in layout.rows().iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let LayoutCell::Key(key) = cell else {
                continue;
            };
            let Some(pos) = key.matrix else {
                continue;
            };
            if !key.enabled {
                continue;
            }
            if !dims.contains(pos.row, pos.col) {
                warn!(
                    "Key \"{}\" maps to {} outside the {} matrix, ignoring",
                    key.label, pos, dims
                );
                continue;
            }
            buttons.push(MatrixButton {
                id: ButtonId(buttons.len()),
                pos,
                label: key.label.clone(),
                slot: (r, c),
            });
        }
    }
    buttons
}

/// Editor construction options
#[derive(Debug, Clone)]
pub struct EditorOptions {
    /// One key per matrix cell, ignoring the device type
    pub matrix_discovery: bool,
    /// Initial paint color
    pub initial_color: RgbColor,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            matrix_discovery: false,
            initial_color: RgbColor::GREEN,
        }
    }
}

/// Custom matrix editor bound to one device
pub struct CustomEditor {
    device: Arc<dyn Device>,
    device_name: String,
    grid: GridModel,
    layout: Layout,
    origin: LayoutOrigin,
    buttons: Vec<MatrixButton>,
    /// Visual state per button, `None` is the "off" look
    button_colors: Vec<Option<RgbColor>>,
    selected_color: RgbColor,
    draw_status: DrawStatus,
    notices: Notices,
}

impl CustomEditor {
    /// Query the device, pick a layout and blank the matrix
    pub async fn open(
        device: Arc<dyn Device>,
        loader: &LayoutLoader,
        options: EditorOptions,
    ) -> Result<Self, DeviceError> {
        let dims = device.matrix_dimensions().await?;
        let device_type = device.device_type().await?;
        let device_name = match device.name().await {
            Ok(name) => name,
            Err(e) => {
                debug!("name query failed: {}", e);
                device.serial().to_string()
            }
        };

        let physical_layout = if device_type == DeviceType::Keyboard && !options.matrix_discovery {
            match device.keyboard_layout().await {
                Ok(layout) => layout,
                Err(e) => {
                    warn!("{}: keyboard layout query failed: {}", device_name, e);
                    UNKNOWN_LAYOUT.to_string()
                }
            }
        } else {
            UNKNOWN_LAYOUT.to_string()
        };

        let request = LayoutRequest {
            device_type,
            dimensions: dims,
            physical_layout,
            matrix_discovery: options.matrix_discovery,
        };

        let mut notices = Notices::new();
        let selection = select_layout(loader, &request, &mut notices);
        info!(
            "Custom editor for {} ({} {}), layout: {}",
            device_name, request.device_type, dims, selection.origin
        );

        let buttons = build_buttons(&selection.layout, dims);
        let mut editor = Self {
            device,
            device_name,
            grid: GridModel::new(dims),
            layout: selection.layout,
            origin: selection.origin,
            button_colors: vec![None; buttons.len()],
            buttons,
            selected_color: options.initial_color,
            draw_status: DrawStatus::Set,
            notices,
        };

        // start from a blank matrix
        let _ = editor.clear_all().await;
        Ok(editor)
    }

    /// Handle a click on a button
    ///
    /// The model and the button look are updated before the push and are not
    /// rolled back if the push fails. Every button sharing the position (an
    /// ISO Enter spans two cells) takes the new look.
    pub async fn on_cell_activated(&mut self, id: ButtonId) -> Result<(), SyncError> {
        let pos = self
            .buttons
            .get(id.0)
            .map(|b| b.pos)
            .ok_or(MatrixError::UnknownButton(id.0))?;

        let look = match self.draw_status {
            DrawStatus::Set => {
                self.grid.paint(pos, self.selected_color)?;
                Some(self.selected_color)
            }
            DrawStatus::Clear => {
                debug!("Clearing {}", pos);
                self.grid.erase(pos)?;
                None
            }
        };
        for (button, color) in self.buttons.iter().zip(self.button_colors.iter_mut()) {
            if button.pos == pos {
                *color = look;
            }
        }

        let result = push_row(self.device.as_ref(), &self.grid, pos.row).await;
        if let Err(e) = &result {
            warn!("Row push failed: {}", e);
            self.notices
                .error(format!("Failed to update row {} on the device: {e}", pos.row));
        }
        result
    }

    /// Turn everything off, on the device and in the editor
    pub async fn clear_all(&mut self) -> Result<(), SyncError> {
        self.grid.clear();
        let result = push_all(self.device.as_ref(), &self.grid).await;
        self.button_colors.fill(None);

        if let Err(e) = &result {
            self.notices
                .error(format!("Failed to clear the device matrix: {e}"));
        }
        result
    }

    /// Switch between painting and erasing
    pub fn set_draw_status(&mut self, status: DrawStatus) {
        self.draw_status = status;
    }

    pub fn draw_status(&self) -> DrawStatus {
        self.draw_status
    }

    /// Result of the color picker; `None` (cancelled) keeps the current color
    pub fn choose_color(&mut self, picked: Option<RgbColor>) {
        match picked {
            Some(color) => self.selected_color = color,
            None => debug!("User cancelled the color picker"),
        }
    }

    pub fn selected_color(&self) -> RgbColor {
        self.selected_color
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn dimensions(&self) -> MatrixDimensions {
        self.grid.dimensions()
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn origin(&self) -> &LayoutOrigin {
        &self.origin
    }

    pub fn buttons(&self) -> &[MatrixButton] {
        &self.buttons
    }

    pub fn button(&self, id: ButtonId) -> Option<&MatrixButton> {
        self.buttons.get(id.0)
    }

    /// First button bound to a matrix position
    pub fn button_at(&self, pos: MatrixPos) -> Option<ButtonId> {
        self.buttons.iter().find(|b| b.pos == pos).map(|b| b.id)
    }

    /// Button bound to a layout slot (row, column in [`Layout::rows`])
    pub fn button_in_slot(&self, slot: (usize, usize)) -> Option<ButtonId> {
        self.buttons.iter().find(|b| b.slot == slot).map(|b| b.id)
    }

    /// Current look of a button, `None` when off
    pub fn button_color(&self, id: ButtonId) -> Option<RgbColor> {
        self.button_colors.get(id.0).copied().flatten()
    }

    /// Take pending user notices
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{KeyCell, KeyRows};
    use crate::loader::BundledSource;
    use genie_transport::{DeviceCall, SimulatedDevice};

    fn key(label: &str, pos: Option<[usize; 2]>, disabled: bool) -> KeyCell {
        KeyCell {
            label: Some(label.into()),
            width: 60,
            matrix: pos.map(MatrixPos::from),
            disabled,
        }
    }

    #[test]
    fn test_build_buttons_filters() {
        let rows = KeyRows {
            rows: vec![vec![
                key("A", Some([0, 0]), false),
                key("B", Some([0, 1]), true),
                key("C", None, false),
                key("D", Some([9, 9]), false),
                KeyCell {
                    label: None,
                    width: 60,
                    matrix: None,
                    disabled: false,
                },
                key("E", Some([1, 1]), false),
            ]],
        };
        let layout = Layout::from_rows(&rows);
        let buttons = build_buttons(&layout, MatrixDimensions::new(2, 2));

        let labels: Vec<_> = buttons.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["A", "E"]);
        assert_eq!(buttons[1].id.index(), 1);
        assert_eq!(buttons[1].slot, (0, 5));
    }

    async fn open(sim: Arc<SimulatedDevice>) -> CustomEditor {
        let loader = LayoutLoader::empty().with_source(BundledSource);
        CustomEditor::open(sim, &loader, EditorOptions::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_open_blanks_device() {
        let sim = Arc::new(SimulatedDevice::new(
            DeviceType::Mousepad,
            MatrixDimensions::new(1, 15),
        ));
        let editor = open(sim.clone()).await;

        assert_eq!(editor.origin(), &LayoutOrigin::Mousepad);
        assert_eq!(editor.buttons().len(), 15);
        assert_eq!(editor.selected_color(), RgbColor::GREEN);
        assert_eq!(editor.draw_status(), DrawStatus::Set);
        assert_eq!(sim.calls(), vec![
            DeviceCall::Define {
                row: 0,
                col_start: 0,
                col_end: 14,
                colors: vec![RgbColor::OFF; 15],
            },
            DeviceCall::Display,
        ]);
    }

    #[tokio::test]
    async fn test_clear_mode_erases() {
        let sim = Arc::new(SimulatedDevice::new(
            DeviceType::Mousepad,
            MatrixDimensions::new(1, 15),
        ));
        let mut editor = open(sim.clone()).await;
        let id = editor.button_at(MatrixPos::new(0, 4)).unwrap();

        editor.on_cell_activated(id).await.unwrap();
        assert_eq!(editor.button_color(id), Some(RgbColor::GREEN));
        assert_eq!(sim.displayed(0, 4), Some(RgbColor::GREEN));

        editor.set_draw_status(DrawStatus::Clear);
        editor.on_cell_activated(id).await.unwrap();
        assert_eq!(editor.button_color(id), None);
        assert_eq!(editor.grid().get(MatrixPos::new(0, 4)), Some(RgbColor::OFF));
        assert_eq!(sim.displayed(0, 4), Some(RgbColor::OFF));
    }

    #[tokio::test]
    async fn test_cancelled_picker_keeps_color() {
        let sim = Arc::new(SimulatedDevice::new(
            DeviceType::Mousepad,
            MatrixDimensions::new(1, 15),
        ));
        let mut editor = open(sim).await;

        editor.choose_color(Some(RgbColor::BLUE));
        editor.choose_color(None);
        assert_eq!(editor.selected_color(), RgbColor::BLUE);
    }

    #[tokio::test]
    async fn test_unknown_button() {
        let sim = Arc::new(SimulatedDevice::new(
            DeviceType::Mousepad,
            MatrixDimensions::new(1, 15),
        ));
        let mut editor = open(sim).await;
        let err = editor.on_cell_activated(ButtonId(99)).await.unwrap_err();
        assert!(matches!(err, SyncError::Matrix(MatrixError::UnknownButton(99))));
    }

    #[tokio::test]
    async fn test_clear_all_resets_buttons() {
        let sim = Arc::new(SimulatedDevice::new(
            DeviceType::Keyboard,
            MatrixDimensions::new(2, 3),
        ));
        let mut editor = open(sim.clone()).await;
        assert_eq!(editor.origin(), &LayoutOrigin::Fallback);

        for b in editor.buttons().to_vec() {
            editor.on_cell_activated(b.id).await.unwrap();
        }
        assert_eq!(editor.grid().lit_count(), 6);

        editor.clear_all().await.unwrap();
        assert_eq!(editor.grid().lit_count(), 0);
        assert!(editor
            .buttons()
            .iter()
            .all(|b| editor.button_color(b.id).is_none()));
        assert_eq!(sim.displayed(1, 2), Some(RgbColor::OFF));
    }

    #[tokio::test]
    async fn test_failed_clear_all_notifies() {
        let sim = Arc::new(SimulatedDevice::new(
            DeviceType::Keyboard,
            MatrixDimensions::new(2, 3),
        ));
        let mut editor = open(sim.clone()).await;
        editor.drain_notices();

        sim.fail_display(true);
        assert!(editor.clear_all().await.is_err());
        let notices = editor.drain_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].message.contains("clear"));
    }
}
