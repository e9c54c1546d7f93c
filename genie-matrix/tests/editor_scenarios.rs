//! End-to-end editor scenarios against a simulated device.
//!
//! These go through the public API only: open an editor on a
//! `SimulatedDevice`, click cells and inspect both the model and the calls
//! the device saw.

use std::sync::Arc;

use genie_matrix::{
    BundledSource, CustomEditor, DrawStatus, EditorOptions, LayoutCell, LayoutLoader,
    LayoutOrigin, MatrixPos, NoticeLevel, SyncError,
};
use genie_transport::{DeviceCall, DeviceType, MatrixDimensions, RgbColor, SimulatedDevice};

fn loader() -> LayoutLoader {
    LayoutLoader::empty().with_source(BundledSource)
}

fn keyboard(layout: &str) -> Arc<SimulatedDevice> {
    Arc::new(
        SimulatedDevice::new(DeviceType::Keyboard, MatrixDimensions::new(6, 22))
            .with_layout(layout),
    )
}

async fn open(device: Arc<SimulatedDevice>, discovery: bool) -> CustomEditor {
    let options = EditorOptions {
        matrix_discovery: discovery,
        ..EditorOptions::default()
    };
    CustomEditor::open(device, &loader(), options).await.unwrap()
}

// ── Layout selection ──

#[tokio::test]
async fn german_keyboard_gets_exact_variant() {
    let mut editor = open(keyboard("German"), false).await;

    assert_eq!(
        editor.origin(),
        &LayoutOrigin::Keyboard {
            file: "razerdefault22",
            variant: "German".into(),
            exact: true,
        }
    );
    assert!(editor.drain_notices().is_empty());
    assert!(editor.buttons().iter().any(|b| b.label == "Ä"));
}

#[tokio::test]
async fn unknown_physical_layout_falls_back_to_us() {
    let mut editor = open(keyboard("Klingon"), false).await;

    assert_eq!(
        editor.origin(),
        &LayoutOrigin::Keyboard {
            file: "razerdefault22",
            variant: "US".into(),
            exact: false,
        }
    );
    let notices = editor.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);
    assert!(notices[0].message.contains("Klingon"));
}

#[tokio::test]
async fn mousepad_gets_numbered_strip() {
    let pad = Arc::new(SimulatedDevice::new(
        DeviceType::Mousepad,
        MatrixDimensions::new(1, 15),
    ));
    let editor = open(pad, false).await;

    assert_eq!(editor.origin(), &LayoutOrigin::Mousepad);
    assert_eq!(editor.layout().rows().len(), 1);
    for (i, button) in editor.buttons().iter().enumerate() {
        assert_eq!(button.pos, MatrixPos::new(0, i));
        assert_eq!(button.label, i.to_string());
    }
    assert_eq!(editor.buttons().len(), 15);
}

#[tokio::test]
async fn discovery_mode_ignores_keyboard_layout() {
    let blade = Arc::new(
        SimulatedDevice::new(DeviceType::Keyboard, MatrixDimensions::new(6, 16))
            .with_layout("US"),
    );
    let editor = open(blade, true).await;

    assert_eq!(editor.origin(), &LayoutOrigin::Discovery);
    assert_eq!(editor.layout().rows().len(), 6);
    assert!(editor.layout().rows().iter().all(|row| row.len() == 16));
    assert_eq!(editor.buttons().len(), 96);

    let LayoutCell::Key(key) = &editor.layout().rows()[3][7] else {
        panic!("expected a key");
    };
    assert_eq!(key.label, "3:7");
}

#[tokio::test]
async fn open_blanks_every_row_then_displays_once() {
    let device = keyboard("US");
    let _editor = open(device.clone(), false).await;

    let calls = device.calls();
    assert_eq!(calls.len(), 7);
    for (row, call) in calls[..6].iter().enumerate() {
        assert_eq!(
            call,
            &DeviceCall::Define {
                row,
                col_start: 0,
                col_end: 21,
                colors: vec![RgbColor::OFF; 22],
            }
        );
    }
    assert_eq!(calls[6], DeviceCall::Display);
}

// ── Painting ──

#[tokio::test]
async fn click_pushes_exactly_one_row() {
    let device = keyboard("US");
    let mut editor = open(device.clone(), false).await;
    editor.choose_color(Some(RgbColor::new(255, 0, 0)));
    device.clear_calls();

    let id = editor.button_at(MatrixPos::new(2, 5)).unwrap();
    editor.on_cell_activated(id).await.unwrap();

    assert_eq!(
        editor.grid().get(MatrixPos::new(2, 5)),
        Some(RgbColor::new(255, 0, 0))
    );
    assert_eq!(editor.button_color(id), Some(RgbColor::new(255, 0, 0)));

    let calls = device.calls();
    assert_eq!(calls.len(), 2);
    let DeviceCall::Define {
        row,
        col_start,
        col_end,
        colors,
    } = &calls[0]
    else {
        panic!("expected a define call, got {:?}", calls[0]);
    };
    assert_eq!((*row, *col_start, *col_end), (2, 0, 21));
    assert_eq!(colors[5], RgbColor::new(255, 0, 0));
    assert_eq!(colors.iter().filter(|c| !c.is_off()).count(), 1);
    assert_eq!(calls[1], DeviceCall::Display);

    assert_eq!(device.displayed(2, 5), Some(RgbColor::new(255, 0, 0)));
}

#[tokio::test]
async fn failed_define_keeps_model_and_skips_display() {
    let device = keyboard("US");
    let mut editor = open(device.clone(), false).await;
    editor.drain_notices();
    device.clear_calls();
    device.fail_define(true);

    let id = editor.button_at(MatrixPos::new(2, 5)).unwrap();
    let err = editor.on_cell_activated(id).await.unwrap_err();
    assert!(matches!(err, SyncError::Define { row: 2, .. }));

    // no rollback
    assert_eq!(editor.grid().get(MatrixPos::new(2, 5)), Some(RgbColor::GREEN));
    assert_eq!(editor.button_color(id), Some(RgbColor::GREEN));
    assert!(device.calls().iter().all(|c| *c != DeviceCall::Display));
    assert_eq!(device.displayed(2, 5), Some(RgbColor::OFF));

    let notices = editor.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn failed_display_leaves_row_buffered() {
    let device = keyboard("US");
    let mut editor = open(device.clone(), false).await;
    editor.drain_notices();
    device.fail_display(true);

    let first = editor.button_at(MatrixPos::new(2, 5)).unwrap();
    assert!(matches!(
        editor.on_cell_activated(first).await,
        Err(SyncError::Display { .. })
    ));
    assert_eq!(device.defined(2, 5), Some(RgbColor::GREEN));
    assert_eq!(device.displayed(2, 5), Some(RgbColor::OFF));

    let notices = editor.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0].message.contains("row 2"));

    // the next good push shows the buffered row too
    device.fail_display(false);
    let second = editor.button_at(MatrixPos::new(3, 5)).unwrap();
    editor.on_cell_activated(second).await.unwrap();
    assert_eq!(device.displayed(2, 5), Some(RgbColor::GREEN));
    assert_eq!(device.displayed(3, 5), Some(RgbColor::GREEN));
}

#[tokio::test]
async fn iso_enter_halves_share_one_look() {
    let device = keyboard("German");
    let mut editor = open(device.clone(), false).await;

    let enter = MatrixPos::new(3, 14);
    let halves: Vec<_> = editor
        .buttons()
        .iter()
        .filter(|b| b.pos == enter)
        .map(|b| b.id)
        .collect();
    assert_eq!(halves.len(), 2);

    editor.on_cell_activated(halves[1]).await.unwrap();
    assert!(halves
        .iter()
        .all(|id| editor.button_color(*id) == Some(RgbColor::GREEN)));
    assert_eq!(device.displayed(3, 14), Some(RgbColor::GREEN));

    editor.set_draw_status(DrawStatus::Clear);
    editor.on_cell_activated(halves[0]).await.unwrap();
    assert!(halves.iter().all(|id| editor.button_color(*id).is_none()));
    assert_eq!(device.displayed(3, 14), Some(RgbColor::OFF));
}

#[tokio::test]
async fn erase_then_clear_all() {
    let device = keyboard("German");
    let mut editor = open(device.clone(), false).await;

    let ids: Vec<_> = [(1, 2), (1, 3), (4, 10)]
        .into_iter()
        .filter_map(|(r, c)| editor.button_at(MatrixPos::new(r, c)))
        .collect();
    assert_eq!(ids.len(), 3);
    for id in &ids {
        editor.on_cell_activated(*id).await.unwrap();
    }
    assert_eq!(editor.grid().lit_count(), 3);

    editor.set_draw_status(DrawStatus::Clear);
    editor.on_cell_activated(ids[0]).await.unwrap();
    assert_eq!(editor.grid().lit_count(), 2);
    assert_eq!(device.displayed(1, 2), Some(RgbColor::OFF));
    assert_eq!(device.displayed(1, 3), Some(RgbColor::GREEN));

    editor.clear_all().await.unwrap();
    assert_eq!(editor.grid().lit_count(), 0);
    assert!(ids.iter().all(|id| editor.button_color(*id).is_none()));
    assert_eq!(device.displayed(4, 10), Some(RgbColor::OFF));
}
