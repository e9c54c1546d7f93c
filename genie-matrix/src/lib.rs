//! Custom LED matrix editor core
//!
//! - [`layout`] / [`loader`]: layout descriptor files and where they come from
//! - [`select`]: picking the key grid for a device
//! - [`grid`]: the per-cell color model
//! - [`sync`]: pushing model rows to a [`genie_transport::Device`]
//! - [`editor`]: the paint/erase state machine tying it together

pub mod editor;
pub mod error;
pub mod grid;
pub mod layout;
pub mod loader;
pub mod notice;
pub mod select;
pub mod sync;

pub use editor::{build_buttons, ButtonId, CustomEditor, DrawStatus, EditorOptions, MatrixButton};
pub use error::{LayoutError, MatrixError, SyncError};
pub use grid::GridModel;
pub use layout::{
    KeyCap, KeyCell, KeyRows, Layout, LayoutCell, LayoutDescriptor, MatrixPos, DEFAULT_KEY_WIDTH,
    KEY_HEIGHT, SPACER_HEIGHT, SPACER_WIDTH,
};
pub use loader::{
    BundledSource, DirectoryKind, DirectorySource, LayoutLoader, LayoutSource,
    DEVELOPMENT_LAYOUT_DIR, INSTALLED_LAYOUT_DIR,
};
pub use notice::{Notice, NoticeLevel, Notices};
pub use select::{
    keyboard_layout_file, select_layout, select_type_specific, LayoutOrigin, LayoutRequest,
    Selection, FALLBACK_VARIANTS, LAYOUT_HELP_URL,
};
pub use sync::{push_all, push_row};
