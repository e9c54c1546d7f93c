//! Choosing which key layout to show for a device
//!
//! Keyboards are matched by matrix size to a descriptor file, then by
//! physical layout identifier to a variant inside it, falling back to
//! [`FALLBACK_VARIANTS`]. Mousepads with a 1x15 matrix get a numbered strip.
//! Anything else, and matrix discovery mode, gets one key per matrix cell.

use std::fmt;

use genie_transport::{DeviceType, MatrixDimensions, UNKNOWN_LAYOUT};
use tracing::{debug, warn};

use crate::layout::Layout;
use crate::loader::LayoutLoader;
use crate::notice::Notices;

/// Variants tried, in order, when the physical layout has no exact match
pub const FALLBACK_VARIANTS: [&str; 2] = ["US", "German"];

/// Where keyboard layouts are documented for contributors
pub const LAYOUT_HELP_URL: &str = "https://github.com/openrazer/openrazer/wiki/Keyboard-layouts";

/// Descriptor file for a keyboard matrix size
pub fn keyboard_layout_file(dims: MatrixDimensions) -> Option<&'static str> {
    match (dims.rows, dims.cols) {
        // Blade Stealth (late 2017)
        (6, 16) => Some("razerblade16"),
        // full size keyboards, e.g. BlackWidow Chroma
        (6, 22) => Some("razerdefault22"),
        // Blade Pro (2017)
        (6, 25) => Some("razerblade25"),
        _ => None,
    }
}

/// Inputs to layout selection
#[derive(Debug, Clone)]
pub struct LayoutRequest {
    pub device_type: DeviceType,
    pub dimensions: MatrixDimensions,
    /// Physical layout identifier, only consulted for keyboards
    pub physical_layout: String,
    /// Force one key per matrix cell regardless of device type
    pub matrix_discovery: bool,
}

/// How a layout was chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutOrigin {
    /// Matrix discovery was requested
    Discovery,
    /// A keyboard descriptor variant
    Keyboard {
        file: &'static str,
        variant: String,
        exact: bool,
    },
    /// Mousepad strip
    Mousepad,
    /// Generic grid because nothing specific matched
    Fallback,
}

impl fmt::Display for LayoutOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutOrigin::Discovery => write!(f, "matrix discovery"),
            LayoutOrigin::Keyboard {
                file,
                variant,
                exact: true,
            } => write!(f, "{file} ({variant})"),
            LayoutOrigin::Keyboard { file, variant, .. } => {
                write!(f, "{file} ({variant}, fallback)")
            }
            LayoutOrigin::Mousepad => write!(f, "mousepad strip"),
            LayoutOrigin::Fallback => write!(f, "generic grid"),
        }
    }
}

/// A built layout and how it was reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub origin: LayoutOrigin,
    pub layout: Layout,
}

impl Selection {
    fn generic(origin: LayoutOrigin, dims: MatrixDimensions) -> Self {
        Self {
            origin,
            layout: Layout::generic(dims),
        }
    }
}

fn select_keyboard(
    loader: &LayoutLoader,
    request: &LayoutRequest,
    notices: &mut Notices,
) -> Option<Selection> {
    let file = keyboard_layout_file(request.dimensions)?;

    let descriptor = match loader.load(file) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            warn!("{}", e);
            notices.error(format!(
                "The file {file}.json used for the custom editor failed to load: {e}"
            ));
            return None;
        }
    };

    let physical = request.physical_layout.as_str();
    if let Some(rows) = descriptor.variant(physical) {
        return Some(Selection {
            origin: LayoutOrigin::Keyboard {
                file,
                variant: physical.to_string(),
                exact: true,
            },
            layout: Layout::from_rows(rows),
        });
    }

    if physical == UNKNOWN_LAYOUT {
        notices.info(format!(
            "You are using a keyboard with a layout which is not known to the daemon. \
             Please help us by visiting {LAYOUT_HELP_URL}. Using a fallback layout for now."
        ));
    } else {
        notices.info(format!(
            "No key layout for \"{physical}\" in {file}.json yet, see {LAYOUT_HELP_URL}. \
             Using a fallback layout for now."
        ));
    }

    FALLBACK_VARIANTS.iter().find_map(|&variant| {
        descriptor.variant(variant).map(|rows| Selection {
            origin: LayoutOrigin::Keyboard {
                file,
                variant: variant.to_string(),
                exact: false,
            },
            layout: Layout::from_rows(rows),
        })
    })
}

fn select_mousepad(request: &LayoutRequest) -> Option<Selection> {
    let dims = request.dimensions;
    if (dims.rows, dims.cols) != (1, 15) {
        return None;
    }
    Some(Selection {
        origin: LayoutOrigin::Mousepad,
        layout: Layout::strip(dims.cols),
    })
}

/// Type specific selection; `None` means the caller should use the generic grid
pub fn select_type_specific(
    loader: &LayoutLoader,
    request: &LayoutRequest,
    notices: &mut Notices,
) -> Option<Selection> {
    if request.matrix_discovery {
        return Some(Selection::generic(
            LayoutOrigin::Discovery,
            request.dimensions,
        ));
    }

    match request.device_type {
        DeviceType::Keyboard => select_keyboard(loader, request, notices),
        DeviceType::Mousepad => select_mousepad(request),
        _ => None,
    }
}

/// Select a layout; every device ends up with one
pub fn select_layout(
    loader: &LayoutLoader,
    request: &LayoutRequest,
    notices: &mut Notices,
) -> Selection {
    if let Some(selection) = select_type_specific(loader, request, notices) {
        debug!("Selected layout: {}", selection.origin);
        return selection;
    }

    warn!(
        "Unsupported custom layout for type {} with dimensions {}. Using fallback layout.",
        request.device_type, request.dimensions
    );
    Selection::generic(LayoutOrigin::Fallback, request.dimensions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{BundledSource, DirectoryKind, DirectorySource};
    use crate::notice::NoticeLevel;
    use std::fs;

    fn request(kind: DeviceType, rows: usize, cols: usize, physical: &str) -> LayoutRequest {
        LayoutRequest {
            device_type: kind,
            dimensions: MatrixDimensions::new(rows, cols),
            physical_layout: physical.to_string(),
            matrix_discovery: false,
        }
    }

    fn bundled() -> LayoutLoader {
        LayoutLoader::empty().with_source(BundledSource)
    }

    #[test]
    fn test_keyboard_files_by_size() {
        assert_eq!(
            keyboard_layout_file(MatrixDimensions::new(6, 16)),
            Some("razerblade16")
        );
        assert_eq!(
            keyboard_layout_file(MatrixDimensions::new(6, 22)),
            Some("razerdefault22")
        );
        assert_eq!(
            keyboard_layout_file(MatrixDimensions::new(6, 25)),
            Some("razerblade25")
        );
        assert_eq!(keyboard_layout_file(MatrixDimensions::new(5, 22)), None);
    }

    #[test]
    fn test_exact_variant() {
        let mut notices = Notices::new();
        let sel = select_layout(
            &bundled(),
            &request(DeviceType::Keyboard, 6, 22, "German"),
            &mut notices,
        );
        assert_eq!(
            sel.origin,
            LayoutOrigin::Keyboard {
                file: "razerdefault22",
                variant: "German".into(),
                exact: true
            }
        );
        assert!(notices.drain().is_empty());
    }

    #[test]
    fn test_unlisted_variant_falls_back_to_us() {
        let mut notices = Notices::new();
        let sel = select_layout(
            &bundled(),
            &request(DeviceType::Keyboard, 6, 22, "Klingon"),
            &mut notices,
        );
        assert_eq!(
            sel.origin,
            LayoutOrigin::Keyboard {
                file: "razerdefault22",
                variant: "US".into(),
                exact: false
            }
        );
        let notices = notices.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Info);
    }

    #[test]
    fn test_unknown_layout_notice() {
        let mut notices = Notices::new();
        select_layout(
            &bundled(),
            &request(DeviceType::Keyboard, 6, 16, UNKNOWN_LAYOUT),
            &mut notices,
        );
        let notices = notices.drain();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].message.contains("not known to the daemon"));
    }

    #[test]
    fn test_second_fallback_variant() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("razerdefault22.json"),
            r#"{"German": [[{"label": "Esc", "matrix": [0, 1]}]], "French": []}"#,
        )
        .unwrap();
        let loader = LayoutLoader::empty()
            .with_source(DirectorySource::new(DirectoryKind::User, dir.path()));

        let sel = select_layout(
            &loader,
            &request(DeviceType::Keyboard, 6, 22, "Nordic"),
            &mut Notices::new(),
        );
        assert_eq!(
            sel.origin,
            LayoutOrigin::Keyboard {
                file: "razerdefault22",
                variant: "German".into(),
                exact: false
            }
        );
    }

    #[test]
    fn test_no_fallback_variant_uses_generic_grid() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("razerdefault22.json"),
            r#"{"French": [[{"label": "Esc", "matrix": [0, 1]}]]}"#,
        )
        .unwrap();
        let loader = LayoutLoader::empty()
            .with_source(DirectorySource::new(DirectoryKind::User, dir.path()));

        let sel = select_layout(
            &loader,
            &request(DeviceType::Keyboard, 6, 22, "Nordic"),
            &mut Notices::new(),
        );
        assert_eq!(sel.origin, LayoutOrigin::Fallback);
        assert_eq!(sel.layout.keys().count(), 6 * 22);
    }

    #[test]
    fn test_missing_file_notifies_and_falls_back() {
        let mut notices = Notices::new();
        let sel = select_layout(
            &LayoutLoader::empty(),
            &request(DeviceType::Keyboard, 6, 22, "US"),
            &mut notices,
        );
        assert_eq!(sel.origin, LayoutOrigin::Fallback);
        let notices = notices.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(notices[0].message.contains("razerdefault22.json"));
    }

    #[test]
    fn test_mousepad_strip() {
        let sel = select_layout(
            &bundled(),
            &request(DeviceType::Mousepad, 1, 15, UNKNOWN_LAYOUT),
            &mut Notices::new(),
        );
        assert_eq!(sel.origin, LayoutOrigin::Mousepad);
        assert_eq!(sel.layout.keys().count(), 15);
    }

    #[test]
    fn test_other_shapes_are_silent_fallbacks() {
        let mut notices = Notices::new();
        for req in [
            request(DeviceType::Mousepad, 1, 20, UNKNOWN_LAYOUT),
            request(DeviceType::Keyboard, 4, 10, "US"),
            request(DeviceType::Mouse, 1, 3, UNKNOWN_LAYOUT),
        ] {
            let sel = select_layout(&bundled(), &req, &mut notices);
            assert_eq!(sel.origin, LayoutOrigin::Fallback);
            assert_eq!(sel.layout.keys().count(), req.dimensions.len());
        }
        assert!(notices.drain().is_empty());
    }

    #[test]
    fn test_discovery_ignores_type() {
        let mut req = request(DeviceType::Keyboard, 6, 16, "US");
        req.matrix_discovery = true;
        let sel = select_layout(&bundled(), &req, &mut Notices::new());
        assert_eq!(sel.origin, LayoutOrigin::Discovery);
        assert_eq!(sel.layout, Layout::generic(MatrixDimensions::new(6, 16)));
    }

    #[test]
    fn test_selection_is_deterministic() {
        let loader = bundled();
        let req = request(DeviceType::Keyboard, 6, 22, "Klingon");
        let a = select_layout(&loader, &req, &mut Notices::new());
        let b = select_layout(&loader, &req, &mut Notices::new());
        assert_eq!(a, b);
    }
}
