//! Layout descriptor loading
//!
//! Descriptors are looked up by name (`<name>.json`) in an ordered list of
//! sources. The first source that yields a parseable document wins; the
//! development tree comes before the installed data directory so layouts can
//! be edited without reinstalling.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::error::LayoutError;
use crate::layout::LayoutDescriptor;

/// Layout directory inside a source checkout
pub const DEVELOPMENT_LAYOUT_DIR: &str = "data/matrix_layouts";

/// Layout directory of an installed copy
pub const INSTALLED_LAYOUT_DIR: &str = "/usr/share/razergenie/matrix_layouts";

/// Descriptors compiled into the binary
const BUNDLED_LAYOUTS: &[(&str, &str)] = &[
    (
        "razerblade16",
        include_str!("../../data/matrix_layouts/razerblade16.json"),
    ),
    (
        "razerdefault22",
        include_str!("../../data/matrix_layouts/razerdefault22.json"),
    ),
    (
        "razerblade25",
        include_str!("../../data/matrix_layouts/razerblade25.json"),
    ),
];

/// A place descriptor documents can come from
pub trait LayoutSource: Send + Sync {
    /// Short description for logs and notices
    fn describe(&self) -> String;

    /// Raw document for `name`
    fn read(&self, name: &str) -> Result<String, LayoutError>;
}

/// What a directory source stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryKind {
    Development,
    Installed,
    User,
}

/// Descriptors stored as `<dir>/<name>.json`
#[derive(Debug, Clone)]
pub struct DirectorySource {
    kind: DirectoryKind,
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(kind: DirectoryKind, dir: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            dir: dir.into(),
        }
    }

    pub fn development() -> Self {
        Self::new(DirectoryKind::Development, DEVELOPMENT_LAYOUT_DIR)
    }

    pub fn installed() -> Self {
        Self::new(DirectoryKind::Installed, INSTALLED_LAYOUT_DIR)
    }
}

impl LayoutSource for DirectorySource {
    fn describe(&self) -> String {
        let kind = match self.kind {
            DirectoryKind::Development => "development",
            DirectoryKind::Installed => "installed",
            DirectoryKind::User => "user",
        };
        format!("{kind} {}", self.dir.display())
    }

    fn read(&self, name: &str) -> Result<String, LayoutError> {
        let path = self.dir.join(format!("{name}.json"));
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(LayoutError::Missing(path)),
            Err(source) => Err(LayoutError::Io { path, source }),
        }
    }
}

/// Descriptors shipped inside the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledSource;

impl BundledSource {
    /// Names of the bundled descriptors
    pub fn names() -> impl Iterator<Item = &'static str> {
        BUNDLED_LAYOUTS.iter().map(|(name, _)| *name)
    }
}

impl LayoutSource for BundledSource {
    fn describe(&self) -> String {
        "bundled".to_string()
    }

    fn read(&self, name: &str) -> Result<String, LayoutError> {
        BUNDLED_LAYOUTS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, json)| json.to_string())
            .ok_or_else(|| LayoutError::Missing(PathBuf::from(format!("bundled:{name}.json"))))
    }
}

/// Resolves descriptor names against an ordered list of sources
pub struct LayoutLoader {
    sources: Vec<Box<dyn LayoutSource>>,
}

impl Default for LayoutLoader {
    fn default() -> Self {
        Self::standard()
    }
}

impl LayoutLoader {
    /// Loader with no sources
    pub fn empty() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Development tree first, then the installed data directory
    pub fn standard() -> Self {
        Self::empty()
            .with_source(DirectorySource::development())
            .with_source(DirectorySource::installed())
    }

    /// Append a source; later sources are tried last
    pub fn with_source(mut self, source: impl LayoutSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Source descriptions in lookup order
    pub fn describe_sources(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.describe()).collect()
    }

    /// Load `<name>.json` from the first source that has a valid copy
    pub fn load(&self, name: &str) -> Result<LayoutDescriptor, LayoutError> {
        let mut attempts = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let where_ = source.describe();
            let json = match source.read(name) {
                Ok(json) => json,
                Err(e) => {
                    debug!("{}.json not available from {}: {}", name, where_, e);
                    attempts.push(format!("{where_}: {e}"));
                    continue;
                }
            };

            match LayoutDescriptor::from_json(name, &json) {
                Ok(descriptor) => {
                    info!("Using {}.json from {}", name, where_);
                    return Ok(descriptor);
                }
                Err(e) => {
                    warn!("Ignoring {}.json from {}: {}", name, where_, e);
                    attempts.push(format!("{where_}: {e}"));
                }
            }
        }

        Err(LayoutError::NotFound {
            name: name.to_string(),
            attempts,
        })
    }
}
