//! Configuration file
//!
//! Stored as TOML at `<config_dir>/razergenie/config.toml`. Every field is
//! optional; a missing file means defaults.

use std::path::{Path, PathBuf};

use genie_matrix::{BundledSource, DirectoryKind, DirectorySource, LayoutLoader};
use genie_transport::RgbColor;
use serde::{Deserialize, Serialize};

/// Persistent editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenieConfig {
    /// Extra layout directories, searched after the built-in ones
    pub layout_dirs: Vec<PathBuf>,
    /// Fall back to the layouts compiled into the binary
    pub bundled_layouts: bool,
    /// Paint color when the editor opens
    pub initial_color: RgbColor,
    /// Log filter used when neither `RUST_LOG` nor `--log-level` is given
    pub log_level: Option<String>,
}

impl Default for GenieConfig {
    fn default() -> Self {
        Self {
            layout_dirs: Vec::new(),
            bundled_layouts: true,
            initial_color: RgbColor::GREEN,
            log_level: None,
        }
    }
}

impl GenieConfig {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("razergenie")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Render as a TOML document
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save config to a file, creating its directory
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Layout sources in lookup order
    pub fn layout_loader(&self) -> LayoutLoader {
        let mut loader = LayoutLoader::empty()
            .with_source(DirectorySource::development())
            .with_source(DirectorySource::installed());
        for dir in &self.layout_dirs {
            loader = loader.with_source(DirectorySource::new(DirectoryKind::User, dir.clone()));
        }
        if self.bundled_layouts {
            loader = loader.with_source(BundledSource);
        }
        loader
    }
}
