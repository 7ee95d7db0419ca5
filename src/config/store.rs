//! Durable storage for the widget collection
//!
//! The whole collection is written as one pretty-printed JSON array. Loading
//! never fails: a missing, unreadable or malformed file yields an empty
//! collection and the caller decides the fallback.

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::widget::WidgetConfig;
use crate::constants::validation::MIN_DIMENSION;

/// Full-snapshot persistence of the widget collection
pub trait ConfigStore {
    /// Read the stored collection, empty when absent or unusable
    fn load(&self) -> Vec<WidgetConfig>;

    /// Replace the stored collection with `widgets`
    fn save(&self, widgets: &[WidgetConfig]) -> Result<()>;
}

/// JSON file in the user's config directory
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the platform default location
    pub fn at_default_path() -> Self {
        Self::new(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::config::APP_DIR);
        path.push(crate::constants::config::FILENAME);
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(crate::constants::config::TEMP_SUFFIX);
        self.path.with_file_name(name)
    }
}

impl ConfigStore for JsonConfigStore {
    fn load(&self) -> Vec<WidgetConfig> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No config file found");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read config file, ignoring it");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<WidgetConfig>>(&contents) {
            Ok(mut widgets) => {
                validate_and_clamp(&mut widgets);
                info!(path = %self.path.display(), count = widgets.len(), "Loaded widget config");
                widgets
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Malformed config file, ignoring it");
                Vec::new()
            }
        }
    }

    fn save(&self, widgets: &[WidgetConfig]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(widgets)
            .context("Failed to serialize widget config to JSON")?;

        // Readers only ever see the old file or the complete new one
        let temp_path = self.temp_path();
        fs::write(&temp_path, json)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!("Failed to move {} over {}", temp_path.display(), self.path.display())
        })?;

        info!(path = %self.path.display(), count = widgets.len(), "Saved widget config");
        Ok(())
    }
}

/// Raise undersized panels to the minimum; opacity and coordinates are clamped while parsing
fn validate_and_clamp(widgets: &mut [WidgetConfig]) {
    for (index, widget) in widgets.iter_mut().enumerate() {
        if widget.size.width < MIN_DIMENSION {
            warn!(index, name = %widget.name, width = widget.size.width, min = MIN_DIMENSION, "width below minimum, clamping");
            widget.size.width = MIN_DIMENSION;
        }
        if widget.size.height < MIN_DIMENSION {
            warn!(index, name = %widget.name, height = widget.size.height, min = MIN_DIMENSION, "height below minimum, clamping");
            widget.size.height = MIN_DIMENSION;
        }
    }
}
