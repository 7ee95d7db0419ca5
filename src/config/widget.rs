//! Widget configuration record
//!
//! One record per user-defined widget. The on-disk layout keeps position and
//! size flattened into the record (`x`, `y`, `width`, `height`).

use serde::{Deserialize, Serialize};

use crate::color::{BackgroundColor, Opacity};
use crate::constants::defaults;
use crate::error::{WidgetError, WidgetResult};
use crate::types::{Dimensions, Position};

/// Persisted description from which a panel is constructed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// List label, not required to be unique
    #[serde(default = "default_name")]
    pub name: String,

    pub url: String,

    #[serde(default)]
    pub opacity: Opacity,

    #[serde(rename = "bg_color", default)]
    pub background_color: BackgroundColor,

    #[serde(flatten)]
    pub position: Position,

    #[serde(flatten)]
    pub size: Dimensions,

    /// Per-widget "always on top" flag
    #[serde(rename = "always_on_top", default = "default_pinned")]
    pub pinned: bool,
}

fn default_name() -> String {
    defaults::FALLBACK_NAME.to_string()
}

fn default_pinned() -> bool {
    defaults::PINNED
}

impl WidgetConfig {
    /// Record with every field at its default and the given name
    pub fn default_with_name(name: String) -> Self {
        Self {
            name,
            url: defaults::URL.to_string(),
            opacity: Opacity::from_percent(defaults::OPACITY_PERCENT),
            background_color: BackgroundColor::from_argb32(defaults::BACKGROUND_ARGB),
            position: Position::new(defaults::X, defaults::Y),
            size: Dimensions::new(defaults::WIDTH, defaults::HEIGHT),
            pinned: defaults::PINNED,
        }
    }

    /// Label for the widget added when the collection holds `count` entries
    pub fn sequential_name(count: usize) -> String {
        format!("{} {}", defaults::NAME_PREFIX, count + 1)
    }
}

/// Editor-side copy of every field except the name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetDraft {
    pub url: String,
    pub opacity: Opacity,
    pub background_color: BackgroundColor,
    pub position: Position,
    pub size: Dimensions,
    pub pinned: bool,
}

impl WidgetDraft {
    /// Check the draft can be committed; nothing is mutated here
    pub fn validate(&self) -> WidgetResult<()> {
        if !self.size.meets_minimum() {
            return Err(WidgetError::InvalidSize {
                width: self.size.width,
                height: self.size.height,
            });
        }
        if self.url.trim().is_empty() {
            return Err(WidgetError::EmptyUrl);
        }
        Ok(())
    }

    /// Build the committed record, keeping the caller's name
    pub fn into_config(self, name: String) -> WidgetConfig {
        WidgetConfig {
            name,
            url: self.url.trim().to_string(),
            opacity: self.opacity,
            background_color: self.background_color,
            position: self.position,
            size: self.size,
            pinned: self.pinned,
        }
    }
}

impl From<&WidgetConfig> for WidgetDraft {
    fn from(config: &WidgetConfig) -> Self {
        Self {
            url: config.url.clone(),
            opacity: config.opacity,
            background_color: config.background_color,
            position: config.position,
            size: config.size,
            pinned: config.pinned,
        }
    }
}
