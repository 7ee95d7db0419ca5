//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Config file location
pub mod config {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "web-widgets";

    /// Widget collection file name
    pub const FILENAME: &str = "web_widgets_config.json";

    /// Suffix for the sibling file used while saving atomically
    pub const TEMP_SUFFIX: &str = "tmp";
}

/// Values given to a freshly added widget
pub mod defaults {
    /// Name prefix, followed by the 1-based count at add time
    pub const NAME_PREFIX: &str = "Widget";

    /// Name used for a stored record that has none
    pub const FALLBACK_NAME: &str = "Widget";

    pub const URL: &str = "https://www.example.com";

    pub const OPACITY_PERCENT: u8 = 80;

    /// Fully transparent black
    pub const BACKGROUND_ARGB: u32 = 0x00_00_00_00;

    pub const X: u32 = 100;
    pub const Y: u32 = 100;
    pub const WIDTH: u32 = 400;
    pub const HEIGHT: u32 = 300;

    pub const PINNED: bool = true;

    /// Global pin state at startup
    pub const GLOBAL_PIN: bool = true;
}

/// Limits enforced on widget records
pub mod validation {
    /// Minimum panel width and height in pixels
    pub const MIN_DIMENSION: u32 = 100;

    /// Upper bound offered by the editor for coordinates and sizes
    pub const MAX_COORDINATE: u32 = 5000;

    pub const MIN_OPACITY_PERCENT: u8 = 10;
    pub const MAX_OPACITY_PERCENT: u8 = 100;
}

/// User-visible notification texts
pub mod messages {
    pub const SETTINGS_SAVED: &str = "Settings saved";
    pub const INPUT_ERROR: &str = "Invalid input";
    pub const SAVE_FAILED: &str = "Save failed";
    pub const LAUNCHED: &str = "Widgets launched";
    pub const LAUNCH_ERROR: &str = "Launch error";
    pub const RENAME_ERROR: &str = "Rename failed";
    pub const REMOVE_ERROR: &str = "Remove failed";

    /// How long the settings window keeps a notification on screen
    pub const DISPLAY_DURATION_MS: u64 = 2000;
}

/// Tray menu labels
pub mod tray {
    pub const ID: &str = "web-widgets";
    pub const TITLE: &str = "Web Widgets";
    pub const SHOW_SETTINGS: &str = "Show settings";
    pub const RELAUNCH: &str = "Relaunch widgets";
    pub const CLOSE_ALL: &str = "Close all widgets";
    pub const PIN_ALL: &str = "Pin all widgets";
    pub const UNPIN_ALL: &str = "Unpin all widgets";
    pub const QUIT: &str = "Quit";
}
