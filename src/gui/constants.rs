//! GUI-specific constants for layout, status colors and panel chrome

use egui;

/// Settings window dimensions
pub const WINDOW_WIDTH: f32 = 720.0;
pub const WINDOW_HEIGHT: f32 = 520.0;
pub const WINDOW_MIN_WIDTH: f32 = 560.0;
pub const WINDOW_MIN_HEIGHT: f32 = 420.0;
pub const LIST_WIDTH: f32 = 200.0;

/// Layout spacing
pub const PADDING: f32 = 8.0;
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;

/// Status colors
pub const STATUS_OK: egui::Color32 = egui::Color32::from_rgb(0, 200, 0);
pub const STATUS_ERROR: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);

/// Widget panel chrome
pub const PANEL_CORNER_RADIUS: u8 = 10;
pub const PANEL_MARGIN: i8 = 12;

/// Repaint interval while any panel is on screen
pub const PANEL_REFRESH_MS: u64 = 250;
