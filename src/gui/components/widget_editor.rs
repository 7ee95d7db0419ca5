//! Settings form for the selected widget

use eframe::egui;

use crate::color::{BackgroundColor, Opacity};
use crate::config::{WidgetConfig, WidgetDraft};
use crate::constants::validation::{MAX_COORDINATE, MAX_OPACITY_PERCENT, MIN_OPACITY_PERCENT};
use crate::gui::constants::*;
use crate::types::{Dimensions, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    None,
    Apply,
    Launch,
    CloseAll,
    SetGlobalPin(bool),
}

/// Uncommitted field values; nothing reaches the collection until Apply
pub struct WidgetEditor {
    url: String,
    opacity_percent: u8,
    /// Unmultiplied sRGBA
    rgba: [u8; 4],
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    pinned: bool,
    loaded_for: Option<usize>,
}

impl WidgetEditor {
    pub fn new() -> Self {
        let mut editor = Self {
            url: String::new(),
            opacity_percent: 0,
            rgba: [0; 4],
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            pinned: false,
            loaded_for: None,
        };
        editor.fill_from(&WidgetConfig::default_with_name(String::new()));
        editor
    }

    /// Index whose values the form currently shows
    pub fn loaded_for(&self) -> Option<usize> {
        self.loaded_for
    }

    pub fn load(&mut self, index: usize, config: &WidgetConfig) {
        self.fill_from(config);
        self.loaded_for = Some(index);
    }

    pub fn clear(&mut self) {
        self.loaded_for = None;
    }

    fn fill_from(&mut self, config: &WidgetConfig) {
        let color = config.background_color;
        self.url = config.url.clone();
        self.opacity_percent = config.opacity.percent();
        self.rgba = [color.r, color.g, color.b, color.a];
        self.x = config.position.x;
        self.y = config.position.y;
        self.width = config.size.width;
        self.height = config.size.height;
        self.pinned = config.pinned;
    }

    pub fn draft(&self) -> WidgetDraft {
        let [r, g, b, a] = self.rgba;
        WidgetDraft {
            url: self.url.clone(),
            opacity: Opacity::from_percent(self.opacity_percent),
            background_color: BackgroundColor::new(r, g, b, a),
            position: Position::new(self.x, self.y),
            size: Dimensions::new(self.width, self.height),
            pinned: self.pinned,
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, global_pin: bool) -> EditorAction {
        let mut action = EditorAction::None;
        let has_selection = self.loaded_for.is_some();

        ui.add_enabled_ui(has_selection, |ui| {
            ui.group(|ui| {
                ui.label(egui::RichText::new("Widget Settings").heading().strong());
                ui.add_space(ITEM_SPACING);

                ui.horizontal(|ui| {
                    ui.label("URL:");
                    ui.add_space(5.0);
                    ui.add(egui::TextEdit::singleline(&mut self.url).desired_width(f32::INFINITY));
                });

                ui.add_space(ITEM_SPACING);

                ui.horizontal(|ui| {
                    ui.label("Opacity:");
                    ui.add_space(5.0);
                    ui.add(
                        egui::Slider::new(
                            &mut self.opacity_percent,
                            MIN_OPACITY_PERCENT..=MAX_OPACITY_PERCENT,
                        )
                        .suffix("%"),
                    );
                });

                ui.add_space(ITEM_SPACING);

                ui.horizontal(|ui| {
                    ui.label("Background:");
                    ui.add_space(5.0);
                    ui.color_edit_button_srgba_unmultiplied(&mut self.rgba);
                    let [r, g, b, a] = self.rgba;
                    ui.label(
                        egui::RichText::new(BackgroundColor::new(r, g, b, a).to_css())
                            .small()
                            .weak(),
                    );
                });

                ui.add_space(ITEM_SPACING);

                ui.horizontal(|ui| {
                    ui.label("Position:");
                    ui.add_space(5.0);
                    ui.label("X:");
                    ui.add(egui::DragValue::new(&mut self.x).range(0..=MAX_COORDINATE));
                    ui.add_space(5.0);
                    ui.label("Y:");
                    ui.add(egui::DragValue::new(&mut self.y).range(0..=MAX_COORDINATE));
                });

                ui.add_space(ITEM_SPACING);

                ui.horizontal(|ui| {
                    ui.label("Size:");
                    ui.add_space(5.0);
                    ui.label("W:");
                    ui.add(egui::DragValue::new(&mut self.width).range(0..=MAX_COORDINATE));
                    ui.add_space(5.0);
                    ui.label("H:");
                    ui.add(egui::DragValue::new(&mut self.height).range(0..=MAX_COORDINATE));
                });

                ui.add_space(ITEM_SPACING);
                ui.checkbox(&mut self.pinned, "Always on top");

                ui.add_space(ITEM_SPACING);
                if ui.button("💾 Apply settings").clicked() {
                    action = EditorAction::Apply;
                }
            });
        });

        ui.add_space(SECTION_SPACING);

        ui.group(|ui| {
            ui.label(egui::RichText::new("All Widgets").heading().strong());
            ui.add_space(ITEM_SPACING);

            let mut pin_all = global_pin;
            if ui.checkbox(&mut pin_all, "Pin all widgets").changed() {
                action = EditorAction::SetGlobalPin(pin_all);
            }

            ui.add_space(ITEM_SPACING);

            ui.horizontal(|ui| {
                if ui.button("🚀 Launch widgets").clicked() {
                    action = EditorAction::Launch;
                }
                if ui.button("✖ Close all widgets").clicked() {
                    action = EditorAction::CloseAll;
                }
            });
        });

        action
    }
}
