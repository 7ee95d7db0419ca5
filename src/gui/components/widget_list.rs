//! Widget list with add, remove and inline rename

use eframe::egui;

use crate::config::WidgetConfig;
use crate::gui::constants::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    None,
    Select(usize),
    Add,
    Remove(usize),
    Rename(usize, String),
}

pub struct WidgetList {
    /// Row being renamed and its edit buffer
    editing: Option<(usize, String)>,
}

impl WidgetList {
    pub fn new() -> Self {
        Self { editing: None }
    }

    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        widgets: &[WidgetConfig],
        selected: Option<usize>,
        is_live: impl Fn(usize) -> bool,
    ) -> ListAction {
        let mut action = ListAction::None;

        ui.label(egui::RichText::new("Widgets").heading().strong());
        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            if ui.button("➕ Add").clicked() {
                action = ListAction::Add;
            }
            if ui
                .add_enabled(selected.is_some(), egui::Button::new("🗑 Remove"))
                .clicked()
                && let Some(index) = selected
            {
                self.editing = None;
                action = ListAction::Remove(index);
            }
        });

        ui.add_space(ITEM_SPACING);

        egui::ScrollArea::vertical().show(ui, |ui| {
            for (index, widget) in widgets.iter().enumerate() {
                if let Some(rename) = self.rename_row(ui, index, widget) {
                    action = rename;
                    continue;
                }

                let marker = if is_live(index) { "● " } else { "" };
                let response =
                    ui.selectable_label(selected == Some(index), format!("{marker}{}", widget.name));
                if response.double_clicked() {
                    self.editing = Some((index, widget.name.clone()));
                } else if response.clicked() {
                    action = ListAction::Select(index);
                }
            }

            if widgets.is_empty() {
                ui.label(egui::RichText::new("(No widgets configured)").italics().weak());
            }
        });

        action
    }

    /// Inline editor for the row under rename; `None` when `index` is not being edited
    fn rename_row(
        &mut self,
        ui: &mut egui::Ui,
        index: usize,
        widget: &WidgetConfig,
    ) -> Option<ListAction> {
        let (editing_index, buffer) = self.editing.as_mut()?;
        if *editing_index != index {
            return None;
        }

        let response = ui.text_edit_singleline(buffer);
        if !response.has_focus() && !response.lost_focus() {
            response.request_focus();
        }

        if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.editing = None;
            return Some(ListAction::None);
        }
        if response.lost_focus() {
            let edited = std::mem::take(buffer);
            self.editing = None;
            return Some(match finish_rename(&widget.name, &edited) {
                Some(name) => ListAction::Rename(index, name),
                None => ListAction::None,
            });
        }
        Some(ListAction::None)
    }
}

/// New name to commit, `None` when the edit is blank or unchanged
fn finish_rename(current: &str, edited: &str) -> Option<String> {
    let edited = edited.trim();
    (!edited.is_empty() && edited != current).then(|| edited.to_string())
}
