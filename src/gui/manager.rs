//! Settings window implemented with egui/eframe and ksni system tray support

use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use anyhow::{Result, anyhow};
use eframe::{CreationContext, NativeOptions, egui};
use tracing::{error, info, warn};

use super::components::{EditorAction, ListAction, WidgetEditor, WidgetList};
use super::constants::*;
use super::shell::EguiShell;
use super::status::StatusNotifier;
use super::surface::{EguiPanelFactory, SurfaceBoard};
use crate::config::JsonConfigStore;
use crate::constants::{defaults, messages};
use crate::error::WidgetError;
use crate::lifecycle::{LifecycleController, Notifier};
use crate::tray::{CommandSender, TrayCommand, TrayHandle, spawn_tray};

type Controller = LifecycleController<JsonConfigStore, EguiPanelFactory, StatusNotifier, EguiShell>;

struct ManagerApp {
    controller: Controller,
    board: SurfaceBoard,
    status: StatusNotifier,
    quitting: Rc<Cell<bool>>,
    tray: Option<TrayHandle>,
    commands: Receiver<TrayCommand>,
    selected: Option<usize>,
    list: WidgetList,
    editor: WidgetEditor,
    show_close_prompt: bool,
}

impl ManagerApp {
    fn new(cc: &CreationContext<'_>, store: JsonConfigStore) -> Self {
        info!(path = %store.path().display(), "Initializing settings window");
        let ctx = cc.egui_ctx.clone();

        let (tx, commands) = mpsc::channel();
        let sender = CommandSender::new(tx, ctx.clone());

        #[cfg(unix)]
        let _ = spawn_signal_forwarder(sender.clone())
            .inspect_err(|err| error!(error = ?err, "Failed to install signal handlers"));

        // The pin coordinator starts from the same default the tray label shows
        let tray = match spawn_tray(sender, defaults::GLOBAL_PIN) {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!(error = ?err, "System tray unavailable, closing the window will quit");
                None
            }
        };

        let quitting = Rc::new(Cell::new(false));
        let mut shell = EguiShell::new(ctx.clone(), Rc::clone(&quitting));
        shell.set_tray_available(tray.is_some());

        let board = SurfaceBoard::new();
        let status = StatusNotifier::new();
        let controller = LifecycleController::open(
            store,
            EguiPanelFactory::new(ctx, board.clone()),
            status.clone(),
            shell,
        );

        let mut app = Self {
            controller,
            board,
            status,
            quitting,
            tray,
            commands,
            selected: None,
            list: WidgetList::new(),
            editor: WidgetEditor::new(),
            show_close_prompt: false,
        };
        app.select(Some(0));
        app
    }

    fn select(&mut self, index: Option<usize>) {
        let index = index.filter(|i| *i < self.controller.len());
        self.selected = index;
        match index.and_then(|i| self.controller.widget(i).map(|w| (i, w))) {
            Some((i, widget)) => self.editor.load(i, widget),
            None => self.editor.clear(),
        }
    }

    fn sync_tray_pin(&self) {
        if let Some(tray) = &self.tray {
            tray.set_global_pin(self.controller.global_pin());
        }
    }

    fn process_tray_commands(&mut self, ctx: &egui::Context) {
        while let Ok(command) = self.commands.try_recv() {
            info!(command = ?command, "Tray command");
            match command {
                TrayCommand::ShowSettings => show_settings(ctx),
                TrayCommand::Relaunch => {
                    let _ = self.controller.launch_all();
                }
                TrayCommand::CloseAll => {
                    self.controller.close_all();
                }
                TrayCommand::TogglePin => {
                    self.controller.toggle_global_pin();
                    self.sync_tray_pin();
                }
                TrayCommand::Quit => self.controller.shutdown(),
            }
        }
    }

    fn handle_list_action(&mut self, action: ListAction) {
        match action {
            ListAction::None => {}
            ListAction::Select(index) => self.select(Some(index)),
            ListAction::Add => {
                let index = self.controller.add_widget();
                self.select(Some(index));
            }
            ListAction::Remove(index) => match self.controller.remove_widget(index) {
                Ok(_) => {
                    let next = index.min(self.controller.len().saturating_sub(1));
                    self.select(Some(next));
                }
                Err(err) => self.status.alert(messages::REMOVE_ERROR, &err.to_string()),
            },
            ListAction::Rename(index, name) => {
                if let Err(err) = self.controller.rename_widget(index, &name)
                    && !matches!(err, WidgetError::PersistenceFailure(_))
                {
                    self.status.alert(messages::RENAME_ERROR, &err.to_string());
                }
            }
        }
    }

    fn handle_editor_action(&mut self, action: EditorAction) {
        match action {
            EditorAction::None => {}
            EditorAction::Apply => {
                if let Some(index) = self.editor.loaded_for() {
                    let _ = self.controller.apply_settings(index, self.editor.draft());
                }
            }
            EditorAction::Launch => {
                let _ = self.controller.launch_all();
            }
            EditorAction::CloseAll => {
                let closed = self.controller.close_all();
                info!(closed, "Closed widgets from settings");
            }
            EditorAction::SetGlobalPin(enabled) => {
                self.controller.set_global_pin(enabled);
                self.sync_tray_pin();
            }
        }
    }

    fn close_prompt(&mut self, ctx: &egui::Context) {
        let has_tray = self.tray.is_some();
        egui::Window::new("Exit")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Do you want to quit or minimize to the tray?");
                ui.add_space(ITEM_SPACING);
                ui.horizontal(|ui| {
                    if ui.button("Quit").clicked() {
                        self.show_close_prompt = false;
                        self.controller.shutdown();
                    }
                    if ui
                        .add_enabled(has_tray, egui::Button::new("Minimize to tray"))
                        .clicked()
                    {
                        self.show_close_prompt = false;
                        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(false));
                    }
                    if ui.button("Cancel").clicked() {
                        self.show_close_prompt = false;
                    }
                });
            });
    }
}

impl eframe::App for ManagerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_tray_commands(ctx);

        let reaped = self.controller.reap_closed_panels();
        if !reaped.is_empty() {
            info!(slots = ?reaped, "Widget panels closed from their own surface");
        }

        if ctx.input(|i| i.viewport().close_requested()) && !self.quitting.get() {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_close_prompt = true;
        }

        let mut list_action = ListAction::None;
        egui::SidePanel::left("widget_list")
            .resizable(false)
            .exact_width(LIST_WIDTH)
            .show(ctx, |ui| {
                ui.add_space(PADDING);
                let controller = &self.controller;
                list_action = self.list.ui(ui, controller.widgets(), self.selected, |i| {
                    controller.is_live(i)
                });
            });

        let now = Instant::now();
        egui::TopBottomPanel::bottom("status_line").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "{} widget(s), {} running",
                    self.controller.len(),
                    self.controller.live_panel_count()
                ));
                if let Some(message) = self.status.visible(now) {
                    ui.separator();
                    ui.colored_label(message.color(), format!("{}: {}", message.title, message.text));
                    match message.remaining(now) {
                        Some(left) => ctx.request_repaint_after(left),
                        None => {
                            if ui.small_button("✖").clicked() {
                                self.status.dismiss();
                            }
                        }
                    }
                }
            });
        });

        let mut editor_action = EditorAction::None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(PADDING);
            editor_action = self.editor.ui(ui, self.controller.global_pin());
        });

        self.handle_list_action(list_action);
        self.handle_editor_action(editor_action);

        if self.show_close_prompt {
            self.close_prompt(ctx);
        }

        self.board.show(ctx);
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        // Panel viewports are transparent; the settings window paints its own background
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if !self.quitting.get() {
            self.controller.shutdown();
        }
        info!("Settings window exiting");
    }
}

fn show_settings(ctx: &egui::Context) {
    ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
    ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(false));
    ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
}

/// Turn SIGINT/SIGTERM into a tray Quit so the collection is saved first
#[cfg(unix)]
fn spawn_signal_forwarder(sender: CommandSender) -> Result<()> {
    use anyhow::Context;
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM]).context("Failed to register signals")?;
    std::thread::Builder::new()
        .name("signals".to_string())
        .spawn(move || {
            for signal in signals.forever() {
                info!(signal, "Received termination signal");
                sender.send(TrayCommand::Quit);
            }
        })
        .context("Failed to spawn signal thread")?;
    Ok(())
}

pub fn run_gui(store: JsonConfigStore) -> Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_title("Web Widgets"),
        ..Default::default()
    };

    eframe::run_native(
        "Web Widgets",
        options,
        Box::new(|cc| Ok(Box::new(ManagerApp::new(cc, store)))),
    )
    .map_err(|err| anyhow!("Failed to launch settings window: {err}"))
}
