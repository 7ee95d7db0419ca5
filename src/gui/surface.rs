//! Widget panels as borderless egui viewports
//!
//! Each live panel is an immediate viewport drawn by the settings loop. The
//! panel object handed to the core and the board entry share one state cell;
//! the board drops entries once they are closed.

use anyhow::{Result, bail};
use egui::{Color32, Frame, Margin, PointerButton, Sense, ViewportCommand, WindowLevel};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info};

use super::constants::{PANEL_CORNER_RADIUS, PANEL_MARGIN, PANEL_REFRESH_MS};
use crate::config::WidgetConfig;
use crate::panel::{Panel, PanelFactory};
use crate::types::{Dimensions, Position};

#[derive(Debug)]
struct SurfaceState {
    name: String,
    url: String,
    opacity: f32,
    tint: Color32,
    position: Position,
    size: Dimensions,
    initial_pinned: bool,
    pinned: bool,
    /// Level last sent to the window, `None` forces a re-send
    applied_pinned: Option<bool>,
    open: bool,
    viewport_id: egui::ViewportId,
}

type SharedSurface = Rc<RefCell<SurfaceState>>;

impl SurfaceState {
    fn new(config: &WidgetConfig, viewport_id: egui::ViewportId) -> Self {
        let color = config.background_color;
        Self {
            name: config.name.clone(),
            url: config.url.clone(),
            opacity: config.opacity.fraction(),
            tint: Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a),
            position: config.position,
            size: config.size,
            initial_pinned: config.pinned,
            pinned: config.pinned,
            applied_pinned: Some(config.pinned),
            open: true,
            viewport_id,
        }
    }
}

fn window_level(pinned: bool) -> WindowLevel {
    if pinned {
        WindowLevel::AlwaysOnTop
    } else {
        WindowLevel::Normal
    }
}

pub struct EguiPanel {
    state: SharedSurface,
}

impl Panel for EguiPanel {
    fn is_pinned(&self) -> bool {
        self.state.borrow().pinned
    }

    fn set_pinned(&mut self, pinned: bool) {
        self.state.borrow_mut().pinned = pinned;
    }

    fn restack(&mut self) {
        self.state.borrow_mut().applied_pinned = None;
    }

    fn is_open(&self) -> bool {
        self.state.borrow().open
    }

    fn close(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.open {
            debug!(name = %state.name, "Closing widget panel");
            state.open = false;
        }
    }
}

/// Every panel surface currently on screen
#[derive(Clone, Default)]
pub struct SurfaceBoard {
    surfaces: Rc<RefCell<Vec<SharedSurface>>>,
}

impl SurfaceBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&self, surface: SharedSurface) {
        self.surfaces.borrow_mut().push(surface);
    }

    /// Forget closed surfaces; true while any surface is still open
    fn prune(&self) -> bool {
        let mut surfaces = self.surfaces.borrow_mut();
        surfaces.retain(|s| s.borrow().open);
        !surfaces.is_empty()
    }

    /// Draw every open surface; closed ones are forgotten
    pub fn show(&self, ctx: &egui::Context) {
        if !self.prune() {
            return;
        }
        let surfaces: Vec<SharedSurface> = self.surfaces.borrow().clone();
        for surface in &surfaces {
            show_surface(ctx, surface);
        }
        ctx.request_repaint_after(Duration::from_millis(PANEL_REFRESH_MS));
    }
}

fn show_surface(ctx: &egui::Context, surface: &SharedSurface) {
    let (viewport_id, builder) = {
        let state = surface.borrow();
        let builder = egui::ViewportBuilder::default()
            .with_title(state.name.as_str())
            .with_position([state.position.x as f32, state.position.y as f32])
            .with_inner_size([state.size.width as f32, state.size.height as f32])
            .with_decorations(false)
            .with_transparent(true)
            .with_taskbar(false)
            .with_window_level(window_level(state.initial_pinned));
        (state.viewport_id, builder)
    };

    ctx.show_viewport_immediate(viewport_id, builder, |ctx, class| {
        let mut state = surface.borrow_mut();

        if ctx.input(|i| i.viewport().close_requested()) {
            info!(name = %state.name, "Widget panel closed by window manager");
            state.open = false;
            return;
        }

        if state.applied_pinned != Some(state.pinned) {
            ctx.send_viewport_cmd(ViewportCommand::WindowLevel(window_level(state.pinned)));
            state.applied_pinned = Some(state.pinned);
        }

        let frame = Frame::new()
            .fill(state.tint.gamma_multiply(state.opacity))
            .corner_radius(PANEL_CORNER_RADIUS)
            .inner_margin(Margin::same(PANEL_MARGIN));

        if class == egui::ViewportClass::Embedded {
            // Backend without multi-viewport support: fall back to an inner window
            let title = state.name.clone();
            egui::Window::new(title)
                .id(egui::Id::new(viewport_id))
                .frame(frame)
                .show(ctx, |ui| surface_contents(ui, &mut state, false));
        } else {
            egui::CentralPanel::default()
                .frame(frame)
                .show(ctx, |ui| surface_contents(ui, &mut state, true));
        }

        if !state.open {
            ctx.request_repaint_of(egui::ViewportId::ROOT);
        }
    });
}

fn surface_contents(ui: &mut egui::Ui, state: &mut SurfaceState, own_window: bool) {
    ui.set_opacity(state.opacity);

    let response = ui.interact(ui.max_rect(), ui.id().with("surface_drag"), Sense::click_and_drag());
    if own_window && response.drag_started_by(PointerButton::Primary) {
        ui.ctx().send_viewport_cmd(ViewportCommand::StartDrag);
    }

    ui.label(egui::RichText::new(&state.name).strong());
    ui.hyperlink_to(&state.url, &state.url);

    response.context_menu(|ui| {
        let pin_label = if state.pinned { "Unpin" } else { "Pin" };
        if ui.button(pin_label).clicked() {
            state.pinned = !state.pinned;
            info!(name = %state.name, pinned = state.pinned, "Panel pin toggled");
            ui.close();
        }
        if ui.button("Close").clicked() {
            state.open = false;
            ui.close();
        }
    });
}

/// True for `scheme://rest` with a letter-led scheme of `[A-Za-z0-9+.-]`
fn has_url_scheme(url: &str) -> bool {
    let Some((scheme, rest)) = url.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    let leads_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    leads_with_letter
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && !rest.is_empty()
}

pub struct EguiPanelFactory {
    ctx: egui::Context,
    board: SurfaceBoard,
    generation: u64,
}

impl EguiPanelFactory {
    pub fn new(ctx: egui::Context, board: SurfaceBoard) -> Self {
        Self {
            ctx,
            board,
            generation: 0,
        }
    }
}

impl PanelFactory for EguiPanelFactory {
    fn create(&mut self, slot: usize, config: &WidgetConfig) -> Result<Box<dyn Panel>> {
        if !has_url_scheme(&config.url) {
            bail!("'{}' is not an absolute URL", config.url);
        }

        self.generation += 1;
        let viewport_id = egui::ViewportId::from_hash_of(("widget_panel", slot, self.generation));
        let state = Rc::new(RefCell::new(SurfaceState::new(config, viewport_id)));
        self.board.add(Rc::clone(&state));
        self.ctx.request_repaint();

        info!(slot, name = %config.name, url = %config.url, "Opened widget panel");
        Ok(Box::new(EguiPanel { state }))
    }
}
