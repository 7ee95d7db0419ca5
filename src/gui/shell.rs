//! Settings window as the process host

use std::cell::Cell;
use std::rc::Rc;
use tracing::info;

use crate::lifecycle::HostShell;

pub struct EguiShell {
    ctx: egui::Context,
    quitting: Rc<Cell<bool>>,
    tray_available: bool,
}

impl EguiShell {
    pub fn new(ctx: egui::Context, quitting: Rc<Cell<bool>>) -> Self {
        Self {
            ctx,
            quitting,
            tray_available: false,
        }
    }

    pub fn set_tray_available(&mut self, available: bool) {
        self.tray_available = available;
    }
}

impl HostShell for EguiShell {
    fn withdraw(&mut self) {
        // Without a tray there is nothing to bring a hidden window back
        let command = if self.tray_available {
            egui::ViewportCommand::Visible(false)
        } else {
            egui::ViewportCommand::Minimized(true)
        };
        info!(tray = self.tray_available, "Withdrawing settings window");
        self.ctx.send_viewport_cmd_to(egui::ViewportId::ROOT, command);
    }

    fn terminate(&mut self) {
        self.quitting.set(true);
        self.ctx
            .send_viewport_cmd_to(egui::ViewportId::ROOT, egui::ViewportCommand::Close);
    }
}
