//! Global "always on top" broadcast
//!
//! The global pin is the last pin instruction sent to every live panel. A
//! panel may flip its own flag afterwards; the next broadcast overwrites it.
//! Stored widget records are never touched from here.

use tracing::info;

use crate::constants::defaults;
use crate::panel::PanelRegistry;

#[derive(Debug)]
pub struct PinCoordinator {
    global_pin: bool,
}

impl Default for PinCoordinator {
    fn default() -> Self {
        Self::new(defaults::GLOBAL_PIN)
    }
}

impl PinCoordinator {
    pub fn new(global_pin: bool) -> Self {
        Self { global_pin }
    }

    pub fn global_pin(&self) -> bool {
        self.global_pin
    }

    /// Record `enabled` and push it to every live panel unconditionally
    pub fn set_global_pin(&mut self, enabled: bool, registry: &mut PanelRegistry) {
        self.global_pin = enabled;
        let mut updated = 0;
        let mut overridden = 0;
        for (_, panel) in registry.live_mut() {
            if panel.is_pinned() != enabled {
                overridden += 1;
            }
            panel.set_pinned(enabled);
            panel.restack();
            updated += 1;
        }
        info!(enabled, panels = updated, overridden, "Broadcast global pin");
    }

    pub fn toggle_global_pin(&mut self, registry: &mut PanelRegistry) -> bool {
        let enabled = !self.global_pin;
        self.set_global_pin(enabled, registry);
        enabled
    }
}
