//! Slot → live panel association
//!
//! Each collection index owns zero or one live panel. Registering a panel in a
//! slot that is still live closes the previous one first.

use tracing::{debug, info, warn};

use super::Panel;

#[derive(Default)]
pub struct PanelRegistry {
    slots: Vec<Option<Box<dyn Panel>>>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `panel` as the live panel for `slot`
    pub fn register(&mut self, slot: usize, panel: Box<dyn Panel>) {
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }
        if let Some(mut previous) = self.slots[slot].take() {
            warn!(slot, "Slot already had a live panel, closing it");
            previous.close();
        }
        self.slots[slot] = Some(panel);
        debug!(slot, "Registered panel");
    }

    pub fn get(&self, slot: usize) -> Option<&dyn Panel> {
        self.slots.get(slot).and_then(|s| s.as_deref())
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut (dyn Panel + 'static)> {
        self.slots.get_mut(slot).and_then(|s| s.as_deref_mut())
    }

    pub fn is_live(&self, slot: usize) -> bool {
        self.get(slot).is_some()
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Live panels with their slots, in slot order
    pub fn live_mut(&mut self) -> impl Iterator<Item = (usize, &mut Box<dyn Panel>)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(slot, entry)| entry.as_mut().map(|panel| (slot, panel)))
    }

    /// Close every live panel and clear the registry, returning how many closed
    pub fn close_all(&mut self) -> usize {
        let mut closed = 0;
        for mut panel in self.slots.drain(..).flatten() {
            panel.close();
            closed += 1;
        }
        if closed > 0 {
            info!(count = closed, "Closed all panels");
        }
        closed
    }

    /// Forget panels that closed themselves, returning their slots
    pub fn reap_closed(&mut self) -> Vec<usize> {
        let mut reaped = Vec::new();
        for (slot, entry) in self.slots.iter_mut().enumerate() {
            if entry.as_ref().is_some_and(|panel| !panel.is_open()) {
                *entry = None;
                reaped.push(slot);
            }
        }
        if !reaped.is_empty() {
            debug!(slots = ?reaped, "Reaped closed panels");
        }
        reaped
    }
}
