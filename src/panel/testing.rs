//! Recording panel doubles for unit tests

use anyhow::{Result, bail};
use std::cell::RefCell;
use std::rc::Rc;

use super::{Panel, PanelFactory};
use crate::config::WidgetConfig;

#[derive(Debug, Default)]
pub struct FakeState {
    pub pinned: bool,
    pub open: bool,
    pub close_calls: usize,
    pub restack_calls: usize,
    pub url: String,
}

pub type Probe = Rc<RefCell<FakeState>>;

pub struct FakePanel {
    state: Probe,
}

impl FakePanel {
    pub fn new(pinned: bool) -> (Self, Probe) {
        let state = Rc::new(RefCell::new(FakeState {
            pinned,
            open: true,
            ..Default::default()
        }));
        (Self { state: state.clone() }, state)
    }
}

impl Panel for FakePanel {
    fn is_pinned(&self) -> bool {
        self.state.borrow().pinned
    }

    fn set_pinned(&mut self, pinned: bool) {
        self.state.borrow_mut().pinned = pinned;
    }

    fn restack(&mut self) {
        self.state.borrow_mut().restack_calls += 1;
    }

    fn is_open(&self) -> bool {
        self.state.borrow().open
    }

    fn close(&mut self) {
        let mut state = self.state.borrow_mut();
        state.open = false;
        state.close_calls += 1;
    }
}

/// Factory that keeps a probe per created panel and can fail on one slot
#[derive(Default)]
pub struct FakeFactory {
    pub created: Vec<(usize, Probe)>,
    pub fail_on_slot: Option<usize>,
}

impl FakeFactory {
    pub fn probes(&self) -> Vec<Probe> {
        self.created.iter().map(|(_, probe)| probe.clone()).collect()
    }
}

impl PanelFactory for FakeFactory {
    fn create(&mut self, slot: usize, config: &WidgetConfig) -> Result<Box<dyn Panel>> {
        if self.fail_on_slot == Some(slot) {
            bail!("surface refused for slot {slot}");
        }
        let (panel, probe) = FakePanel::new(config.pinned);
        probe.borrow_mut().url = config.url.clone();
        self.created.push((slot, probe));
        Ok(Box::new(panel))
    }
}
