//! Live panel capability
//!
//! A panel is the on-screen surface built from one WidgetConfig. The core only
//! talks to panels through these traits so any toolkit can supply them.

pub mod registry;
#[cfg(test)]
pub(crate) mod testing;

pub use registry::PanelRegistry;

use anyhow::Result;

use crate::config::WidgetConfig;

/// A live, borderless, translucent surface showing one URL
pub trait Panel {
    /// Current "always on top" flag
    fn is_pinned(&self) -> bool;

    /// Change the "always on top" flag without re-applying it
    fn set_pinned(&mut self, pinned: bool);

    /// Re-apply the window stacking for the current pin flag.
    /// Position and size are kept.
    fn restack(&mut self);

    /// False once the panel has been closed by anyone
    fn is_open(&self) -> bool;

    /// Close the surface; calling it again is a no-op
    fn close(&mut self);
}

/// Builds panels from configuration records
pub trait PanelFactory {
    /// Construct and show a panel for `config` in `slot`
    fn create(&mut self, slot: usize, config: &WidgetConfig) -> Result<Box<dyn Panel>>;
}
