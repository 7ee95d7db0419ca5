//! Widget configuration records and their durable storage
//!
//! - **widget**: the persisted WidgetConfig record and the editor's draft
//! - **store**: ConfigStore trait plus the JSON file implementation

pub mod store;
pub mod widget;

pub use store::{ConfigStore, JsonConfigStore};
pub use widget::{WidgetConfig, WidgetDraft};
