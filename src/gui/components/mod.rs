pub mod widget_editor;
pub mod widget_list;

pub use widget_editor::{EditorAction, WidgetEditor};
pub use widget_list::{ListAction, WidgetList};
