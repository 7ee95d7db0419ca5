//! Settings window, widget panels and their egui plumbing

mod components;
mod constants;
mod manager;
mod shell;
mod status;
mod surface;

pub use manager::run_gui;
