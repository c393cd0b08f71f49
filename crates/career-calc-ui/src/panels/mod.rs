//! UI Panels
//!
//! Panels render from data extracted before the frame and report what the
//! user did through an action struct. They do NOT touch the app directly.

mod filters;
mod results;

pub use filters::{FilterPanel, FilterPanelAction, FilterPanelData};
pub use results::{results_panel, ResultsPanelAction, ResultsPanelData};
