//! Reusable Widgets
//!
//! Widgets do NOT see application state. They take data as input and
//! return changes via return values (not callbacks).

pub mod searchable_dropdown;

pub use searchable_dropdown::{
    filter_options, scroll_into_view, searchable_dropdown, DropdownInput, DropdownResponse,
    DropdownState, NavKey,
};
