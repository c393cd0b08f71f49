//! Application State Module
//!
//! Headless state behind the UI: the form controller, the dependent
//! selection chain, and the result presenter. Nothing here touches egui.

pub mod chain;
pub mod form;
pub mod presenter;

pub use chain::{AreaCommit, AreaFetch, ListStatus, OptionList, SelectionChain};
pub use form::{FilterForm, FormEffect, FormEvent, IncompleteForm};
pub use presenter::{select_view, CalculationState, ResultView};
