//! Shared API Types for the Career Calculator
//!
//! Every type that crosses the HTTP boundary between the calculation
//! service and the UI lives here, together with the pure helpers the UI
//! needs to present them.
//!
//! ```text
//! ┌──────────────────┐         ┌──────────────────┐
//! │  Calculation API │  JSON   │  egui UI         │
//! │  (opaque)        │ ◄─────► │  (native / WASM) │
//! └──────────────────┘         └──────────────────┘
//! ```

pub mod filters;
pub mod format;
pub mod results;
pub mod share;
pub mod states;

pub use filters::*;
pub use results::*;
