//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (model runtime, PDF library).

mod regressor;
mod report_renderer;

pub use regressor::Regressor;
pub use report_renderer::{ReportError, ReportRenderer};
