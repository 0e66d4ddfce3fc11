//! Core types and traits for markvault panels.
//!
//! This crate provides the foundational abstractions for the popup:
//! panel identifiers and descriptors, lifecycle hooks, the element store
//! the panels project their visibility into, and the typed errors the
//! panel machinery reports.

pub mod dom;
pub mod error;
pub mod event;
pub mod panel;

pub use dom::{Dom, Element, ElementId, CLASS_DEACTIVATED, HEADER_ANCHOR};
pub use error::{CoreError, SetupError};
pub use event::{Event, EventHandler, PanelEvent};
pub use panel::{
    ActivateHook, DeactivateHook, ErrorDetails, PanelArgs, PanelDescriptor, PanelHooks, PanelId,
    PanelModule, PanelView, SetupProbe, TransitionHandle, TransitionHook, Transitioner,
};

// Re-export theme for convenience
pub use markvault_theme::Theme;
