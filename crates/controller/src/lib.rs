//! Panel registry, transition engine and bootstrap for markvault.
//!
//! This crate owns "which panel is showing": the [`Registry`] of panel
//! descriptors, the [`Engine`] that sequences deactivate-then-activate,
//! and the [`bootstrap`] pass that binds markup anchors, hands panels
//! their transition handles and picks the first panel from the vault's
//! setup state.

mod engine;
mod registry;

pub mod bootstrap;

pub use engine::Engine;
pub use registry::{PanelEntry, Registry};
