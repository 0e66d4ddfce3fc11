//! Typed errors reported by the panel machinery.

use thiserror::Error;

use crate::panel::PanelId;

/// Errors from registration, binding and transitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Transition target was never registered.
    #[error("unknown panel id: {0}")]
    UnknownPanel(PanelId),

    /// Two descriptors were registered under the same id.
    #[error("duplicate panel id: {0}")]
    DuplicatePanel(PanelId),

    /// The markup has no element with this name.
    #[error("no element named `{0}` in the popup markup")]
    MissingElement(String),

    /// A transition handle outlived its engine.
    #[error("panel engine is closed")]
    EngineClosed,
}

/// Failure while querying whether the vault needs first-run setup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SetupError {
    pub message: String,
}

impl SetupError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
