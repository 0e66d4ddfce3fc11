//! The popup panels.
//!
//! Each module builds one [`PanelModule`]: a descriptor carrying the panel's
//! title and hooks, plus the view that renders it and reacts to keys while it
//! is on screen. Panel state lives in an `Rc<RefCell<..>>` shared between the
//! hook closures and the view, so an `on_activate` payload lands in the same
//! place the next `render` reads from.

use markvault_bookmarks::Vault;
use markvault_core::{PanelArgs, PanelEvent, PanelId, PanelModule, TransitionHandle};

pub mod authentication;
pub mod confirmation_dialog;
pub mod error;
pub mod get_started;
pub mod main_menu;
pub mod on_hold;
pub mod password_setup;
pub mod success;

pub use confirmation_dialog::ConfirmRequest;
pub use on_hold::HoldNotice;
pub use success::SuccessNotice;

/// Build every panel in the popup, in registration order.
///
/// The blank placeholder panel is not included here; the application
/// registers it separately since it has no view or hooks of its own.
pub fn all(vault: Vault) -> Vec<PanelModule> {
    vec![
        authentication::module(vault.clone()),
        confirmation_dialog::module(),
        error::module(),
        get_started::module(),
        main_menu::module(vault.clone()),
        on_hold::module(vault.clone()),
        password_setup::module(vault),
        success::module(),
    ]
}

/// Ask the controller to switch panels, reporting failures as a status
/// message instead of propagating them.
///
/// Callers must release any borrow of their panel state before calling this:
/// the transition re-enters this panel's `on_deactivate` hook.
pub(crate) fn request_transition(
    handle: Option<TransitionHandle>,
    target: PanelId,
    args: PanelArgs,
    events: &mut Vec<PanelEvent>,
) {
    let Some(handle) = handle else {
        events.push(PanelEvent::error("Panel controller is not ready"));
        return;
    };
    if let Err(err) = handle.transition(Some(target), args) {
        markvault_logger::error(format!("panel transition failed: {err}"));
        events.push(PanelEvent::error(err.to_string()));
    }
}
