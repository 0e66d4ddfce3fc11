//! One-time popup bootstrap.
//!
//! Runs once per popup open: binds the header and every panel element,
//! hands each panel its transition handle, then asks the vault whether
//! first-run setup is still needed and shows the matching first panel.
//! Only the vault query is recoverable; a binding failure means the
//! markup and the registry disagree and is surfaced to the caller.

use markvault_core::{CoreError, ErrorDetails, PanelArgs, PanelId, SetupProbe};

use crate::engine::Engine;

/// Title forwarded to the error panel when the vault query fails.
pub const INIT_ERROR_TITLE: &str = "Error during browser action initialization";

/// Bind anchors, wire transition handles and show the first panel.
pub fn initialize(engine: &Engine, probe: &dyn SetupProbe) -> Result<(), CoreError> {
    engine.bind_header()?;
    engine.bind_panels()?;

    match probe.needs_setup() {
        Ok(true) => {
            markvault_logger::info("vault needs setup, showing get_started");
            engine.transition(Some(PanelId::GetStarted), PanelArgs::none())
        }
        Ok(false) => {
            markvault_logger::info("vault is set up, showing main_menu");
            engine.transition(Some(PanelId::MainMenu), PanelArgs::none())
        }
        Err(e) => {
            markvault_logger::error(format!("setup check failed: {}", e.message));
            engine.transition(
                Some(PanelId::Error),
                PanelArgs::new(ErrorDetails::new(INIT_ERROR_TITLE, e.message)),
            )
        }
    }
}
