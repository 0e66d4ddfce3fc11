//! Application orchestrator for the markvault popup.
//!
//! Ties the pieces together: the panel engine and its bootstrap, the
//! panel views, the event loop and the popup chrome. The binary only
//! sets up the terminal and hands control to [`App::run`].

pub mod app;

pub use app::App;
