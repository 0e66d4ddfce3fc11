//! Event types for the markvault popup.
//!
//! This module provides:
//! - `Event` - Application-level events (keyboard, resize, tick)
//! - `EventHandler` - Polling for terminal events
//! - `PanelEvent` - Events emitted by panel views to the application

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Application event
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard event
    Key(KeyEvent),
    /// Terminal resize event
    Resize(u16, u16),
    /// Tick event (for countdowns and periodic updates)
    Tick,
}

/// Event handler for polling terminal events
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Create new event handler with specified tick rate
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Wait for next event
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // With kitty keyboard protocol, we receive Press, Release, and Repeat events.
                // Only handle Press events to avoid duplicate actions.
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                CrosstermEvent::Key(_) => Ok(Event::Tick), // Ignore Release and Repeat
                CrosstermEvent::Resize(width, height) => Ok(Event::Resize(width, height)),
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

/// Events emitted by panel views to communicate with the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// Request application quit
    Quit,

    /// Set status bar message
    SetStatusMessage { message: String, is_error: bool },

    /// Clear status bar message
    ClearStatus,
}

impl PanelEvent {
    /// Convenience constructor for an informational status message.
    pub fn info(message: impl Into<String>) -> Self {
        PanelEvent::SetStatusMessage {
            message: message.into(),
            is_error: false,
        }
    }

    /// Convenience constructor for an error status message.
    pub fn error(message: impl Into<String>) -> Self {
        PanelEvent::SetStatusMessage {
            message: message.into(),
            is_error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_constructors() {
        assert_eq!(
            PanelEvent::info("saved"),
            PanelEvent::SetStatusMessage {
                message: "saved".to_string(),
                is_error: false,
            }
        );
        assert_eq!(
            PanelEvent::error("wrong password"),
            PanelEvent::SetStatusMessage {
                message: "wrong password".to_string(),
                is_error: true,
            }
        );
    }
}
