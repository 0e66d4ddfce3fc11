//! Color themes for the markvault popup.
//!
//! The popup draws a handful of surfaces (header bar, panel body, status
//! line, form fields), so the palette stays small and semantic.

use ratatui::style::Color;

/// Popup theme with semantic color assignments.
///
/// - 2 base colors (bg, fg)
/// - 2 header colors (header_bg, header_fg)
/// - 2 selection colors (selected_bg, selected_fg)
/// - 1 disabled color
/// - 2 semantic colors (success, error)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    /// Theme name for display
    pub name: &'static str,

    /// Panel body background
    pub bg: Color,
    /// Main text
    pub fg: Color,

    /// Header bar background
    pub header_bg: Color,
    /// Header bar text
    pub header_fg: Color,

    /// Selected menu item background
    pub selected_bg: Color,
    /// Selected menu item text
    pub selected_fg: Color,

    /// Secondary text, separators, key hints
    pub disabled: Color,

    /// Success notices
    pub success: Color,
    /// Error notices and the error panel
    pub error: Color,
}

impl Theme {
    /// Built-in dark theme.
    pub fn midnight() -> Self {
        Self {
            name: "midnight",
            bg: Color::Black,
            fg: Color::White,
            header_bg: Color::DarkGray,
            header_fg: Color::Cyan,
            selected_bg: Color::Blue,
            selected_fg: Color::White,
            disabled: Color::Gray,
            success: Color::Green,
            error: Color::Red,
        }
    }

    /// Built-in light theme.
    pub fn paper() -> Self {
        Self {
            name: "paper",
            bg: Color::White,
            fg: Color::Black,
            header_bg: Color::Gray,
            header_fg: Color::Blue,
            selected_bg: Color::Blue,
            selected_fg: Color::White,
            disabled: Color::DarkGray,
            success: Color::Green,
            error: Color::Red,
        }
    }

    /// Look up a built-in theme by name, falling back to the default
    /// theme for unknown names.
    pub fn get_by_name(name: &str) -> Self {
        match name {
            "paper" => Self::paper(),
            _ => Self::midnight(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::midnight()
    }
}
