//! Reusable input and layout helpers.

use ratatui::layout::{Constraint, Direction as LayoutDirection, Layout, Rect};
use unicode_width::UnicodeWidthStr;

/// Text input handler with cursor management
///
/// Handles character insertion, deletion, and cursor navigation for
/// form fields. It properly handles UTF-8 multi-byte characters by
/// tracking cursor position in characters (not bytes).
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    input: String,
    cursor_pos: usize, // Position in characters, not bytes
}

impl TextInput {
    /// Create a new text input handler with empty input
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a text input handler with default value
    pub fn with_text(text: impl Into<String>) -> Self {
        let input = text.into();
        let cursor_pos = input.chars().count();
        Self { input, cursor_pos }
    }

    /// Get the current input text
    pub fn text(&self) -> &str {
        &self.input
    }

    /// Get the cursor position (in characters)
    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    /// Masked rendering for password fields, one dot per character.
    pub fn masked(&self) -> String {
        "•".repeat(self.input.chars().count())
    }

    /// Clear all input
    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor_pos = 0;
    }

    /// Check if input is empty
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Convert cursor position (in characters) to byte index
    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor_pos)
            .map(|(idx, _)| idx)
            .unwrap_or(self.input.len())
    }

    /// Insert a character at the cursor position
    pub fn insert(&mut self, c: char) {
        let byte_idx = self.byte_index();
        self.input.insert(byte_idx, c);
        self.cursor_pos += 1;
    }

    /// Delete character before cursor (backspace)
    pub fn backspace(&mut self) -> bool {
        if self.cursor_pos > 0 {
            self.cursor_pos -= 1;
            let byte_idx = self.byte_index();
            self.input.remove(byte_idx);
            true
        } else {
            false
        }
    }

    /// Delete character at cursor (delete key)
    pub fn delete(&mut self) -> bool {
        let char_count = self.input.chars().count();
        if self.cursor_pos < char_count {
            let byte_idx = self.byte_index();
            self.input.remove(byte_idx);
            true
        } else {
            false
        }
    }

    /// Move cursor left
    pub fn move_left(&mut self) -> bool {
        if self.cursor_pos > 0 {
            self.cursor_pos -= 1;
            true
        } else {
            false
        }
    }

    /// Move cursor right
    pub fn move_right(&mut self) -> bool {
        let char_count = self.input.chars().count();
        if self.cursor_pos < char_count {
            self.cursor_pos += 1;
            true
        } else {
            false
        }
    }

    /// Move cursor to start (Home)
    pub fn move_home(&mut self) {
        self.cursor_pos = 0;
    }

    /// Move cursor to end (End)
    pub fn move_end(&mut self) {
        self.cursor_pos = self.input.chars().count();
    }
}

/// Create a centered rectangle with specified width and height within a container
///
/// Used to center the popup box on screen. It calculates horizontal and
/// vertical margins and uses ratatui's Layout system to create a
/// properly centered rectangle.
pub fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    // Calculate margins
    let horizontal_margin = r.width.saturating_sub(width) / 2;
    let vertical_margin = r.height.saturating_sub(height) / 2;

    let vertical_layout = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Length(vertical_margin),
            Constraint::Length(height),
            Constraint::Length(vertical_margin),
        ])
        .split(r);

    Layout::default()
        .direction(LayoutDirection::Horizontal)
        .constraints([
            Constraint::Length(horizontal_margin),
            Constraint::Length(width),
            Constraint::Length(horizontal_margin),
        ])
        .split(vertical_layout[1])[1]
}

/// Create a rect with margin.
pub fn with_margin(rect: Rect, margin: u16) -> Rect {
    Rect::new(
        rect.x + margin,
        rect.y + margin,
        rect.width.saturating_sub(margin * 2),
        rect.height.saturating_sub(margin * 2),
    )
}

/// Calculate maximum display width of the lines in a multiline text.
pub fn max_line_width(text: &str) -> u16 {
    text.lines().map(|line| line.width()).max().unwrap_or(0) as u16
}
