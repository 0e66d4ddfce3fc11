//! Popup chrome rendering.
//!
//! The popup draws as a centered box: a one-line header bar, the body
//! of the active panel, and a one-line status bar at the bottom. The
//! panel body itself is rendered by the active panel's view; this
//! module only provides the chrome around it.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph, Widget},
};

use markvault_theme::Theme;

use crate::widgets::centered_rect;

/// Rectangles of one popup draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupLayout {
    /// The whole popup box, border included.
    pub popup: Rect,
    /// One-line header bar.
    pub header: Rect,
    /// Panel body area.
    pub body: Rect,
    /// One-line status bar.
    pub status: Rect,
}

impl PopupLayout {
    /// Center a `width` x `height` popup in `frame_area`, clamped to
    /// the terminal size.
    pub fn new(frame_area: Rect, width: u16, height: u16) -> Self {
        let popup = centered_rect(
            width.min(frame_area.width),
            height.min(frame_area.height),
            frame_area,
        );
        let inner = Block::default().borders(Borders::ALL).inner(popup);
        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

        Self {
            popup,
            header: rows[0],
            body: rows[1],
            status: rows[2],
        }
    }
}

/// Fill the whole frame behind the popup.
pub fn render_backdrop(frame_area: Rect, buf: &mut Buffer, theme: &Theme) {
    Block::default()
        .style(Style::default().bg(theme.bg).fg(theme.disabled))
        .render(frame_area, buf);
}

/// Draw the popup border and the header bar.
pub fn render_chrome(layout: &PopupLayout, buf: &mut Buffer, theme: &Theme, header_text: &str) {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.disabled))
        .style(Style::default().bg(theme.bg).fg(theme.fg))
        .render(layout.popup, buf);

    Paragraph::new(header_text.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().bg(theme.header_bg).fg(theme.header_fg))
        .render(layout.header, buf);
}

/// Draw the status bar message.
pub fn render_status(area: Rect, buf: &mut Buffer, theme: &Theme, message: &str, is_error: bool) {
    let color = if is_error { theme.error } else { theme.success };
    Paragraph::new(message.to_string())
        .style(Style::default().bg(theme.bg).fg(color))
        .render(area, buf);
}

/// Fallback drawn when the terminal is smaller than the popup minimum.
pub fn render_too_small(frame_area: Rect, buf: &mut Buffer, theme: &Theme) {
    Paragraph::new("Terminal too small")
        .alignment(Alignment::Center)
        .style(Style::default().bg(theme.bg).fg(theme.error))
        .render(frame_area, buf);
}
