//! UI components for markvault.
//!
//! Provides the popup markup, the chrome renderer and reusable input
//! widgets.

pub mod markup;
pub mod render;
pub mod widgets;

pub use markup::popup_markup;
pub use render::{render_backdrop, render_chrome, render_status, render_too_small, PopupLayout};
pub use widgets::{centered_rect, max_line_width, with_margin, TextInput};
