//! First-run welcome panel.

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use markvault_core::{
    PanelArgs, PanelDescriptor, PanelEvent, PanelHooks, PanelId, PanelModule, PanelView,
    TransitionHandle,
};
use markvault_theme::Theme;
use markvault_ui::max_line_width;

use crate::request_transition;

const WELCOME_TEXT: &str = "Welcome to Markvault!\n\
                            \n\
                            Your bookmarks live in a private vault,\n\
                            protected by a master password that never\n\
                            leaves this machine.";

struct State {
    handle: Option<TransitionHandle>,
}

/// Build the get-started panel.
pub fn module() -> PanelModule {
    let state = Rc::new(RefCell::new(State { handle: None }));

    let transition_state = Rc::clone(&state);
    let hooks = PanelHooks {
        on_activate: None,
        on_deactivate: None,
        on_transition: Some(Box::new(move |handle| {
            transition_state.borrow_mut().handle = Some(handle);
        })),
    };

    PanelModule {
        descriptor: PanelDescriptor::with_hooks(PanelId::GetStarted, "Get started", hooks),
        view: Box::new(GetStartedView { state }),
    }
}

struct GetStartedView {
    state: Rc<RefCell<State>>,
}

impl PanelView for GetStartedView {
    fn id(&self) -> PanelId {
        PanelId::GetStarted
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let lines: Vec<&str> = WELCOME_TEXT.lines().collect();
        let height = lines.len() as u16 + 2;
        let top = area.y + area.height.saturating_sub(height) / 2;

        // Center the text as a block, keeping the lines left-aligned
        // against each other.
        let width = max_line_width(WELCOME_TEXT).min(area.width);
        let x = area.x + area.width.saturating_sub(width) / 2;
        for (i, line) in lines.iter().enumerate() {
            let y = top + i as u16;
            if y >= area.bottom() {
                break;
            }
            // set_string clips at the buffer edge, not the panel edge
            let clipped: String = line.chars().take(width as usize).collect();
            buf.set_string(x, y, clipped, Style::default().fg(theme.fg));
        }

        let hint_y = top + lines.len() as u16 + 1;
        if hint_y < area.bottom() {
            let hint = Line::from(vec![
                Span::styled("Enter", Style::default().fg(theme.fg).add_modifier(Modifier::BOLD)),
                Span::styled(" to continue", Style::default().fg(theme.disabled)),
            ]);
            let hint_area = Rect::new(area.x, hint_y, area.width, 1);
            Paragraph::new(hint)
                .alignment(Alignment::Center)
                .render(hint_area, buf);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<PanelEvent> {
        let mut events = Vec::new();
        match key.code {
            KeyCode::Enter => {
                let handle = self.state.borrow().handle.clone();
                request_transition(handle, PanelId::MainMenu, PanelArgs::none(), &mut events);
            }
            KeyCode::Esc | KeyCode::Char('q') => events.push(PanelEvent::Quit),
            _ => {}
        }
        events
    }
}
