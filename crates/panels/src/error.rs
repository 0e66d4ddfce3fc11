//! Error panel, the dead end of the popup.
//!
//! Shows the [`ErrorDetails`] payload it was activated with. There is no
//! way forward from here other than closing the popup, so this panel has
//! no transition hook at all.

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use markvault_core::{
    ErrorDetails, PanelArgs, PanelDescriptor, PanelEvent, PanelHooks, PanelId, PanelModule,
    PanelView,
};
use markvault_theme::Theme;

struct State {
    details: Option<ErrorDetails>,
}

/// Build the error panel.
pub fn module() -> PanelModule {
    let state = Rc::new(RefCell::new(State { details: None }));

    let activate_state = Rc::clone(&state);
    let hooks = PanelHooks {
        on_activate: Some(Box::new(move |args: PanelArgs| {
            let details = args.downcast::<ErrorDetails>();
            if details.is_none() {
                markvault_logger::warn("error panel activated without details");
            }
            activate_state.borrow_mut().details = details;
        })),
        on_deactivate: None,
        on_transition: None,
    };

    PanelModule {
        descriptor: PanelDescriptor::with_hooks(PanelId::Error, "Error", hooks),
        view: Box::new(ErrorView { state }),
    }
}

struct ErrorView {
    state: Rc<RefCell<State>>,
}

impl PanelView for ErrorView {
    fn id(&self) -> PanelId {
        PanelId::Error
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let st = self.state.borrow();
        let (title, message) = match &st.details {
            Some(details) => (details.title.as_str(), details.message.as_str()),
            None => ("Something went wrong", "No further details are available."),
        };

        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

        Paragraph::new(Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        Paragraph::new(message.to_string())
            .style(Style::default().fg(theme.fg))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[2], buf);

        Paragraph::new(Line::from(Span::styled(
            "q closes the popup",
            Style::default().fg(theme.disabled),
        )))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<PanelEvent> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => vec![PanelEvent::Quit],
            _ => vec![],
        }
    }
}
