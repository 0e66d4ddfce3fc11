//! Success panel, shown after an operation completes.

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

use crate::request_transition;

/// Payload naming what just succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessNotice {
    pub message: String,
}

impl SuccessNotice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

struct State {
    handle: Option<TransitionHandle>,
    message: Option<String>,
}

/// Build the success panel.
pub fn module() -> PanelModule {
    let state = Rc::new(RefCell::new(State {
        handle: None,
        message: None,
    }));

    let activate_state = Rc::clone(&state);
    let transition_state = Rc::clone(&state);
    let hooks = PanelHooks {
        on_activate: Some(Box::new(move |args: PanelArgs| {
            activate_state.borrow_mut().message =
                args.downcast::<SuccessNotice>().map(|notice| notice.message);
        })),
        on_deactivate: None,
        on_transition: Some(Box::new(move |handle| {
            transition_state.borrow_mut().handle = Some(handle);
        })),
    };

    PanelModule {
        descriptor: PanelDescriptor::with_hooks(PanelId::Success, "Success", hooks),
        view: Box::new(SuccessView { state }),
    }
}

struct SuccessView {
    state: Rc<RefCell<State>>,
}

impl PanelView for SuccessView {
    fn id(&self) -> PanelId {
        PanelId::Success
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let st = self.state.borrow();
        let message = st.message.as_deref().unwrap_or("Done");

        let top = area.y + area.height.saturating_sub(4) / 2;
        if top < area.bottom() {
            Paragraph::new(Line::from(Span::styled(
                format!("✓ {message}"),
                Style::default()
                    .fg(theme.success)
                    .add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .render(Rect::new(area.x, top, area.width, 1), buf);
        }

        let hint_y = top + 2;
        if hint_y < area.bottom() {
            Paragraph::new(Line::from(Span::styled(
                "Enter back to the menu",
                Style::default().fg(theme.disabled),
            )))
            .alignment(Alignment::Center)
            .render(Rect::new(area.x, hint_y, area.width, 1), buf);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<PanelEvent> {
        let mut events = Vec::new();
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                let handle = self.state.borrow().handle.clone();
                request_transition(handle, PanelId::MainMenu, PanelArgs::none(), &mut events);
            }
            KeyCode::Char('q') => events.push(PanelEvent::Quit),
            _ => {}
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use markvault_core::{CoreError, Transitioner};
    use ratatui::buffer::Buffer;

    struct Recorder(RefCell<Vec<Option<PanelId>>>);

    impl Transitioner for Recorder {
        fn transition(&self, target: Option<PanelId>, _args: PanelArgs) -> Result<(), CoreError> {
            self.0.borrow_mut().push(target);
            Ok(())
        }
    }

    #[test]
    fn activation_payload_is_shown() {
        let mut module = module();
        let hook = module.descriptor.hooks.on_activate.as_mut().unwrap();
        hook(PanelArgs::new(SuccessNotice::new("Vault locked")));

        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        module.view.render(area, &mut buf, &Theme::default());

        let rows: Vec<String> = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect()
            })
            .collect();
        assert!(rows.iter().any(|row| row.contains("✓ Vault locked")));
    }

    #[test]
    fn enter_goes_back_to_the_menu() {
        let mut module = module();
        let recorder = Rc::new(Recorder(RefCell::new(vec![])));
        let hook = module.descriptor.hooks.on_transition.take().unwrap();
        hook(recorder.clone());

        module
            .view
            .handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(*recorder.0.borrow(), vec![Some(PanelId::MainMenu)]);
    }

    #[test]
    fn missing_payload_falls_back_to_a_generic_message() {
        let mut module = module();
        let hook = module.descriptor.hooks.on_activate.as_mut().unwrap();
        hook(PanelArgs::none());

        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        module.view.render(area, &mut buf, &Theme::default());

        let rows: Vec<String> = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect()
            })
            .collect();
        assert!(rows.iter().any(|row| row.contains("✓ Done")));
    }
}
