//! Yes/No confirmation panel.
//!
//! The caller transitions here with a [`ConfirmRequest`] payload naming the
//! question, the action to run on confirmation and the panel to return to on
//! cancel. The confirm action owns its follow-up: it decides where to
//! transition next, so destructive operations can route to the success or
//! error panel themselves.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use markvault_core::{
    PanelArgs, PanelDescriptor, PanelEvent, PanelHooks, PanelId, PanelModule, PanelView,
    TransitionHandle,
};
use markvault_theme::Theme;

use crate::request_transition;

/// What the confirmation dialog asks and does.
pub struct ConfirmRequest {
    /// Question shown in the panel body.
    pub message: String,
    /// Panel to return to when the user declines.
    pub cancel_target: PanelId,
    /// Runs when the user confirms.
    pub on_confirm: Box<dyn FnOnce()>,
}

impl ConfirmRequest {
    pub fn new(
        message: impl Into<String>,
        cancel_target: PanelId,
        on_confirm: impl FnOnce() + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            cancel_target,
            on_confirm: Box::new(on_confirm),
        }
    }
}

impl fmt::Debug for ConfirmRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmRequest")
            .field("message", &self.message)
            .field("cancel_target", &self.cancel_target)
            .finish_non_exhaustive()
    }
}

struct State {
    handle: Option<TransitionHandle>,
    request: Option<ConfirmRequest>,
    selected: bool, // true = Yes, false = No
}

/// Build the confirmation dialog panel.
pub fn module() -> PanelModule {
    let state = Rc::new(RefCell::new(State {
        handle: None,
        request: None,
        selected: true,
    }));

    let activate_state = Rc::clone(&state);
    let transition_state = Rc::clone(&state);
    let hooks = PanelHooks {
        on_activate: Some(Box::new(move |args: PanelArgs| {
            let mut st = activate_state.borrow_mut();
            st.selected = true;
            st.request = args.downcast::<ConfirmRequest>();
            if st.request.is_none() {
                markvault_logger::warn("confirmation dialog activated without a request");
            }
        })),
        on_deactivate: None,
        on_transition: Some(Box::new(move |handle| {
            transition_state.borrow_mut().handle = Some(handle);
        })),
    };

    PanelModule {
        descriptor: PanelDescriptor::with_hooks(PanelId::ConfirmationDialog, "Confirm", hooks),
        view: Box::new(ConfirmationDialogView { state }),
    }
}

struct ConfirmationDialogView {
    state: Rc<RefCell<State>>,
}

impl ConfirmationDialogView {
    fn confirm(&mut self) {
        // Take the request out before running it: the confirm action
        // transitions away, which re-enters this panel's hooks.
        let request = self.state.borrow_mut().request.take();
        if let Some(request) = request {
            (request.on_confirm)();
        }
    }

    fn cancel(&mut self, events: &mut Vec<PanelEvent>) {
        let (handle, target) = {
            let mut st = self.state.borrow_mut();
            let target = st
                .request
                .take()
                .map(|request| request.cancel_target)
                .unwrap_or(PanelId::MainMenu);
            (st.handle.clone(), target)
        };
        request_transition(handle, target, PanelArgs::none(), events);
    }
}

impl PanelView for ConfirmationDialogView {
    fn id(&self) -> PanelId {
        PanelId::ConfirmationDialog
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let st = self.state.borrow();
        let message = st
            .request
            .as_ref()
            .map(|request| request.message.as_str())
            .unwrap_or("Nothing to confirm");
        let message_lines = message.lines().count().max(1) as u16;

        let chunks = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(message_lines),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

        Paragraph::new(message.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.fg))
            .render(chunks[1], buf);

        let yes_style = if st.selected {
            Style::default()
                .fg(theme.selected_fg)
                .bg(theme.selected_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.fg)
        };
        let no_style = if !st.selected {
            Style::default()
                .fg(theme.selected_fg)
                .bg(theme.selected_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.fg)
        };

        let buttons = Line::from(vec![
            Span::styled("[ Yes ]", yes_style),
            Span::raw("    "),
            Span::styled("[ No ]", no_style),
        ]);
        Paragraph::new(buttons)
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<PanelEvent> {
        let mut events = Vec::new();
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                let mut st = self.state.borrow_mut();
                st.selected = !st.selected;
            }
            KeyCode::Enter => {
                let selected = self.state.borrow().selected;
                if selected {
                    self.confirm();
                } else {
                    self.cancel(&mut events);
                }
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.cancel(&mut events),
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
    use std::cell::Cell;

    struct Recorder(RefCell<Vec<Option<PanelId>>>);

    impl Transitioner for Recorder {
        fn transition(&self, target: Option<PanelId>, _args: PanelArgs) -> Result<(), CoreError> {
            self.0.borrow_mut().push(target);
            Ok(())
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn wired_module() -> (PanelModule, Rc<Recorder>) {
        let mut module = module();
        let recorder = Rc::new(Recorder(RefCell::new(vec![])));
        let hook = module.descriptor.hooks.on_transition.take().unwrap();
        hook(recorder.clone());
        (module, recorder)
    }

    fn activate_with(module: &mut PanelModule, request: ConfirmRequest) {
        let hook = module.descriptor.hooks.on_activate.as_mut().unwrap();
        hook(PanelArgs::new(request));
    }

    #[test]
    fn enter_on_default_selection_runs_confirm_action() {
        let (mut module, recorder) = wired_module();
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        activate_with(
            &mut module,
            ConfirmRequest::new("Lock the vault now?", PanelId::MainMenu, move || {
                flag.set(true)
            }),
        );

        let events = module.view.handle_key(press(KeyCode::Enter));
        assert!(events.is_empty());
        assert!(ran.get());
        assert!(recorder.0.borrow().is_empty());
    }

    #[test]
    fn declining_returns_to_cancel_target() {
        let (mut module, recorder) = wired_module();
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        activate_with(
            &mut module,
            ConfirmRequest::new("Lock the vault now?", PanelId::MainMenu, move || {
                flag.set(true)
            }),
        );

        module.view.handle_key(press(KeyCode::Char('n')));
        assert!(!ran.get());
        assert_eq!(*recorder.0.borrow(), vec![Some(PanelId::MainMenu)]);
    }

    #[test]
    fn tab_flips_selection_before_enter() {
        let (mut module, recorder) = wired_module();
        activate_with(
            &mut module,
            ConfirmRequest::new("Sure?", PanelId::MainMenu, || {}),
        );

        module.view.handle_key(press(KeyCode::Tab));
        module.view.handle_key(press(KeyCode::Enter));
        assert_eq!(*recorder.0.borrow(), vec![Some(PanelId::MainMenu)]);
    }

    #[test]
    fn escape_cancels() {
        let (mut module, recorder) = wired_module();
        activate_with(
            &mut module,
            ConfirmRequest::new("Sure?", PanelId::GetStarted, || {}),
        );

        module.view.handle_key(press(KeyCode::Esc));
        assert_eq!(*recorder.0.borrow(), vec![Some(PanelId::GetStarted)]);
    }

    #[test]
    fn missing_request_falls_back_to_main_menu() {
        let (mut module, recorder) = wired_module();
        let hook = module.descriptor.hooks.on_activate.as_mut().unwrap();
        hook(PanelArgs::none());

        module.view.handle_key(press(KeyCode::Esc));
        assert_eq!(*recorder.0.borrow(), vec![Some(PanelId::MainMenu)]);
    }
}
