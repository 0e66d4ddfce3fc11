//! Master password setup panel.
//!
//! Handles both first-run setup and a later password change: when the
//! vault is already initialized a "current password" field appears above
//! the two new-password fields. All inputs are masked and wiped on
//! deactivation, same as the unlock panel.

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use markvault_bookmarks::Vault;
use markvault_core::{
    PanelArgs, PanelDescriptor, PanelEvent, PanelHooks, PanelId, PanelModule, PanelView,
    TransitionHandle,
};
use markvault_theme::Theme;
use markvault_ui::TextInput;

use crate::request_transition;
use crate::success::SuccessNotice;

const LABEL_WIDTH: u16 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Current,
    New,
    Confirm,
}

struct State {
    handle: Option<TransitionHandle>,
    vault: Vault,
    needs_current: bool,
    focus: Field,
    current: TextInput,
    new_password: TextInput,
    confirm: TextInput,
}

impl State {
    fn reset(&mut self) {
        self.current.clear();
        self.new_password.clear();
        self.confirm.clear();
        self.needs_current = match self.vault.status() {
            Ok(status) => status.initialized,
            Err(err) => {
                markvault_logger::warn(format!("could not read vault status: {err}"));
                false
            }
        };
        self.focus = if self.needs_current {
            Field::Current
        } else {
            Field::New
        };
    }

    fn focused_input(&mut self) -> &mut TextInput {
        match self.focus {
            Field::Current => &mut self.current,
            Field::New => &mut self.new_password,
            Field::Confirm => &mut self.confirm,
        }
    }

    fn focus_next(&mut self) {
        self.focus = match self.focus {
            Field::Current => Field::New,
            Field::New => Field::Confirm,
            Field::Confirm => {
                if self.needs_current {
                    Field::Current
                } else {
                    Field::New
                }
            }
        };
    }

    fn focus_prev(&mut self) {
        self.focus = match self.focus {
            Field::Current => Field::Confirm,
            Field::New => {
                if self.needs_current {
                    Field::Current
                } else {
                    Field::Confirm
                }
            }
            Field::Confirm => Field::New,
        };
    }
}

/// Build the password setup panel.
pub fn module(vault: Vault) -> PanelModule {
    let state = Rc::new(RefCell::new(State {
        handle: None,
        vault,
        needs_current: false,
        focus: Field::New,
        current: TextInput::new(),
        new_password: TextInput::new(),
        confirm: TextInput::new(),
    }));

    let activate_state = Rc::clone(&state);
    let deactivate_state = Rc::clone(&state);
    let transition_state = Rc::clone(&state);
    let hooks = PanelHooks {
        on_activate: Some(Box::new(move |_args: PanelArgs| {
            activate_state.borrow_mut().reset();
        })),
        on_deactivate: Some(Box::new(move || {
            let mut st = deactivate_state.borrow_mut();
            st.current.clear();
            st.new_password.clear();
            st.confirm.clear();
        })),
        on_transition: Some(Box::new(move |handle| {
            transition_state.borrow_mut().handle = Some(handle);
        })),
    };

    PanelModule {
        descriptor: PanelDescriptor::with_hooks(PanelId::PasswordSetup, "Password setup", hooks),
        view: Box::new(PasswordSetupView { state }),
    }
}

struct PasswordSetupView {
    state: Rc<RefCell<State>>,
}

impl PasswordSetupView {
    fn submit(&mut self, events: &mut Vec<PanelEvent>) {
        let (handle, vault, needs_current, current, new_password, confirm) = {
            let st = self.state.borrow();
            (
                st.handle.clone(),
                st.vault.clone(),
                st.needs_current,
                st.current.text().to_string(),
                st.new_password.text().to_string(),
                st.confirm.text().to_string(),
            )
        };

        if new_password.is_empty() {
            events.push(PanelEvent::error("Password cannot be empty"));
            return;
        }
        if new_password != confirm {
            events.push(PanelEvent::error("Passwords do not match"));
            return;
        }

        let (result, message) = if needs_current {
            (
                vault.change_password(&current, &new_password),
                "Master password updated",
            )
        } else {
            (vault.initialize(&new_password), "Master password set")
        };

        match result {
            Ok(()) => {
                request_transition(
                    handle,
                    PanelId::Success,
                    PanelArgs::new(SuccessNotice::new(message)),
                    events,
                );
            }
            Err(err) => events.push(PanelEvent::error(err.to_string())),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn render_field(
        &self,
        buf: &mut Buffer,
        x: u16,
        y: u16,
        field_width: usize,
        label: &str,
        input: &TextInput,
        focused: bool,
        theme: &Theme,
    ) {
        let label_style = if focused {
            Style::default().fg(theme.fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.disabled)
        };
        buf.set_string(
            x,
            y,
            format!("{label:<width$}", width = LABEL_WIDTH as usize),
            label_style,
        );

        let field_x = x + LABEL_WIDTH;
        let field_style = if focused {
            Style::default().fg(theme.fg).bg(theme.selected_bg)
        } else {
            Style::default().fg(theme.disabled)
        };
        buf.set_string(field_x, y, " ".repeat(field_width), field_style);
        let shown = input.text().chars().count().min(field_width - 1);
        buf.set_string(field_x, y, "•".repeat(shown), field_style);

        if focused {
            let cursor_x = field_x + input.cursor_pos().min(field_width - 1) as u16;
            buf[(cursor_x, y)].set_style(Style::default().add_modifier(Modifier::REVERSED));
        }
    }

    fn rows(&self, st: &State) -> Vec<(&'static str, Field)> {
        let mut rows = Vec::new();
        if st.needs_current {
            rows.push(("Current password", Field::Current));
        }
        rows.push(("New password", Field::New));
        rows.push(("Confirm password", Field::Confirm));
        rows
    }
}

impl PanelView for PasswordSetupView {
    fn id(&self) -> PanelId {
        PanelId::PasswordSetup
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width < LABEL_WIDTH + 12 || area.height < 5 {
            return;
        }
        let st = self.state.borrow();
        let rows = self.rows(&st);

        let field_width = (area.width - LABEL_WIDTH).clamp(10, 24) as usize;
        let total = LABEL_WIDTH + field_width as u16;
        let x = area.x + area.width.saturating_sub(total) / 2;
        let top = area.y + area.height.saturating_sub(rows.len() as u16 + 2) / 2;

        for (i, (label, field)) in rows.iter().enumerate() {
            let y = top + i as u16;
            if y >= area.bottom() {
                break;
            }
            let input = match field {
                Field::Current => &st.current,
                Field::New => &st.new_password,
                Field::Confirm => &st.confirm,
            };
            self.render_field(buf, x, y, field_width, label, input, st.focus == *field, theme);
        }

        let hint_y = top + rows.len() as u16 + 1;
        if hint_y < area.bottom() {
            let hint = Line::from(vec![
                Span::styled("Tab", Style::default().fg(theme.fg)),
                Span::styled(" next field   ", Style::default().fg(theme.disabled)),
                Span::styled("Enter", Style::default().fg(theme.fg)),
                Span::styled(" save   ", Style::default().fg(theme.disabled)),
                Span::styled("Esc", Style::default().fg(theme.fg)),
                Span::styled(" back", Style::default().fg(theme.disabled)),
            ]);
            Paragraph::new(hint)
                .alignment(Alignment::Center)
                .render(Rect::new(area.x, hint_y, area.width, 1), buf);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<PanelEvent> {
        let mut events = Vec::new();
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.state.borrow_mut().focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.state.borrow_mut().focus_prev(),
            KeyCode::Char(c) => {
                self.state.borrow_mut().focused_input().insert(c);
                events.push(PanelEvent::ClearStatus);
            }
            KeyCode::Backspace => {
                if self.state.borrow_mut().focused_input().backspace() {
                    events.push(PanelEvent::ClearStatus);
                }
            }
            KeyCode::Delete => {
                self.state.borrow_mut().focused_input().delete();
            }
            KeyCode::Left => {
                self.state.borrow_mut().focused_input().move_left();
            }
            KeyCode::Right => {
                self.state.borrow_mut().focused_input().move_right();
            }
            KeyCode::Home => self.state.borrow_mut().focused_input().move_home(),
            KeyCode::End => self.state.borrow_mut().focused_input().move_end(),
            KeyCode::Enter => self.submit(&mut events),
            KeyCode::Esc => {
                let handle = self.state.borrow().handle.clone();
                request_transition(handle, PanelId::MainMenu, PanelArgs::none(), &mut events);
            }
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
    use tempfile::TempDir;

    struct Recorder(RefCell<Vec<(Option<PanelId>, Option<String>)>>);

    impl Transitioner for Recorder {
        fn transition(&self, target: Option<PanelId>, args: PanelArgs) -> Result<(), CoreError> {
            let notice = args.downcast::<SuccessNotice>().map(|n| n.message);
            self.0.borrow_mut().push((target, notice));
            Ok(())
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(view: &mut Box<dyn PanelView>, text: &str) {
        for c in text.chars() {
            view.handle_key(press(KeyCode::Char(c)));
        }
    }

    fn wired_module(vault: Vault) -> (PanelModule, Rc<Recorder>) {
        let mut module = module(vault);
        let recorder = Rc::new(Recorder(RefCell::new(vec![])));
        let hook = module.descriptor.hooks.on_transition.take().unwrap();
        hook(recorder.clone());
        (module, recorder)
    }

    fn activate(module: &mut PanelModule) {
        let hook = module.descriptor.hooks.on_activate.as_mut().unwrap();
        hook(PanelArgs::none());
    }

    #[test]
    fn first_run_setup_initializes_the_vault() {
        let dir = TempDir::new().unwrap();
        let vault = Vault::new(dir.path());
        let (mut module, recorder) = wired_module(vault.clone());
        activate(&mut module);

        type_text(&mut module.view, "hunter2");
        module.view.handle_key(press(KeyCode::Tab));
        type_text(&mut module.view, "hunter2");
        let events = module.view.handle_key(press(KeyCode::Enter));

        assert!(events.is_empty());
        assert_eq!(
            *recorder.0.borrow(),
            vec![(
                Some(PanelId::Success),
                Some("Master password set".to_string())
            )]
        );
        assert!(!vault.needs_setup().unwrap());
    }

    #[test]
    fn mismatched_passwords_are_rejected() {
        let dir = TempDir::new().unwrap();
        let (mut module, recorder) = wired_module(Vault::new(dir.path()));
        activate(&mut module);

        type_text(&mut module.view, "hunter2");
        module.view.handle_key(press(KeyCode::Tab));
        type_text(&mut module.view, "hunter3");
        let events = module.view.handle_key(press(KeyCode::Enter));

        assert!(recorder.0.borrow().is_empty());
        assert_eq!(events, vec![PanelEvent::error("Passwords do not match")]);
    }

    #[test]
    fn empty_password_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (mut module, _recorder) = wired_module(Vault::new(dir.path()));
        activate(&mut module);

        let events = module.view.handle_key(press(KeyCode::Enter));
        assert_eq!(events, vec![PanelEvent::error("Password cannot be empty")]);
    }

    #[test]
    fn change_requires_the_current_password() {
        let dir = TempDir::new().unwrap();
        let vault = Vault::new(dir.path());
        vault.initialize("old").unwrap();

        let (mut module, recorder) = wired_module(vault);
        activate(&mut module);

        // Focus starts on the current-password field.
        type_text(&mut module.view, "wrong");
        module.view.handle_key(press(KeyCode::Tab));
        type_text(&mut module.view, "new");
        module.view.handle_key(press(KeyCode::Tab));
        type_text(&mut module.view, "new");
        let events = module.view.handle_key(press(KeyCode::Enter));

        assert!(recorder.0.borrow().is_empty());
        assert_eq!(
            events,
            vec![PanelEvent::error("Current password does not match")]
        );
    }

    #[test]
    fn change_with_correct_current_password_succeeds() {
        let dir = TempDir::new().unwrap();
        let vault = Vault::new(dir.path());
        vault.initialize("old").unwrap();
        vault.lock().unwrap();

        let (mut module, recorder) = wired_module(vault.clone());
        activate(&mut module);

        type_text(&mut module.view, "old");
        module.view.handle_key(press(KeyCode::Tab));
        type_text(&mut module.view, "new");
        module.view.handle_key(press(KeyCode::Tab));
        type_text(&mut module.view, "new");
        module.view.handle_key(press(KeyCode::Enter));

        assert_eq!(
            recorder.0.borrow()[0],
            (
                Some(PanelId::Success),
                Some("Master password updated".to_string())
            )
        );
        assert_eq!(
            vault.unlock("new").unwrap(),
            markvault_bookmarks::UnlockOutcome::Unlocked
        );
    }

    #[test]
    fn escape_returns_to_main_menu() {
        let dir = TempDir::new().unwrap();
        let (mut module, recorder) = wired_module(Vault::new(dir.path()));
        activate(&mut module);

        module.view.handle_key(press(KeyCode::Esc));
        assert_eq!(recorder.0.borrow()[0].0, Some(PanelId::MainMenu));
    }
}
