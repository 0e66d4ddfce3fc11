//! Master password prompt.
//!
//! The typed password only lives in the input widget; `on_deactivate`
//! wipes it whenever the panel leaves the screen, whichever panel comes
//! next.

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use markvault_bookmarks::{UnlockOutcome, Vault, HOLD_SECONDS};
use markvault_core::{
    PanelArgs, PanelDescriptor, PanelEvent, PanelHooks, PanelId, PanelModule, PanelView,
    TransitionHandle,
};
use markvault_theme::Theme;
use markvault_ui::TextInput;

use crate::on_hold::HoldNotice;
use crate::request_transition;
use crate::success::SuccessNotice;

struct State {
    handle: Option<TransitionHandle>,
    vault: Vault,
    input: TextInput,
}

/// Build the unlock panel.
pub fn module(vault: Vault) -> PanelModule {
    let state = Rc::new(RefCell::new(State {
        handle: None,
        vault,
        input: TextInput::new(),
    }));

    let deactivate_state = Rc::clone(&state);
    let transition_state = Rc::clone(&state);
    let hooks = PanelHooks {
        on_activate: None,
        on_deactivate: Some(Box::new(move || {
            deactivate_state.borrow_mut().input.clear();
        })),
        on_transition: Some(Box::new(move |handle| {
            transition_state.borrow_mut().handle = Some(handle);
        })),
    };

    PanelModule {
        descriptor: PanelDescriptor::with_hooks(PanelId::Authentication, "Unlock vault", hooks),
        view: Box::new(AuthenticationView { state }),
    }
}

struct AuthenticationView {
    state: Rc<RefCell<State>>,
}

impl AuthenticationView {
    fn submit(&mut self, events: &mut Vec<PanelEvent>) {
        let (handle, vault, password) = {
            let st = self.state.borrow();
            (
                st.handle.clone(),
                st.vault.clone(),
                st.input.text().to_string(),
            )
        };

        if password.is_empty() {
            events.push(PanelEvent::error("Enter your master password"));
            return;
        }

        match vault.unlock(&password) {
            Ok(UnlockOutcome::Unlocked) => {
                request_transition(
                    handle,
                    PanelId::Success,
                    PanelArgs::new(SuccessNotice::new("Vault unlocked")),
                    events,
                );
            }
            Ok(UnlockOutcome::WrongPassword { attempts_left }) => {
                self.state.borrow_mut().input.clear();
                let message = if attempts_left == 1 {
                    "Wrong password, 1 attempt left".to_string()
                } else {
                    format!("Wrong password, {attempts_left} attempts left")
                };
                events.push(PanelEvent::error(message));
            }
            Ok(UnlockOutcome::OnHold) => {
                request_transition(
                    handle,
                    PanelId::OnHold,
                    PanelArgs::new(HoldNotice::new(HOLD_SECONDS)),
                    events,
                );
            }
            Err(err) => events.push(PanelEvent::error(err.to_string())),
        }
    }
}

impl PanelView for AuthenticationView {
    fn id(&self) -> PanelId {
        PanelId::Authentication
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width < 12 || area.height < 4 {
            return;
        }
        let st = self.state.borrow();

        let field_width = area.width.saturating_sub(8).clamp(8, 32);
        let x = area.x + area.width.saturating_sub(field_width) / 2;
        let top = area.y + area.height.saturating_sub(4) / 2;

        buf.set_string(x, top, "Master password", Style::default().fg(theme.fg));

        let field_y = top + 1;
        let width = field_width as usize;
        let field_style = Style::default().fg(theme.fg).bg(theme.selected_bg);
        buf.set_string(x, field_y, " ".repeat(width), field_style);

        // All glyphs are identical bullets, so clipping to the field is
        // just a count, not a slice.
        let typed = st.input.text().chars().count();
        let shown = typed.min(width - 1);
        buf.set_string(x, field_y, "•".repeat(shown), field_style);

        let cursor_x = x + st.input.cursor_pos().min(width - 1) as u16;
        buf[(cursor_x, field_y)].set_style(Style::default().add_modifier(Modifier::REVERSED));

        let hint_y = top + 3;
        if hint_y < area.bottom() {
            let hint = Line::from(vec![
                Span::styled("Enter", Style::default().fg(theme.fg)),
                Span::styled(" unlock   ", Style::default().fg(theme.disabled)),
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
            KeyCode::Char(c) => {
                self.state.borrow_mut().input.insert(c);
                events.push(PanelEvent::ClearStatus);
            }
            KeyCode::Backspace => {
                if self.state.borrow_mut().input.backspace() {
                    events.push(PanelEvent::ClearStatus);
                }
            }
            KeyCode::Delete => {
                self.state.borrow_mut().input.delete();
            }
            KeyCode::Left => {
                self.state.borrow_mut().input.move_left();
            }
            KeyCode::Right => {
                self.state.borrow_mut().input.move_right();
            }
            KeyCode::Home => {
                self.state.borrow_mut().input.move_home();
            }
            KeyCode::End => {
                self.state.borrow_mut().input.move_end();
            }
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

    #[test]
    fn correct_password_unlocks_and_reports_success() {
        let dir = TempDir::new().unwrap();
        let vault = Vault::new(dir.path());
        vault.initialize("secret").unwrap();
        vault.lock().unwrap();

        let (mut module, recorder) = wired_module(vault.clone());
        type_text(&mut module.view, "secret");
        let events = module.view.handle_key(press(KeyCode::Enter));

        assert!(events.is_empty());
        assert_eq!(
            *recorder.0.borrow(),
            vec![(Some(PanelId::Success), Some("Vault unlocked".to_string()))]
        );
        assert!(!vault.status().unwrap().locked);
    }

    #[test]
    fn wrong_password_reports_attempts_left() {
        let dir = TempDir::new().unwrap();
        let vault = Vault::new(dir.path());
        vault.initialize("secret").unwrap();

        let (mut module, recorder) = wired_module(vault);
        type_text(&mut module.view, "nope");
        let events = module.view.handle_key(press(KeyCode::Enter));

        assert!(recorder.0.borrow().is_empty());
        assert_eq!(
            events,
            vec![PanelEvent::error("Wrong password, 2 attempts left")]
        );
    }

    #[test]
    fn empty_submit_asks_for_password() {
        let dir = TempDir::new().unwrap();
        let (mut module, _recorder) = wired_module(Vault::new(dir.path()));

        let events = module.view.handle_key(press(KeyCode::Enter));
        assert_eq!(events, vec![PanelEvent::error("Enter your master password")]);
    }

    #[test]
    fn third_failure_moves_to_hold() {
        let dir = TempDir::new().unwrap();
        let vault = Vault::new(dir.path());
        vault.initialize("secret").unwrap();
        vault.unlock("bad").unwrap();
        vault.unlock("bad").unwrap();

        let (mut module, recorder) = wired_module(vault);
        type_text(&mut module.view, "bad");
        module.view.handle_key(press(KeyCode::Enter));

        assert_eq!(recorder.0.borrow()[0].0, Some(PanelId::OnHold));
    }

    #[test]
    fn escape_returns_to_main_menu() {
        let dir = TempDir::new().unwrap();
        let (mut module, recorder) = wired_module(Vault::new(dir.path()));

        module.view.handle_key(press(KeyCode::Esc));
        assert_eq!(recorder.0.borrow()[0].0, Some(PanelId::MainMenu));
    }

    #[test]
    fn deactivation_wipes_the_typed_password() {
        let dir = TempDir::new().unwrap();
        let (mut module, _recorder) = wired_module(Vault::new(dir.path()));

        type_text(&mut module.view, "secret");
        let hook = module.descriptor.hooks.on_deactivate.as_mut().unwrap();
        hook();

        // An empty field is the observable proof the secret is gone.
        let events = module.view.handle_key(press(KeyCode::Enter));
        assert_eq!(events, vec![PanelEvent::error("Enter your master password")]);
    }

    #[test]
    fn typing_clears_the_status_line() {
        let dir = TempDir::new().unwrap();
        let (mut module, _recorder) = wired_module(Vault::new(dir.path()));

        let events = module.view.handle_key(press(KeyCode::Char('a')));
        assert_eq!(events, vec![PanelEvent::ClearStatus]);
    }
}
