//! Main menu panel.
//!
//! The entries adapt to the vault: an uninitialized vault only offers
//! setup, a locked one offers unlocking, an unlocked one offers locking
//! and a password change. `on_activate` re-reads the vault status so the
//! menu is fresh every time the panel comes back on screen.

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use markvault_bookmarks::{Vault, VaultStatus};
use markvault_core::{
    ErrorDetails, PanelArgs, PanelDescriptor, PanelEvent, PanelHooks, PanelId, PanelModule,
    PanelView, TransitionHandle,
};
use markvault_theme::Theme;

use crate::confirmation_dialog::ConfirmRequest;
use crate::request_transition;
use crate::success::SuccessNotice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Go(PanelId),
    LockVault,
    Quit,
}

struct MenuEntry {
    label: &'static str,
    action: MenuAction,
}

struct State {
    handle: Option<TransitionHandle>,
    vault: Vault,
    status: Option<VaultStatus>,
    selected: usize,
}

impl State {
    fn entries(&self) -> Vec<MenuEntry> {
        let mut entries = Vec::new();
        match &self.status {
            Some(status) if !status.initialized => {
                entries.push(MenuEntry {
                    label: "Set master password",
                    action: MenuAction::Go(PanelId::PasswordSetup),
                });
            }
            Some(status) if status.locked => {
                entries.push(MenuEntry {
                    label: "Unlock vault",
                    action: MenuAction::Go(PanelId::Authentication),
                });
                entries.push(MenuEntry {
                    label: "Change master password",
                    action: MenuAction::Go(PanelId::PasswordSetup),
                });
            }
            Some(_) => {
                entries.push(MenuEntry {
                    label: "Lock vault",
                    action: MenuAction::LockVault,
                });
                entries.push(MenuEntry {
                    label: "Change master password",
                    action: MenuAction::Go(PanelId::PasswordSetup),
                });
            }
            // Status could not be read; quitting is all we can offer.
            None => {}
        }
        entries.push(MenuEntry {
            label: "Quit",
            action: MenuAction::Quit,
        });
        entries
    }

    fn summary(&self) -> String {
        match &self.status {
            Some(status) if !status.initialized => "Vault is not set up yet".to_string(),
            Some(status) if status.locked => {
                format!("{} bookmarks, locked", status.bookmark_count)
            }
            Some(status) => format!("{} bookmarks, unlocked", status.bookmark_count),
            None => "Vault status unavailable".to_string(),
        }
    }
}

/// Build the main menu panel.
pub fn module(vault: Vault) -> PanelModule {
    let state = Rc::new(RefCell::new(State {
        handle: None,
        vault,
        status: None,
        selected: 0,
    }));

    let activate_state = Rc::clone(&state);
    let transition_state = Rc::clone(&state);
    let hooks = PanelHooks {
        on_activate: Some(Box::new(move |_args: PanelArgs| {
            let mut st = activate_state.borrow_mut();
            st.selected = 0;
            match st.vault.status() {
                Ok(status) => st.status = Some(status),
                Err(err) => {
                    markvault_logger::warn(format!("could not read vault status: {err}"));
                    st.status = None;
                }
            }
        })),
        on_deactivate: None,
        on_transition: Some(Box::new(move |handle| {
            transition_state.borrow_mut().handle = Some(handle);
        })),
    };

    PanelModule {
        descriptor: PanelDescriptor::with_hooks(PanelId::MainMenu, "Main menu", hooks),
        view: Box::new(MainMenuView { state }),
    }
}

struct MainMenuView {
    state: Rc<RefCell<State>>,
}

impl MainMenuView {
    /// Run the entry under the cursor. Transitions happen with the state
    /// borrow released since they re-enter this panel's hooks.
    fn choose(&mut self, events: &mut Vec<PanelEvent>) {
        let (handle, vault, action) = {
            let st = self.state.borrow();
            let entries = st.entries();
            let Some(entry) = entries.get(st.selected) else {
                return;
            };
            (st.handle.clone(), st.vault.clone(), entry.action)
        };

        match action {
            MenuAction::Go(target) => {
                request_transition(handle, target, PanelArgs::none(), events);
            }
            MenuAction::LockVault => {
                let request = lock_request(vault, handle.clone());
                request_transition(
                    handle,
                    PanelId::ConfirmationDialog,
                    PanelArgs::new(request),
                    events,
                );
            }
            MenuAction::Quit => events.push(PanelEvent::Quit),
        }
    }
}

/// Confirmation payload for locking the vault. The confirm action runs
/// from the dialog panel, so it reports its outcome through a transition
/// rather than a return value.
fn lock_request(vault: Vault, handle: Option<TransitionHandle>) -> ConfirmRequest {
    ConfirmRequest::new("Lock the vault now?", PanelId::MainMenu, move || {
        let Some(handle) = handle else {
            return;
        };
        let result = match vault.lock() {
            Ok(()) => handle.transition(
                Some(PanelId::Success),
                PanelArgs::new(SuccessNotice::new("Vault locked")),
            ),
            Err(err) => handle.transition(
                Some(PanelId::Error),
                PanelArgs::new(ErrorDetails::new(
                    "Error while locking the vault",
                    err.to_string(),
                )),
            ),
        };
        if let Err(err) = result {
            markvault_logger::error(format!("lock confirmation transition failed: {err}"));
        }
    })
}

impl PanelView for MainMenuView {
    fn id(&self) -> PanelId {
        PanelId::MainMenu
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let st = self.state.borrow();
        let entries = st.entries();

        let summary_area = Rect::new(area.x, area.y, area.width, 1);
        Paragraph::new(Line::from(Span::styled(
            st.summary(),
            Style::default().fg(theme.disabled),
        )))
        .alignment(Alignment::Center)
        .render(summary_area, buf);

        let top = area.y + 2;
        for (i, entry) in entries.iter().enumerate() {
            let y = top + i as u16;
            if y >= area.bottom() {
                break;
            }
            let style = if i == st.selected {
                Style::default()
                    .fg(theme.selected_fg)
                    .bg(theme.selected_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.fg)
            };
            let marker = if i == st.selected { "> " } else { "  " };
            let row = Rect::new(area.x, y, area.width, 1);
            Paragraph::new(Line::from(Span::styled(
                format!("{marker}{}", entry.label),
                style,
            )))
            .alignment(Alignment::Center)
            .render(row, buf);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<PanelEvent> {
        let mut events = Vec::new();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                let mut st = self.state.borrow_mut();
                st.selected = st.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let mut st = self.state.borrow_mut();
                let last = st.entries().len().saturating_sub(1);
                st.selected = (st.selected + 1).min(last);
            }
            KeyCode::Enter => self.choose(&mut events),
            KeyCode::Esc | KeyCode::Char('q') => events.push(PanelEvent::Quit),
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
    fn uninitialized_vault_offers_setup_then_quit() {
        let dir = TempDir::new().unwrap();
        let (mut module, recorder) = wired_module(Vault::new(dir.path()));
        activate(&mut module);

        let events = module.view.handle_key(press(KeyCode::Enter));
        assert!(events.is_empty());
        assert_eq!(*recorder.0.borrow(), vec![Some(PanelId::PasswordSetup)]);

        module.view.handle_key(press(KeyCode::Down));
        let events = module.view.handle_key(press(KeyCode::Enter));
        assert_eq!(events, vec![PanelEvent::Quit]);
    }

    #[test]
    fn locked_vault_offers_unlock_first() {
        let dir = TempDir::new().unwrap();
        let vault = Vault::new(dir.path());
        vault.initialize("secret").unwrap();
        vault.lock().unwrap();

        let (mut module, recorder) = wired_module(vault);
        activate(&mut module);

        module.view.handle_key(press(KeyCode::Enter));
        assert_eq!(*recorder.0.borrow(), vec![Some(PanelId::Authentication)]);
    }

    #[test]
    fn lock_entry_routes_through_confirmation() {
        let dir = TempDir::new().unwrap();
        let vault = Vault::new(dir.path());
        vault.initialize("secret").unwrap();

        let (mut module, recorder) = wired_module(vault);
        activate(&mut module);

        module.view.handle_key(press(KeyCode::Enter));
        assert_eq!(
            *recorder.0.borrow(),
            vec![Some(PanelId::ConfirmationDialog)]
        );
    }

    #[test]
    fn selection_stays_in_bounds() {
        let dir = TempDir::new().unwrap();
        let (mut module, _recorder) = wired_module(Vault::new(dir.path()));
        activate(&mut module);

        module.view.handle_key(press(KeyCode::Up));
        for _ in 0..10 {
            module.view.handle_key(press(KeyCode::Down));
        }
        // Last entry is Quit; Enter must hit it, not panic past the end.
        let events = module.view.handle_key(press(KeyCode::Enter));
        assert_eq!(events, vec![PanelEvent::Quit]);
    }

    #[test]
    fn reactivation_resets_selection_and_status() {
        let dir = TempDir::new().unwrap();
        let vault = Vault::new(dir.path());
        let (mut module, recorder) = wired_module(vault.clone());
        activate(&mut module);

        module.view.handle_key(press(KeyCode::Down));
        vault.initialize("secret").unwrap();
        activate(&mut module);

        // Fresh status: vault is now unlocked, cursor back on "Lock vault".
        module.view.handle_key(press(KeyCode::Enter));
        assert_eq!(
            *recorder.0.borrow(),
            vec![Some(PanelId::ConfirmationDialog)]
        );
    }
}
