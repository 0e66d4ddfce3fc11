//! Lockout panel shown after too many failed unlock attempts.
//!
//! A deadline is armed from the [`HoldNotice`] payload on activation.
//! Ticks from the event loop drive the countdown; when it reaches zero
//! the failed-attempt counter is cleared and the user is sent back to
//! the unlock panel.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use markvault_bookmarks::{Vault, HOLD_SECONDS};
use markvault_core::{
    PanelArgs, PanelDescriptor, PanelEvent, PanelHooks, PanelId, PanelModule, PanelView,
    TransitionHandle,
};
use markvault_theme::Theme;

use crate::request_transition;

/// Payload telling the hold panel how long to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldNotice {
    pub seconds: u64,
}

impl HoldNotice {
    pub fn new(seconds: u64) -> Self {
        Self { seconds }
    }
}

impl Default for HoldNotice {
    fn default() -> Self {
        Self::new(HOLD_SECONDS)
    }
}

struct State {
    handle: Option<TransitionHandle>,
    vault: Vault,
    deadline: Option<Instant>,
}

/// Build the hold panel.
pub fn module(vault: Vault) -> PanelModule {
    let state = Rc::new(RefCell::new(State {
        handle: None,
        vault,
        deadline: None,
    }));

    let activate_state = Rc::clone(&state);
    let deactivate_state = Rc::clone(&state);
    let transition_state = Rc::clone(&state);
    let hooks = PanelHooks {
        on_activate: Some(Box::new(move |args: PanelArgs| {
            let notice = args.downcast::<HoldNotice>().unwrap_or_default();
            let mut st = activate_state.borrow_mut();
            st.deadline = Some(Instant::now() + Duration::from_secs(notice.seconds));
        })),
        on_deactivate: Some(Box::new(move || {
            deactivate_state.borrow_mut().deadline = None;
        })),
        on_transition: Some(Box::new(move |handle| {
            transition_state.borrow_mut().handle = Some(handle);
        })),
    };

    PanelModule {
        descriptor: PanelDescriptor::with_hooks(PanelId::OnHold, "On hold", hooks),
        view: Box::new(OnHoldView { state }),
    }
}

struct OnHoldView {
    state: Rc<RefCell<State>>,
}

impl OnHoldView {
    fn remaining(&self) -> Option<Duration> {
        let st = self.state.borrow();
        st.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

impl PanelView for OnHoldView {
    fn id(&self) -> PanelId {
        PanelId::OnHold
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let remaining = self.remaining().unwrap_or_default();
        let seconds = remaining.as_millis().div_ceil(1000);

        let top = area.y + area.height.saturating_sub(4) / 2;
        let mut line = |y: u16, text: String, style: Style| {
            if y < area.bottom() {
                Paragraph::new(Line::from(Span::styled(text, style)))
                    .alignment(Alignment::Center)
                    .render(Rect::new(area.x, y, area.width, 1), buf);
            }
        };

        line(
            top,
            "Too many failed attempts".to_string(),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        );
        line(
            top + 2,
            format!("Try again in {seconds}s"),
            Style::default().fg(theme.fg),
        );
        line(
            top + 3,
            "Esc back to the menu".to_string(),
            Style::default().fg(theme.disabled),
        );
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<PanelEvent> {
        let mut events = Vec::new();
        match key.code {
            KeyCode::Esc => {
                let handle = self.state.borrow().handle.clone();
                request_transition(handle, PanelId::MainMenu, PanelArgs::none(), &mut events);
            }
            KeyCode::Char('q') => events.push(PanelEvent::Quit),
            _ => {}
        }
        events
    }

    fn tick(&mut self) -> Vec<PanelEvent> {
        let mut events = Vec::new();
        let expired = {
            let st = self.state.borrow();
            matches!(st.deadline, Some(deadline) if Instant::now() >= deadline)
        };
        if !expired {
            return events;
        }

        let (handle, vault) = {
            let mut st = self.state.borrow_mut();
            st.deadline = None;
            (st.handle.clone(), st.vault.clone())
        };

        match vault.release_hold() {
            Ok(()) => {
                request_transition(handle, PanelId::Authentication, PanelArgs::none(), &mut events);
            }
            Err(err) => {
                markvault_logger::error(format!("could not release the unlock hold: {err}"));
                events.push(PanelEvent::error(err.to_string()));
            }
        }
        events
    }
}
