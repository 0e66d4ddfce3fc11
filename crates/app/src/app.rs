//! Main application module.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::Backend, Frame, Terminal};

use markvault_bookmarks::Vault;
use markvault_config::constants::{
    EVENT_HANDLER_INTERVAL_MS, MIN_TERMINAL_HEIGHT, MIN_TERMINAL_WIDTH,
};
use markvault_config::Config;
use markvault_controller::{bootstrap, Engine, Registry};
use markvault_core::{Event, EventHandler, PanelDescriptor, PanelEvent, PanelId, PanelView};
use markvault_theme::Theme;
use markvault_ui::{
    popup_markup, render_backdrop, render_chrome, render_status, render_too_small, PopupLayout,
};

/// Main application
pub struct App {
    engine: Engine,
    views: HashMap<PanelId, Box<dyn PanelView>>,
    event_handler: EventHandler,
    theme: Theme,
    popup_width: u16,
    popup_height: u16,
    status: Option<(String, bool)>,
    last_active: Option<PanelId>,
    should_quit: bool,
    needs_redraw: bool,
}

impl App {
    /// Build the popup and run its bootstrap.
    ///
    /// Registers the blank placeholder plus every real panel, binds the
    /// markup anchors and shows the first panel according to the vault
    /// state. A binding failure here means the markup and the panel set
    /// disagree and is returned as a hard error.
    pub fn new(config: &Config, vault: Vault) -> Result<Self> {
        let theme = Theme::get_by_name(&config.general.theme);

        let mut descriptors = vec![PanelDescriptor::blank()];
        let mut views: HashMap<PanelId, Box<dyn PanelView>> = HashMap::new();
        for module in markvault_panels::all(vault.clone()) {
            views.insert(module.descriptor.id, module.view);
            descriptors.push(module.descriptor);
        }

        let registry = Registry::new(descriptors)?;
        let engine = Engine::new(popup_markup(), registry);
        bootstrap::initialize(&engine, &vault)?;

        let last_active = engine.active_panel_id();
        Ok(Self {
            engine,
            views,
            event_handler: EventHandler::new(Duration::from_millis(EVENT_HANDLER_INTERVAL_MS)),
            theme,
            popup_width: config.popup.width,
            popup_height: config.popup.height,
            status: None,
            last_active,
            should_quit: false,
            needs_redraw: true,
        })
    }

    /// Run the main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        terminal.draw(|frame| self.draw(frame))?;
        self.needs_redraw = false;

        while !self.should_quit {
            match self.event_handler.next()? {
                Event::Key(key) => {
                    self.handle_key_event(key);
                    self.needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    self.needs_redraw = true;
                }
                Event::Tick => self.handle_tick(),
            }

            self.sync_active_panel();

            // Render only when needed to keep the idle popup quiet.
            if self.needs_redraw {
                terminal.draw(|frame| self.draw(frame))?;
                self.needs_redraw = false;
            }
        }

        markvault_logger::info("Popup closed");
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.should_quit = true;
            return;
        }

        let Some(id) = self.engine.visible_panel() else {
            return;
        };
        let events = match self.views.get_mut(&id) {
            Some(view) => view.handle_key(key),
            None => return,
        };
        self.apply_panel_events(events);
    }

    fn handle_tick(&mut self) {
        let Some(id) = self.engine.visible_panel() else {
            return;
        };
        let events = match self.views.get_mut(&id) {
            Some(view) => view.tick(),
            None => return,
        };
        if id == PanelId::OnHold {
            // The hold countdown changes between ticks.
            self.needs_redraw = true;
        }
        self.apply_panel_events(events);
    }

    fn apply_panel_events(&mut self, events: Vec<PanelEvent>) {
        for event in events {
            match event {
                PanelEvent::Quit => self.should_quit = true,
                PanelEvent::SetStatusMessage { message, is_error } => {
                    self.status = Some((message, is_error));
                }
                PanelEvent::ClearStatus => self.status = None,
            }
        }
    }

    /// A panel switch invalidates the status line of the previous panel.
    fn sync_active_panel(&mut self) {
        let active = self.engine.active_panel_id();
        if active != self.last_active {
            self.status = None;
            self.last_active = active;
            self.needs_redraw = true;
        }
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let theme = self.theme;
        let frame_area = frame.area();
        let buf = frame.buffer_mut();

        render_backdrop(frame_area, buf, &theme);
        if frame_area.width < MIN_TERMINAL_WIDTH || frame_area.height < MIN_TERMINAL_HEIGHT {
            render_too_small(frame_area, buf, &theme);
            return;
        }

        let layout = PopupLayout::new(frame_area, self.popup_width, self.popup_height);
        let header = self.engine.header_text().unwrap_or_default();
        render_chrome(&layout, buf, &theme, &header);

        if let Some(id) = self.engine.visible_panel() {
            if let Some(view) = self.views.get_mut(&id) {
                view.render(layout.body, buf, &theme);
            }
        }

        if let Some((message, is_error)) = &self.status {
            render_status(layout.status, buf, &theme, message, *is_error);
        }
    }
}
