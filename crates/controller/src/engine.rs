//! Panel transition engine.
//!
//! The engine owns the single source of truth for "which panel is
//! active" and sequences every switch as deactivate-then-activate:
//! the outgoing panel's `on_deactivate` hook runs and its element is
//! hidden, then the header text is replaced, the incoming element is
//! shown and its `on_activate` hook runs, and finally `active_panel_id`
//! is updated.
//!
//! Hooks are invoked with the engine state released, so a hook may
//! itself call [`Engine::transition`]; the nested transition runs to
//! completion before the outer one resumes. There is no reentrancy
//! guard: a hook that transitions to the panel currently being
//! activated is a developer error.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use markvault_core::{
    CoreError, Dom, ElementId, PanelArgs, PanelId, TransitionHandle, Transitioner,
    CLASS_DEACTIVATED, HEADER_ANCHOR,
};

use crate::registry::Registry;

/// Mutable state shared between the engine and its handles.
pub(crate) struct EngineState {
    pub(crate) dom: Dom,
    pub(crate) registry: Registry,
    pub(crate) header: Option<ElementId>,
    pub(crate) active: Option<PanelId>,
}

/// Panel transition engine.
///
/// Starts on the blank placeholder panel; the first real panel is
/// chosen by the bootstrap pass. The blank panel must therefore be
/// part of the registry, or the first transition will fail to
/// deactivate it.
pub struct Engine {
    state: Rc<RefCell<EngineState>>,
}

impl Engine {
    pub fn new(dom: Dom, registry: Registry) -> Self {
        Self {
            state: Rc::new(RefCell::new(EngineState {
                dom,
                registry,
                header: None,
                active: Some(PanelId::Blank),
            })),
        }
    }

    /// Deactivate the current panel (if any), then activate `target`.
    ///
    /// `None` leaves the popup with no active panel. On an unknown
    /// target the outgoing panel has already been deactivated, but
    /// `active_panel_id` keeps its previous value.
    pub fn transition(&self, target: Option<PanelId>, args: PanelArgs) -> Result<(), CoreError> {
        Self::transition_on(&self.state, target, args)
    }

    /// Cloneable handle panels use to request transitions.
    ///
    /// The handle holds a weak reference: once the engine is dropped,
    /// calls through it fail with [`CoreError::EngineClosed`].
    pub fn handle(&self) -> TransitionHandle {
        Rc::new(EngineHandle {
            state: Rc::downgrade(&self.state),
        })
    }

    pub fn active_panel_id(&self) -> Option<PanelId> {
        self.state.borrow().active
    }

    /// Current header text, `None` until the header anchor is bound.
    pub fn header_text(&self) -> Option<String> {
        let st = self.state.borrow();
        st.header.map(|id| st.dom.text(id).to_string())
    }

    /// Whether the panel's element carries the `deactivated` class.
    pub fn is_deactivated(&self, id: PanelId) -> Result<bool, CoreError> {
        let st = self.state.borrow();
        let entry = st.registry.get(id).ok_or(CoreError::UnknownPanel(id))?;
        let element = entry
            .element
            .ok_or_else(|| CoreError::MissingElement(entry.anchor.clone()))?;
        Ok(st.dom.has_class(element, CLASS_DEACTIVATED))
    }

    /// The panel whose element is currently shown, derived from the
    /// markup flags rather than from `active_panel_id`.
    pub fn visible_panel(&self) -> Option<PanelId> {
        let st = self.state.borrow();
        st.registry.ids().into_iter().find(|id| {
            st.registry
                .get(*id)
                .and_then(|e| e.element)
                .is_some_and(|el| !st.dom.has_class(el, CLASS_DEACTIVATED))
        })
    }

    /// Bind the shared header anchor. Part of bootstrap.
    pub(crate) fn bind_header(&self) -> Result<(), CoreError> {
        let st = &mut *self.state.borrow_mut();
        st.header = Some(st.dom.bind(HEADER_ANCHOR)?);
        Ok(())
    }

    /// Bind every panel's element and hand out transition handles.
    /// Part of bootstrap.
    ///
    /// Each `on_transition` hook is consumed: it runs exactly once.
    pub(crate) fn bind_panels(&self) -> Result<(), CoreError> {
        let ids = self.state.borrow().registry.ids();
        for id in ids {
            let hook = {
                let st = &mut *self.state.borrow_mut();
                let entry = st
                    .registry
                    .get_mut(id)
                    .ok_or(CoreError::UnknownPanel(id))?;
                let element = st.dom.bind(&entry.anchor)?;
                entry.element = Some(element);
                entry.hooks.on_transition.take()
            };
            if let Some(hook) = hook {
                hook(self.handle());
            }
        }
        Ok(())
    }

    fn transition_on(
        state: &Rc<RefCell<EngineState>>,
        target: Option<PanelId>,
        args: PanelArgs,
    ) -> Result<(), CoreError> {
        let outgoing = state.borrow().active;
        if let Some(current) = outgoing {
            Self::deactivate(state, current)?;
        }
        Self::activate(state, target, args)?;

        markvault_logger::debug(format!(
            "panel transition: {} -> {}",
            outgoing.map_or("none", |id| id.as_str()),
            target.map_or("none", |id| id.as_str()),
        ));
        Ok(())
    }

    /// Run the outgoing panel's `on_deactivate` hook, then hide its
    /// element. Internal step of [`Engine::transition`]; trusts that
    /// `id` is the currently active panel.
    fn deactivate(state: &Rc<RefCell<EngineState>>, id: PanelId) -> Result<(), CoreError> {
        // Take the hook out so it can be called with the state
        // released; a transition from inside the hook finds the slot
        // empty and skips it.
        let hook = {
            let mut st = state.borrow_mut();
            let entry = st
                .registry
                .get_mut(id)
                .ok_or(CoreError::UnknownPanel(id))?;
            entry.hooks.on_deactivate.take()
        };
        if let Some(mut hook) = hook {
            hook();
            let mut st = state.borrow_mut();
            if let Some(entry) = st.registry.get_mut(id) {
                if entry.hooks.on_deactivate.is_none() {
                    entry.hooks.on_deactivate = Some(hook);
                }
            }
        }

        let st = &mut *state.borrow_mut();
        let entry = st.registry.get(id).ok_or(CoreError::UnknownPanel(id))?;
        let element = entry
            .element
            .ok_or_else(|| CoreError::MissingElement(entry.anchor.clone()))?;
        st.dom.add_class(element, CLASS_DEACTIVATED);
        Ok(())
    }

    /// Update the header, show the incoming element and run its
    /// `on_activate` hook; always write `active_panel_id` last, so a
    /// nested transition from the hook is overwritten by the outer
    /// target. Internal step of [`Engine::transition`].
    fn activate(
        state: &Rc<RefCell<EngineState>>,
        target: Option<PanelId>,
        args: PanelArgs,
    ) -> Result<(), CoreError> {
        let Some(id) = target else {
            state.borrow_mut().active = None;
            return Ok(());
        };

        let hook = {
            let st = &mut *state.borrow_mut();
            let entry = st.registry.get(id).ok_or(CoreError::UnknownPanel(id))?;
            let element = entry
                .element
                .ok_or_else(|| CoreError::MissingElement(entry.anchor.clone()))?;
            let title = entry.title.clone();

            let header = st
                .header
                .ok_or_else(|| CoreError::MissingElement(HEADER_ANCHOR.to_string()))?;
            st.dom.set_text(header, title);
            st.dom.remove_class(element, CLASS_DEACTIVATED);
            st.registry
                .get_mut(id)
                .and_then(|e| e.hooks.on_activate.take())
        };
        if let Some(mut hook) = hook {
            hook(args);
            let mut st = state.borrow_mut();
            if let Some(entry) = st.registry.get_mut(id) {
                if entry.hooks.on_activate.is_none() {
                    entry.hooks.on_activate = Some(hook);
                }
            }
        }

        state.borrow_mut().active = Some(id);
        Ok(())
    }
}

impl Transitioner for Engine {
    fn transition(&self, target: Option<PanelId>, args: PanelArgs) -> Result<(), CoreError> {
        Engine::transition(self, target, args)
    }
}

/// Weak handle to the engine, handed to panels during bootstrap.
struct EngineHandle {
    state: Weak<RefCell<EngineState>>,
}

impl Transitioner for EngineHandle {
    fn transition(&self, target: Option<PanelId>, args: PanelArgs) -> Result<(), CoreError> {
        let state = self.state.upgrade().ok_or(CoreError::EngineClosed)?;
        Engine::transition_on(&state, target, args)
    }
}
