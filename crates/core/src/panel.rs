//! Panel identity, descriptors and lifecycle hooks.
//!
//! Panels are registered as descriptors and never call each other
//! directly: every switch goes through a [`Transitioner`], which runs the
//! outgoing panel's deactivation before the incoming panel's activation.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crossterm::event::KeyEvent;
use ratatui::{buffer::Buffer, layout::Rect};
use markvault_theme::Theme;

use crate::error::{CoreError, SetupError};
use crate::event::PanelEvent;

/// Identifier of a popup panel.
///
/// The set of panels is closed: the popup ships with exactly these
/// screens, and transitions are validated against the registry at
/// runtime, so an id that was never registered is still a reachable
/// error case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanelId {
    Authentication,
    Blank,
    ConfirmationDialog,
    Error,
    GetStarted,
    MainMenu,
    OnHold,
    PasswordSetup,
    Success,
}

impl PanelId {
    /// All panel ids, in registration order.
    pub const ALL: [PanelId; 9] = [
        PanelId::Authentication,
        PanelId::Blank,
        PanelId::ConfirmationDialog,
        PanelId::Error,
        PanelId::GetStarted,
        PanelId::MainMenu,
        PanelId::OnHold,
        PanelId::PasswordSetup,
        PanelId::Success,
    ];

    /// Stable snake_case name used in logs and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelId::Authentication => "authentication",
            PanelId::Blank => "blank",
            PanelId::ConfirmationDialog => "confirmation_dialog",
            PanelId::Error => "error",
            PanelId::GetStarted => "get_started",
            PanelId::MainMenu => "main_menu",
            PanelId::OnHold => "on_hold",
            PanelId::PasswordSetup => "password_setup",
            PanelId::Success => "success",
        }
    }

    /// Name of the markup element this panel shows and hides.
    ///
    /// Derived from the id: underscores become hyphens and a `-panel`
    /// suffix is appended, e.g. `confirmation_dialog` binds
    /// `confirmation-dialog-panel`.
    pub fn element_anchor(&self) -> String {
        format!("{}-panel", self.as_str().replace('_', "-"))
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque payload delivered to a panel's activation hook.
///
/// Transitions forward the payload without inspecting it; only the
/// receiving panel knows the concrete type and downcasts it.
#[derive(Default)]
pub struct PanelArgs(Option<Box<dyn Any>>);

impl PanelArgs {
    /// No payload.
    pub fn none() -> Self {
        Self(None)
    }

    /// Wrap a payload value.
    pub fn new<T: Any>(value: T) -> Self {
        Self(Some(Box::new(value)))
    }

    /// Whether a payload is present.
    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Take the payload as `T`, consuming the args.
    ///
    /// Returns `None` when no payload is present or it has a different
    /// concrete type.
    pub fn downcast<T: Any>(self) -> Option<T> {
        self.0.and_then(|b| b.downcast::<T>().ok()).map(|b| *b)
    }

    /// Borrow the payload as `T` without consuming the args.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|a| a.downcast_ref::<T>())
    }
}

impl fmt::Debug for PanelArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_some() {
            f.write_str("PanelArgs(..)")
        } else {
            f.write_str("PanelArgs(none)")
        }
    }
}

/// Payload for the error panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    /// Short headline shown as the error title.
    pub title: String,
    /// Human-readable description of what failed.
    pub message: String,
}

impl ErrorDetails {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Switches the visible panel.
///
/// Implemented by the panel engine; panels only ever see it behind a
/// [`TransitionHandle`] delivered through their `on_transition` hook.
pub trait Transitioner {
    /// Deactivate the current panel (if any), then activate `target`
    /// with `args`. `None` leaves the popup with no active panel.
    fn transition(&self, target: Option<PanelId>, args: PanelArgs) -> Result<(), CoreError>;
}

/// Shared, cloneable handle to the panel engine.
pub type TransitionHandle = Rc<dyn Transitioner>;

/// Hook run when a panel becomes active, with the transition payload.
pub type ActivateHook = Box<dyn FnMut(PanelArgs)>;

/// Hook run when a panel stops being active.
pub type DeactivateHook = Box<dyn FnMut()>;

/// Hook run once during bootstrap to hand the panel its
/// [`TransitionHandle`].
pub type TransitionHook = Box<dyn FnOnce(TransitionHandle)>;

/// Optional lifecycle hooks of a panel.
///
/// Every hook is independent: a panel may install any subset, and a
/// panel with no hooks at all is still a valid registration.
#[derive(Default)]
pub struct PanelHooks {
    /// Runs after the panel's header title is applied and its element
    /// is shown, before the panel becomes the active one.
    pub on_activate: Option<ActivateHook>,
    /// Runs before the panel's element is hidden.
    pub on_deactivate: Option<DeactivateHook>,
    /// Runs once during bootstrap; receives the transition handle.
    pub on_transition: Option<TransitionHook>,
}

impl PanelHooks {
    /// No hooks installed.
    pub fn none() -> Self {
        Self::default()
    }
}

impl fmt::Debug for PanelHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelHooks")
            .field("on_activate", &self.on_activate.is_some())
            .field("on_deactivate", &self.on_deactivate.is_some())
            .field("on_transition", &self.on_transition.is_some())
            .finish()
    }
}

/// Registration record of a single panel.
#[derive(Debug)]
pub struct PanelDescriptor {
    /// Panel identity.
    pub id: PanelId,
    /// Title shown in the popup header while the panel is active.
    pub title: String,
    /// Name of the markup element the panel shows and hides.
    pub element: String,
    /// Lifecycle hooks.
    pub hooks: PanelHooks,
}

impl PanelDescriptor {
    /// Descriptor with the element anchor derived from the id and no
    /// hooks installed.
    pub fn new(id: PanelId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            element: id.element_anchor(),
            hooks: PanelHooks::none(),
        }
    }

    /// Same as [`PanelDescriptor::new`] with hooks attached.
    pub fn with_hooks(id: PanelId, title: impl Into<String>, hooks: PanelHooks) -> Self {
        Self {
            hooks,
            ..Self::new(id, title)
        }
    }

    /// The placeholder panel the popup starts on: empty title, no
    /// hooks, nothing to do.
    pub fn blank() -> Self {
        Self::new(PanelId::Blank, "")
    }
}

/// A panel's registration paired with its interactive view.
pub struct PanelModule {
    pub descriptor: PanelDescriptor,
    pub view: Box<dyn PanelView>,
}

/// Trait for the interactive face of a panel.
///
/// Views communicate with the application through [`PanelEvent`]s
/// instead of directly modifying application state.
pub trait PanelView {
    /// Which panel this view draws.
    fn id(&self) -> PanelId;

    /// Render the panel body to the buffer.
    fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme);

    /// Handle keyboard input.
    ///
    /// Returns a list of events to be processed by the application.
    fn handle_key(&mut self, key: KeyEvent) -> Vec<PanelEvent>;

    /// Periodic tick for countdowns and background work.
    fn tick(&mut self) -> Vec<PanelEvent> {
        vec![]
    }
}

/// Capability the bootstrap sequence queries to pick the first panel.
pub trait SetupProbe {
    /// Whether the vault still needs first-run setup.
    fn needs_setup(&self) -> Result<bool, SetupError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_id_names_are_stable() {
        assert_eq!(PanelId::Authentication.as_str(), "authentication");
        assert_eq!(PanelId::ConfirmationDialog.as_str(), "confirmation_dialog");
        assert_eq!(PanelId::MainMenu.as_str(), "main_menu");
        assert_eq!(PanelId::Blank.to_string(), "blank");
    }

    #[test]
    fn test_element_anchor_derivation() {
        assert_eq!(PanelId::MainMenu.element_anchor(), "main-menu-panel");
        assert_eq!(
            PanelId::ConfirmationDialog.element_anchor(),
            "confirmation-dialog-panel"
        );
        assert_eq!(PanelId::Error.element_anchor(), "error-panel");
    }

    #[test]
    fn test_all_ids_have_unique_anchors() {
        let mut anchors: Vec<String> = PanelId::ALL.iter().map(|id| id.element_anchor()).collect();
        anchors.sort();
        anchors.dedup();
        assert_eq!(anchors.len(), PanelId::ALL.len());
    }

    #[test]
    fn test_panel_args_roundtrip() {
        let args = PanelArgs::new(ErrorDetails::new("Oops", "it broke"));
        assert!(!args.is_none());
        assert_eq!(
            args.downcast_ref::<ErrorDetails>().map(|d| d.title.as_str()),
            Some("Oops")
        );
        let details = args.downcast::<ErrorDetails>();
        assert_eq!(details.map(|d| d.message), Some("it broke".to_string()));
    }

    #[test]
    fn test_panel_args_wrong_type_is_none() {
        let args = PanelArgs::new(42u32);
        assert!(args.downcast_ref::<String>().is_none());
        assert!(args.downcast::<String>().is_none());
    }

    #[test]
    fn test_panel_args_none_downcasts_to_nothing() {
        let args = PanelArgs::none();
        assert!(args.is_none());
        assert!(args.downcast::<u32>().is_none());
    }

    #[test]
    fn test_blank_descriptor_shape() {
        let blank = PanelDescriptor::blank();
        assert_eq!(blank.id, PanelId::Blank);
        assert_eq!(blank.title, "");
        assert_eq!(blank.element, "blank-panel");
        assert!(blank.hooks.on_activate.is_none());
        assert!(blank.hooks.on_deactivate.is_none());
        assert!(blank.hooks.on_transition.is_none());
    }

    #[test]
    fn test_descriptor_derives_anchor_from_id() {
        let d = PanelDescriptor::new(PanelId::GetStarted, "Welcome");
        assert_eq!(d.element, "get-started-panel");
        assert_eq!(d.title, "Welcome");
    }
}
