//! Panel registry.

use markvault_core::{CoreError, ElementId, PanelDescriptor, PanelHooks, PanelId};

/// One registered panel: its descriptor fields plus the markup element
/// bound during bootstrap.
pub struct PanelEntry {
    pub id: PanelId,
    /// Title shown in the popup header while this panel is active.
    pub title: String,
    /// Name of the markup element this panel shows and hides.
    pub anchor: String,
    /// Bound element, `None` until bootstrap resolves the anchor.
    pub element: Option<ElementId>,
    /// Lifecycle hooks.
    pub hooks: PanelHooks,
}

impl From<PanelDescriptor> for PanelEntry {
    fn from(descriptor: PanelDescriptor) -> Self {
        Self {
            id: descriptor.id,
            title: descriptor.title,
            anchor: descriptor.element,
            element: None,
            hooks: descriptor.hooks,
        }
    }
}

/// Fixed set of panels, populated once at startup.
///
/// Lookup by id; iteration follows registration order, which is also
/// the order the bootstrap binding pass runs in.
pub struct Registry {
    entries: Vec<PanelEntry>,
}

impl Registry {
    /// Build the registry, rejecting duplicate ids.
    pub fn new(descriptors: Vec<PanelDescriptor>) -> Result<Self, CoreError> {
        let mut entries: Vec<PanelEntry> = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if entries.iter().any(|e| e.id == descriptor.id) {
                return Err(CoreError::DuplicatePanel(descriptor.id));
            }
            entries.push(descriptor.into());
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: PanelId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn get(&self, id: PanelId) -> Option<&PanelEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: PanelId) -> Option<&mut PanelEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    /// Panel ids in registration order.
    pub fn ids(&self) -> Vec<PanelId> {
        self.entries.iter().map(|e| e.id).collect()
    }
}
