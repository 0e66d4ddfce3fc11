//! Element store backing the popup markup.
//!
//! The popup is organized like the browser-action page it mirrors: a
//! header bar plus one named element per panel. Panels never draw
//! themselves visible or hidden directly; they toggle the `deactivated`
//! class on their element and the renderer derives visibility from it.

use std::collections::{BTreeSet, HashMap};

use crate::error::CoreError;

/// Name of the header bar element.
pub const HEADER_ANCHOR: &str = "header";

/// Class carried by every hidden panel element.
pub const CLASS_DEACTIVATED: &str = "deactivated";

/// Handle to an element inside a [`Dom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

/// A named element with a class list and text content.
#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    classes: BTreeSet<String>,
    text: String,
}

impl Element {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            classes: BTreeSet::new(),
            text: String::new(),
        }
    }
}

/// Flat store of named elements.
#[derive(Debug, Default)]
pub struct Dom {
    elements: Vec<Element>,
    index: HashMap<String, ElementId>,
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an element with the given name, or return the existing
    /// one.
    pub fn insert(&mut self, name: &str) -> ElementId {
        if let Some(id) = self.index.get(name) {
            return *id;
        }
        let id = ElementId(self.elements.len());
        self.elements.push(Element::new(name));
        self.index.insert(name.to_string(), id);
        id
    }

    /// Look up an element by name.
    pub fn bind(&self, name: &str) -> Result<ElementId, CoreError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| CoreError::MissingElement(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        self.elements[id.0].classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        self.elements[id.0].classes.remove(class);
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements[id.0].classes.contains(class)
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        self.elements[id.0].text = text.into();
    }

    pub fn text(&self, id: ElementId) -> &str {
        &self.elements[id.0].text
    }

    pub fn name(&self, id: ElementId) -> &str {
        &self.elements[id.0].name
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_bind() {
        let mut dom = Dom::new();
        let id = dom.insert("header");
        assert_eq!(dom.bind("header"), Ok(id));
        assert!(dom.contains("header"));
        assert_eq!(dom.len(), 1);
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut dom = Dom::new();
        let first = dom.insert("error-panel");
        let second = dom.insert("error-panel");
        assert_eq!(first, second);
        assert_eq!(dom.len(), 1);
    }

    #[test]
    fn test_bind_missing_element() {
        let dom = Dom::new();
        assert_eq!(
            dom.bind("nope"),
            Err(CoreError::MissingElement("nope".to_string()))
        );
    }

    #[test]
    fn test_class_toggling() {
        let mut dom = Dom::new();
        let id = dom.insert("main-menu-panel");
        assert!(!dom.has_class(id, CLASS_DEACTIVATED));

        dom.add_class(id, CLASS_DEACTIVATED);
        assert!(dom.has_class(id, CLASS_DEACTIVATED));

        // Adding twice is harmless
        dom.add_class(id, CLASS_DEACTIVATED);
        dom.remove_class(id, CLASS_DEACTIVATED);
        assert!(!dom.has_class(id, CLASS_DEACTIVATED));
    }

    #[test]
    fn test_text_content() {
        let mut dom = Dom::new();
        let id = dom.insert(HEADER_ANCHOR);
        assert_eq!(dom.text(id), "");

        dom.set_text(id, "Main menu");
        assert_eq!(dom.text(id), "Main menu");
        assert_eq!(dom.name(id), "header");

        dom.set_text(id, "Authentication");
        assert_eq!(dom.text(id), "Authentication");
    }
}
