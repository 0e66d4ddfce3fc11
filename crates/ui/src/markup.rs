//! Static popup markup.
//!
//! Mirrors the browser-action page this popup is a companion of: one
//! header bar plus one element per panel, addressed by the anchors the
//! bootstrap pass binds. Everything but the blank placeholder starts
//! hidden.

use markvault_core::{Dom, PanelId, CLASS_DEACTIVATED, HEADER_ANCHOR};

/// Build the popup markup.
pub fn popup_markup() -> Dom {
    let mut dom = Dom::new();
    dom.insert(HEADER_ANCHOR);
    for id in PanelId::ALL {
        let element = dom.insert(&id.element_anchor());
        if id != PanelId::Blank {
            dom.add_class(element, CLASS_DEACTIVATED);
        }
    }
    dom
}
