//! DOM projection of the checkout status region and submit control.

use checkout_core::{StatusKind, StatusSurface};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement};

/// Class hiding an element
pub const HIDDEN_CLASS: &str = "d-none";

/// Region the card element's validation errors render into
pub const CARD_ERRORS_ID: &str = "card-errors";

/// Element ids the surface renders into.
///
/// Elements are looked up on every render; ids that are missing from the page
/// are skipped silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomStatusSurface {
    pub status_id: String,
    pub submit_id: String,
    pub card_wrapper_id: String,
}

impl Default for DomStatusSurface {
    fn default() -> Self {
        Self {
            status_id: "checkout-status".to_string(),
            submit_id: "checkout-submit-btn".to_string(),
            card_wrapper_id: "stripe-card-wrapper".to_string(),
        }
    }
}

fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

fn element(id: &str) -> Option<Element> {
    document().and_then(|d| d.get_element_by_id(id))
}

/// Render the card element's validation error, or clear it
pub fn render_card_error(id: &str, error: Option<&str>) {
    if let Some(el) = element(id) {
        el.set_text_content(Some(error.unwrap_or("")));
    }
}

fn set_hidden(el: &Element, hidden: bool) {
    // toggle_with_force only fails on an invalid token
    let _ = el.class_list().toggle_with_force(HIDDEN_CLASS, hidden);
}

impl StatusSurface for DomStatusSurface {
    fn report(&self, kind: StatusKind, message: &str) {
        if let Some(el) = element(&self.status_id) {
            el.set_class_name(&kind.alert_class());
            el.set_text_content(Some(message));
        }
    }

    fn set_busy(&self, busy: bool) {
        let Some(button) = element(&self.submit_id)
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
        else {
            return;
        };
        button.set_disabled(busy);

        let spinner = button.query_selector(".spinner-border").ok().flatten();
        let label = button.query_selector(".default-label").ok().flatten();
        if let (Some(spinner), Some(label)) = (spinner, label) {
            set_hidden(&spinner, !busy);
            set_hidden(&label, busy);
        }
    }

    fn show_card_section(&self, visible: bool) {
        if let Some(el) = element(&self.card_wrapper_id) {
            set_hidden(&el, !visible);
        }
    }
}
