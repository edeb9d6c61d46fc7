//! # checkout-wasm
//!
//! Browser bindings for lightning-checkout.
//!
//! This crate provides:
//! - `CheckoutPage`: the page entry point driving checkout attempts
//! - `DomStatusSurface`: the status alert, submit button and card section
//! - `RazorpayWidget`: the redirect gateway widget over `window.Razorpay`
//! - `read_page_credentials`: provider keys from `<meta>` tags
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { CheckoutPage } from 'lightning-checkout-wasm';
//!
//! await init();
//!
//! const page = new CheckoutPage('checkout-form');
//! form.addEventListener('submit', (event) => {
//!   event.preventDefault();
//!   page.submit();
//! });
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

pub mod checkout;
pub mod dom;
pub mod page;
pub mod widget;

pub use checkout::CheckoutPage;
pub use dom::DomStatusSurface;
pub use page::read_page_credentials;
pub use widget::RazorpayWidget;

use checkout_core::{FormValidator, OrderForm, ProviderKind, StatusKind, StatusSurface};
use wasm_bindgen::prelude::*;

fn parse_kind(kind: &str) -> Option<StatusKind> {
    match kind {
        "info" => Some(StatusKind::Info),
        "success" => Some(StatusKind::Success),
        "danger" => Some(StatusKind::Danger),
        _ => None,
    }
}

/// Alert class list for a status kind (unknown kinds render as info)
#[wasm_bindgen]
pub fn status_class(kind: &str) -> String {
    parse_kind(kind).unwrap_or(StatusKind::Info).alert_class()
}

/// Render a status message into the default status region
#[wasm_bindgen]
pub fn render_status(kind: &str, message: &str) {
    DomStatusSurface::default().report(parse_kind(kind).unwrap_or(StatusKind::Info), message);
}

/// Whether the card-input section should show for a payment method
#[wasm_bindgen]
pub fn card_section_visible(payment_method: &str, card_ready: bool) -> bool {
    card_ready && ProviderKind::parse(payment_method) == Some(ProviderKind::CardGateway)
}

/// Validate a form described as TOML; returns the violations, empty when valid
#[wasm_bindgen]
pub fn validate_form(form_toml: &str) -> Result<String, JsValue> {
    let form = OrderForm::from_toml_str(form_toml)
        .map_err(|e| JsValue::from_str(&format!("Invalid form: {}", e)))?;
    Ok(match FormValidator::new().check(&form) {
        Ok(()) => String::new(),
        Err(report) => report.to_string(),
    })
}

/// Whether the redirect gateway script is present
#[wasm_bindgen]
pub fn redirect_widget_loaded() -> bool {
    checkout_core::RedirectWidget::is_loaded(&RazorpayWidget)
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
