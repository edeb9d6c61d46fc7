//! # Checkout Page
//!
//! Browser entry point: wires the page's form, provider keys, status region
//! and payment scripts into a [`CheckoutOrchestrator`].
//!
//! ```javascript
//! const page = new CheckoutPage('checkout-form');
//!
//! radios.forEach((r) => r.addEventListener('change', () => page.payment_method_changed(r.value)));
//! card.on('change', (e) => page.card_changed(e.error ? e.error.message : undefined));
//!
//! form.addEventListener('submit', async (event) => {
//!   event.preventDefault();
//!   const pm = await tokenizeCard(); // undefined unless paying by card
//!   const report = await page.submit(pm);
//! });
//! ```

use crate::dom::{render_card_error, DomStatusSurface, CARD_ERRORS_ID};
use crate::page::{self, absolute_url, read_order_form, read_page_credentials};
use crate::widget::RazorpayWidget;
use checkout_client::{Attempt, CheckoutOrchestrator};
use checkout_core::{CheckoutConfig, CheckoutError, ProviderKind};
use checkout_gateways::{build_registry, CardElement, PageProviders};
use js_sys::Promise;
use std::rc::Rc;
use std::sync::Arc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::HtmlFormElement;

/// Card gateway script global
const CARD_GATEWAY_GLOBAL: &str = "Stripe";

fn js_error(err: CheckoutError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// One checkout form and the orchestrator driving it
#[wasm_bindgen]
pub struct CheckoutPage {
    orchestrator: Rc<CheckoutOrchestrator>,
    form: HtmlFormElement,
    card: Option<CardElement>,
}

#[wasm_bindgen]
impl CheckoutPage {
    /// Initialize against the form with the given id.
    ///
    /// Reads the endpoint from `data-checkout-endpoint`, the anti-forgery
    /// token from the form, and the provider keys from `<meta>` tags. Keys are
    /// read once; the card section is projected for the initially checked
    /// payment method.
    #[wasm_bindgen(constructor)]
    pub fn new(form_id: &str) -> Result<CheckoutPage, JsValue> {
        let form = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(form_id))
            .ok_or_else(|| JsValue::from_str(&format!("No element #{}", form_id)))?
            .dyn_into::<HtmlFormElement>()
            .map_err(|_| JsValue::from_str(&format!("#{} is not a form", form_id)))?;

        let endpoint = form
            .dataset()
            .get(page::ENDPOINT_DATA_KEY)
            .ok_or_else(|| JsValue::from_str("Form has no data-checkout-endpoint"))?;

        let config = CheckoutConfig::new(absolute_url(&endpoint)?)
            .with_csrf_token(page::csrf_token(&form))
            .with_credentials(read_page_credentials());
        config.validate().map_err(js_error)?;

        // The element exists only where the gateway script could initialize it
        let card = if config.credentials.card_key().is_some()
            && page::global_defined(CARD_GATEWAY_GLOBAL)
        {
            Some(CardElement::mount_untokenized())
        } else {
            None
        };

        let mut providers = PageProviders::new().with_widget(Arc::new(RazorpayWidget));
        if let Some(card) = &card {
            spawn_card_error_renderer(card);
            providers = providers.with_card_element(card.clone());
        }

        let registry = build_registry(&config, providers).map_err(js_error)?;
        let surface = Arc::new(DomStatusSurface::default());
        let orchestrator =
            CheckoutOrchestrator::with_http(config, registry, surface).map_err(js_error)?;
        orchestrator.refresh_card_section(page::checked_payment_method(&form).as_deref());

        Ok(Self {
            orchestrator: Rc::new(orchestrator),
            form,
            card,
        })
    }

    /// A payment-method radio changed
    pub fn payment_method_changed(&self, method: &str) {
        self.orchestrator.refresh_card_section(Some(method));
    }

    /// The card element changed; `error` is its validation message, if any
    pub fn card_changed(&self, error: Option<String>) {
        if let Some(card) = &self.card {
            card.report_change(error);
        }
    }

    /// Whether card payments can be confirmed on this page
    pub fn card_ready(&self) -> bool {
        self.orchestrator
            .registry()
            .is_ready(ProviderKind::CardGateway)
    }

    /// Run one attempt with the form as currently filled in.
    ///
    /// `card_payment_method` is the tokenized card (pm_...) when paying by
    /// card. Resolves with the attempt report as JSON, `null` when the form is
    /// invalid (the browser shows why), or `undefined` when an attempt is
    /// already processing.
    pub fn submit(&self, card_payment_method: Option<String>) -> Promise {
        if let (Some(card), Some(pm)) = (&self.card, card_payment_method) {
            card.set_payment_method(pm);
        }

        let order = read_order_form(&self.form);
        let orchestrator = Rc::clone(&self.orchestrator);
        let form = self.form.clone();

        future_to_promise(async move {
            match orchestrator.submit(&order).await {
                Attempt::Completed(report) => serde_json::to_string(&report)
                    .map(|json| JsValue::from_str(&json))
                    .map_err(|e| JsValue::from_str(&e.to_string())),
                Attempt::Rejected(_) => {
                    form.report_validity();
                    Ok(JsValue::NULL)
                }
                Attempt::Ignored => Ok(JsValue::UNDEFINED),
            }
        })
    }
}

/// Mirror the card element's validation errors into the page until the
/// element goes away
fn spawn_card_error_renderer(card: &CardElement) {
    let mut errors = card.subscribe_errors();
    spawn_local(async move {
        while errors.changed().await.is_ok() {
            let error = errors.borrow_and_update().clone();
            render_card_error(CARD_ERRORS_ID, error.as_deref());
        }
    });
}
