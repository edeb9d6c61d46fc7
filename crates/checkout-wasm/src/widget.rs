//! `window.Razorpay` as a [`RedirectWidget`].

use crate::page::global_defined;
use checkout_core::{CheckoutError, CheckoutResult, RedirectWidget, WidgetCallbacks, WidgetSession};
use checkout_gateways::redirect::WIDGET_MISSING_MESSAGE;
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

/// Global constructor name
const WIDGET_GLOBAL: &str = "Razorpay";

/// Widget backed by the page's Razorpay checkout script.
///
/// Holds no JS handles; the global is looked up at call time.
#[derive(Debug, Clone, Copy, Default)]
pub struct RazorpayWidget;

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
}

fn method(target: &JsValue, name: &str) -> Result<Function, JsValue> {
    Reflect::get(target, &JsValue::from_str(name))?.dyn_into::<Function>()
}

/// `response.error.description` of a payment.failed event
fn failure_description(response: &JsValue) -> Option<String> {
    Reflect::get(response, &JsValue::from_str("error"))
        .ok()
        .and_then(|error| Reflect::get(&error, &JsValue::from_str("description")).ok())
        .and_then(|d| d.as_string())
}

fn js_error(context: &str, err: JsValue) -> CheckoutError {
    let detail = err.as_string().unwrap_or_else(|| format!("{:?}", err));
    CheckoutError::Internal(format!("{}: {}", context, detail))
}

impl RazorpayWidget {
    fn options(session: &WidgetSession, callbacks: &WidgetCallbacks) -> Result<Object, JsValue> {
        let options = Object::new();
        set(&options, "key", &JsValue::from_str(&session.key))?;
        set(&options, "amount", &JsValue::from_f64(session.amount as f64))?;
        set(&options, "currency", &JsValue::from_str(&session.currency))?;
        set(&options, "order_id", &JsValue::from_str(&session.order_id))?;
        set(&options, "name", &JsValue::from_str(&session.name))?;
        set(&options, "description", &JsValue::from_str(&session.description))?;
        set(&options, "retry", &JsValue::from_bool(session.retry))?;

        let theme = Object::new();
        set(&theme, "color", &JsValue::from_str(&session.theme_color))?;
        set(&options, "theme", &theme)?;

        let on_complete = callbacks.clone();
        let handler = Closure::once_into_js(move |_response: JsValue| on_complete.complete());
        set(&options, "handler", &handler)?;

        let on_dismiss = callbacks.clone();
        let modal = Object::new();
        let ondismiss = Closure::once_into_js(move || on_dismiss.dismissed());
        set(&modal, "ondismiss", &ondismiss)?;
        set(&options, "modal", &modal)?;

        Ok(options)
    }
}

impl RedirectWidget for RazorpayWidget {
    fn is_loaded(&self) -> bool {
        global_defined(WIDGET_GLOBAL)
    }

    fn open(&self, session: WidgetSession, callbacks: WidgetCallbacks) -> CheckoutResult<()> {
        let window = web_sys::window()
            .ok_or_else(|| CheckoutError::Internal("No window available".to_string()))?;
        let constructor = method(&window, WIDGET_GLOBAL).map_err(|_| {
            CheckoutError::ProviderScriptMissing(WIDGET_MISSING_MESSAGE.to_string())
        })?;

        let options = Self::options(&session, &callbacks)
            .map_err(|e| js_error("Failed to build widget options", e))?;
        let instance = Reflect::construct(&constructor, &Array::of1(&options))
            .map_err(|e| js_error("Failed to create widget", e))?;

        let on_failed = callbacks;
        let failed = Closure::once_into_js(move |response: JsValue| {
            on_failed.payment_failed(failure_description(&response).as_deref())
        });
        method(&instance, "on")
            .and_then(|on| on.call2(&instance, &JsValue::from_str("payment.failed"), &failed))
            .map_err(|e| js_error("Failed to subscribe to payment.failed", e))?;

        method(&instance, "open")
            .and_then(|open| open.call0(&instance))
            .map_err(|e| js_error("Failed to open widget", e))?;

        Ok(())
    }
}
