//! Page-embedded configuration and the checkout form as the DOM holds it.

use checkout_core::config::{CARD_KEY_META, REDIRECT_KEY_META};
use checkout_core::form::PAYMENT_METHOD_FIELD;
use checkout_core::{FieldKind, FormField, OrderForm, ProviderCredentials};
use js_sys::Reflect;
use std::collections::HashMap;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Element, HtmlFormElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, Url,
};

/// Hidden input carrying the anti-forgery token
pub const CSRF_INPUT: &str = "csrfmiddlewaretoken";

/// `data-checkout-endpoint` on the form
pub const ENDPOINT_DATA_KEY: &str = "checkoutEndpoint";

/// CSS selector for a named meta tag
pub fn meta_selector(name: &str) -> String {
    format!("meta[name=\"{}\"]", name)
}

fn meta_content(name: &str) -> Option<String> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.query_selector(&meta_selector(name)).ok().flatten())
        .and_then(|el| el.get_attribute("content"))
}

/// Read the provider keys once, at page initialization
pub fn read_page_credentials() -> ProviderCredentials {
    let mut meta = HashMap::new();
    for name in [CARD_KEY_META, REDIRECT_KEY_META] {
        if let Some(content) = meta_content(name) {
            meta.insert(name.to_string(), content);
        }
    }
    ProviderCredentials::from_meta(&meta)
}

/// Whether a script has defined `window[name]`
pub fn global_defined(name: &str) -> bool {
    web_sys::window()
        .map(|w| Reflect::has(&w, &JsValue::from_str(name)).unwrap_or(false))
        .unwrap_or(false)
}

/// Resolve the form's endpoint against the page URL
pub fn absolute_url(endpoint: &str) -> Result<String, JsValue> {
    let base = web_sys::window()
        .ok_or_else(|| JsValue::from_str("No window available"))?
        .location()
        .href()?;
    Ok(Url::new_with_base(endpoint, &base)?.href())
}

/// One named control of the checkout form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInput {
    pub name: String,
    /// Input `type`, or the tag name for selects and textareas
    pub input_type: String,
    pub value: String,
    pub required: bool,
    pub checked: bool,
}

/// Build the order form from its controls, the way the browser serializes
/// them: unchecked radios and checkboxes carry no value, buttons are skipped,
/// and the `payment_method` radios become the offered methods.
pub fn order_form_from_inputs<I>(inputs: I) -> OrderForm
where
    I: IntoIterator<Item = PageInput>,
{
    let mut form = OrderForm::new();
    let mut options = Vec::new();
    let mut checked = None;

    for input in inputs {
        match input.input_type.as_str() {
            "submit" | "button" | "reset" | "image" => {}
            "radio" if input.name == PAYMENT_METHOD_FIELD => {
                if input.checked {
                    checked = Some(input.value.clone());
                }
                options.push(input.value);
            }
            "radio" | "checkbox" => {
                if input.checked {
                    let value = if input.value.is_empty() {
                        "on".to_string()
                    } else {
                        input.value
                    };
                    form = form.field(input.name, value);
                }
            }
            other => {
                let kind = if other == "number" {
                    FieldKind::Number
                } else {
                    FieldKind::Text
                };
                form = form.with_field(FormField {
                    name: input.name,
                    value: input.value,
                    required: input.required,
                    kind,
                });
            }
        }
    }

    let form = form.payment_options(options);
    match checked {
        Some(method) => form.select_payment_method(method),
        None => form,
    }
}

fn page_input(el: Element) -> Option<PageInput> {
    let name = el.get_attribute("name").filter(|n| !n.is_empty())?;
    let required = el.has_attribute("required");

    let (input_type, value, checked) = if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        (input.type_().to_ascii_lowercase(), input.value(), input.checked())
    } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
        ("select".to_string(), select.value(), false)
    } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        ("textarea".to_string(), area.value(), false)
    } else {
        return None;
    };

    Some(PageInput {
        name,
        input_type,
        value,
        required,
        checked,
    })
}

/// Named controls of a form, in document order
pub fn read_inputs(form: &HtmlFormElement) -> Vec<PageInput> {
    let Ok(nodes) = form.query_selector_all("input[name], select[name], textarea[name]") else {
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .filter_map(page_input)
        .collect()
}

/// The checkout form as the customer filled it in
pub fn read_order_form(form: &HtmlFormElement) -> OrderForm {
    order_form_from_inputs(read_inputs(form))
}

/// Currently checked payment method, if any
pub fn checked_payment_method(form: &HtmlFormElement) -> Option<String> {
    read_order_form(form).payment_method().map(String::from)
}

/// Anti-forgery token from the form's hidden input
pub fn csrf_token(form: &HtmlFormElement) -> String {
    read_inputs(form)
        .into_iter()
        .find(|input| input.name == CSRF_INPUT)
        .map(|input| input.value)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::FormValidator;

    fn input(name: &str, input_type: &str, value: &str) -> PageInput {
        PageInput {
            name: name.into(),
            input_type: input_type.into(),
            value: value.into(),
            required: false,
            checked: false,
        }
    }

    fn checked(mut input: PageInput) -> PageInput {
        input.checked = true;
        input
    }

    fn required(mut input: PageInput) -> PageInput {
        input.required = true;
        input
    }

    #[test]
    fn test_meta_selector() {
        assert_eq!(
            meta_selector("stripe-public-key"),
            "meta[name=\"stripe-public-key\"]"
        );
    }

    #[test]
    fn test_checkout_form_from_inputs() {
        let form = order_form_from_inputs([
            input(CSRF_INPUT, "hidden", "tok"),
            required(input("address_id", "select", "3")),
            input("delivery_fee", "number", "40"),
            input("payment_method", "radio", "cod"),
            checked(input("payment_method", "radio", "stripe")),
            input("payment_method", "radio", "razorpay"),
            input("save_address", "checkbox", ""),
            input("place", "submit", "Place order"),
        ]);

        assert_eq!(form.payment_method(), Some("stripe"));
        assert_eq!(form.offered_payment_methods(), ["cod", "stripe", "razorpay"]);

        let names: Vec<&str> = form.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec![CSRF_INPUT, "address_id", "delivery_fee"]);
        assert_eq!(form.fields()[2].kind, FieldKind::Number);
        assert!(FormValidator::new().validate(&form));
    }

    #[test]
    fn test_unchecked_payment_method_fails_validation() {
        let form = order_form_from_inputs([
            required(input("address_id", "select", "")),
            input("payment_method", "radio", "cod"),
        ]);

        assert_eq!(form.payment_method(), None);
        let report = FormValidator::new().check(&form).unwrap_err();
        assert_eq!(report.violations.len(), 2);
    }

    #[test]
    fn test_checked_checkbox_defaults_to_on() {
        let form = order_form_from_inputs([checked(input("save_address", "checkbox", ""))]);
        assert_eq!(form.fields()[0].value, "on");
    }
}
