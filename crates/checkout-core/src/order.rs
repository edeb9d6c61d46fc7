//! # Order Submission Types
//!
//! Wire types exchanged with the order-creation endpoint.

use crate::error::{CheckoutError, CheckoutResult, ORDER_CREATION_FAILED};
use crate::form::{OrderForm, PAYMENT_METHOD_FIELD};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

/// Payment provider discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// In-page card tokenization (Stripe)
    #[serde(rename = "stripe", alias = "card-gateway")]
    CardGateway,
    /// Hosted widget with callback completion (Razorpay)
    #[serde(rename = "razorpay", alias = "redirect-gateway")]
    RedirectGateway,
    /// Offline settlement (Cash on Delivery)
    #[serde(rename = "cod", alias = "deferred-settlement")]
    DeferredSettlement,
}

impl ProviderKind {
    /// All variants, in registry order
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::CardGateway,
        ProviderKind::RedirectGateway,
        ProviderKind::DeferredSettlement,
    ];

    /// Parse a wire discriminator. Returns `None` for unrecognized values.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stripe" | "card-gateway" => Some(ProviderKind::CardGateway),
            "razorpay" | "redirect-gateway" => Some(ProviderKind::RedirectGateway),
            "cod" | "deferred-settlement" => Some(ProviderKind::DeferredSettlement),
            _ => None,
        }
    }

    /// Wire identifier, also used as the form's payment-method value
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::CardGateway => "stripe",
            ProviderKind::RedirectGateway => "razorpay",
            ProviderKind::DeferredSettlement => "cod",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialized order form, ready to post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSubmissionRequest {
    fields: Vec<(String, String)>,
}

impl OrderSubmissionRequest {
    /// Serialize a form. Fails unless exactly one payment method is selected.
    pub fn from_form(form: &OrderForm) -> CheckoutResult<Self> {
        let method = form.payment_method().ok_or_else(|| {
            CheckoutError::Validation("No payment method selected".to_string())
        })?;

        let mut fields: Vec<(String, String)> = form
            .fields()
            .iter()
            .filter(|f| f.name != PAYMENT_METHOD_FIELD)
            .map(|f| (f.name.clone(), f.value.clone()))
            .collect();
        fields.push((PAYMENT_METHOD_FIELD.to_string(), method.to_string()));

        Ok(Self { fields })
    }

    /// Form-encoded pairs in submission order
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// The selected payment-method identifier
    pub fn payment_method(&self) -> &str {
        self.get(PAYMENT_METHOD_FIELD).unwrap_or_default()
    }

    /// Look up a field value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Order reference echoed by the server.
///
/// The local order id is numeric; the redirect gateway's order id is a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderRef {
    Number(i64),
    Text(String),
}

impl fmt::Display for OrderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderRef::Number(n) => write!(f, "{}", n),
            OrderRef::Text(s) => f.write_str(s),
        }
    }
}

/// Server response to an order submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderSubmissionResponse {
    /// Provider discriminator (raw; resolved by the registry)
    #[serde(default)]
    pub provider: Option<String>,

    /// Local order id, or the gateway order id for the redirect gateway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderRef>,

    /// Order total as rendered by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<serde_json::Value>,

    /// Card gateway: payment intent client secret
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Card gateway: publishable key the intent was created under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publishable_key: Option<String>,

    /// Card gateway: payment intent id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent: Option<String>,

    /// Redirect gateway: amount in the smallest currency unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,

    /// Redirect gateway: ISO currency code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Redirect gateway: key id (falls back to the page key when empty)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
}

impl OrderSubmissionResponse {
    /// Parse a response body. Malformed JSON is a submission error carrying
    /// the generic order-creation message; the parser detail is only logged.
    pub fn from_json(body: &str) -> CheckoutResult<Self> {
        serde_json::from_str(body).map_err(|e| {
            error!("Unable to read order response: {}", e);
            CheckoutError::Submission(ORDER_CREATION_FAILED.to_string())
        })
    }

    /// Recognized provider, if any
    pub fn provider_kind(&self) -> Option<ProviderKind> {
        self.provider.as_deref().and_then(ProviderKind::parse)
    }

    /// Builder: response for a given provider (mostly for tests and fakes)
    pub fn for_provider(provider: impl Into<String>) -> Self {
        Self {
            provider: Some(provider.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::OrderForm;

    #[test]
    fn test_provider_parse() {
        assert_eq!(ProviderKind::parse("stripe"), Some(ProviderKind::CardGateway));
        assert_eq!(ProviderKind::parse("card-gateway"), Some(ProviderKind::CardGateway));
        assert_eq!(ProviderKind::parse("Razorpay"), Some(ProviderKind::RedirectGateway));
        assert_eq!(
            ProviderKind::parse("deferred-settlement"),
            Some(ProviderKind::DeferredSettlement)
        );
        assert_eq!(ProviderKind::parse("paypal"), None);
    }

    #[test]
    fn test_parse_razorpay_response() {
        let body = r#"{
            "order_id": "order_Nx1",
            "total": "499.00",
            "provider": "razorpay",
            "amount": 49900,
            "currency": "INR",
            "key_id": ""
        }"#;
        let response = OrderSubmissionResponse::from_json(body).unwrap();

        assert_eq!(response.provider_kind(), Some(ProviderKind::RedirectGateway));
        assert_eq!(response.order_id, Some(OrderRef::Text("order_Nx1".into())));
        assert_eq!(response.amount, Some(49900));
        assert_eq!(response.key_id.as_deref(), Some(""));
    }

    #[test]
    fn test_parse_cod_response_with_numeric_order() {
        let body = r#"{"order_id": 42, "total": "120.00", "provider": "cod"}"#;
        let response = OrderSubmissionResponse::from_json(body).unwrap();

        assert_eq!(response.order_id, Some(OrderRef::Number(42)));
        assert_eq!(response.order_id.unwrap().to_string(), "42");
    }

    #[test]
    fn test_malformed_body_is_submission_error() {
        let err = OrderSubmissionResponse::from_json("<html>oops</html>").unwrap_err();
        assert!(matches!(err, CheckoutError::Submission(_)));
        assert_eq!(err.user_message(), ORDER_CREATION_FAILED);
    }

    #[test]
    fn test_request_from_form() {
        let form = OrderForm::new()
            .required_field("address_id", "7")
            .field("coupon_code", "")
            .payment_options(["cod", "stripe"])
            .select_payment_method("stripe");

        let request = OrderSubmissionRequest::from_form(&form).unwrap();

        assert_eq!(request.payment_method(), "stripe");
        assert_eq!(request.get("address_id"), Some("7"));
        assert_eq!(request.fields().len(), 3);
    }

    #[test]
    fn test_request_requires_payment_method() {
        let form = OrderForm::new().required_field("address_id", "7");
        assert!(OrderSubmissionRequest::from_form(&form).is_err());
    }
}
