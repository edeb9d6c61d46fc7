//! # Order Submission Client
//!
//! Posts the serialized checkout form to the order-creation endpoint and
//! parses the JSON answer. One call per submission; the orchestrator is the
//! one that prevents concurrent calls.

use async_trait::async_trait;
use checkout_core::error::ORDER_CREATION_FAILED;
use checkout_core::{
    CheckoutConfig, CheckoutError, CheckoutResult, OrderSubmissionRequest, OrderSubmissionResponse,
};
use reqwest::Client;
use tracing::{debug, error, instrument};

/// Marks the request as an in-page (ajax) submission
pub const AJAX_HEADER: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

/// Order-creation endpoint client
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait OrderSubmitter: Send + Sync {
    async fn submit(
        &self,
        request: &OrderSubmissionRequest,
    ) -> CheckoutResult<OrderSubmissionResponse>;
}

/// HTTP order submitter
pub struct HttpOrderSubmitter {
    endpoint: String,
    csrf_header: String,
    csrf_token: String,
    client: Client,
}

impl HttpOrderSubmitter {
    pub fn new(config: &CheckoutConfig) -> CheckoutResult<Self> {
        let builder = Client::builder();
        // The browser's fetch owns timeouts on wasm32
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(config.request_timeout());

        let client = builder.build().map_err(|e| {
            CheckoutError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            csrf_header: config.csrf_header.clone(),
            csrf_token: config.csrf_token.clone(),
            client,
        })
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl OrderSubmitter for HttpOrderSubmitter {
    #[instrument(skip(self, request), fields(payment_method = %request.payment_method()))]
    async fn submit(
        &self,
        request: &OrderSubmissionRequest,
    ) -> CheckoutResult<OrderSubmissionResponse> {
        debug!("Submitting order: {} fields", request.fields().len());

        let response = self
            .client
            .post(&self.endpoint)
            .header(self.csrf_header.as_str(), self.csrf_token.as_str())
            .header(AJAX_HEADER.0, AJAX_HEADER.1)
            .form(request.fields())
            .send()
            .await
            .map_err(|e| {
                error!("Order submission request failed: {}", e);
                CheckoutError::Submission(ORDER_CREATION_FAILED.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Order endpoint returned status={}", status);
            return Err(CheckoutError::Submission(ORDER_CREATION_FAILED.to_string()));
        }

        let body = response.text().await.map_err(|e| {
            error!("Order response body unreadable: {}", e);
            CheckoutError::Submission(ORDER_CREATION_FAILED.to_string())
        })?;

        OrderSubmissionResponse::from_json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::{OrderForm, ProviderKind};
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> OrderSubmissionRequest {
        let form = OrderForm::new()
            .required_field("address_id", "3")
            .payment_options(["cod", "stripe", "razorpay"])
            .select_payment_method("cod");
        OrderSubmissionRequest::from_form(&form).unwrap()
    }

    fn submitter(server: &MockServer) -> HttpOrderSubmitter {
        let config = CheckoutConfig::new(format!("{}/orders/checkout/", server.uri()))
            .with_csrf_token("csrf-abc");
        HttpOrderSubmitter::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_submit_sends_headers_and_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/orders/checkout/"))
            .and(header("X-CSRFToken", "csrf-abc"))
            .and(header("X-Requested-With", "XMLHttpRequest"))
            .and(body_string_contains("address_id=3"))
            .and(body_string_contains("payment_method=cod"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "order_id": 17,
                "total": "250.00",
                "provider": "cod"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = submitter(&server).submit(&request()).await.unwrap();
        assert_eq!(response.provider_kind(), Some(ProviderKind::DeferredSettlement));
    }

    #[tokio::test]
    async fn test_server_error_ignores_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({ "provider": "cod" })),
            )
            .mount(&server)
            .await;

        let err = submitter(&server).submit(&request()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Submission(_)));
        assert_eq!(err.user_message(), ORDER_CREATION_FAILED);
    }

    #[tokio::test]
    async fn test_malformed_body_is_submission_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let err = submitter(&server).submit(&request()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Submission(_)));
        assert_eq!(err.user_message(), ORDER_CREATION_FAILED);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let config = CheckoutConfig::new("http://127.0.0.1:1/orders/checkout/");
        let submitter = HttpOrderSubmitter::new(&config).unwrap();

        let err = submitter.submit(&request()).await.unwrap_err();
        assert_eq!(err.user_message(), ORDER_CREATION_FAILED);
    }
}
