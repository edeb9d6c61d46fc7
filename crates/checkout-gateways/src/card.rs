//! # Card Gateway
//!
//! In-page card confirmation. The card element is tokenized by the page;
//! confirmation sends the payment intent's client secret and the tokenized
//! card to the gateway and settles within the call.

use crate::config::CardGatewayConfig;
use async_trait::async_trait;
use checkout_core::{
    CheckoutConfig, CheckoutError, CheckoutResult, Confirmation, ConfirmationStrategy,
    OrderSubmissionResponse, PaymentOutcome, ProviderKind,
};
use reqwest::Client;
use serde::Deserialize;
use std::sync::{Arc, RwLock};
use tokio::sync::watch;
use tracing::{debug, error, info, instrument};

/// Shown after a successful card confirmation
pub const CARD_SUCCESS_MESSAGE: &str = "Payment complete! We'll send an email confirmation shortly.";

/// Reported when the gateway client or card element was never initialized
pub const CARD_NOT_READY_MESSAGE: &str = "Stripe is not ready. Check publishable key.";

/// Reported when the element was never tokenized
pub const CARD_INCOMPLETE_MESSAGE: &str = "Please enter your card details.";

/// Mounted card-input element.
///
/// Holds the tokenized payment method and publishes the element's live
/// validation error so the page can render it as the customer types.
/// Clones share the same element.
#[derive(Debug, Clone)]
pub struct CardElement {
    payment_method: Arc<RwLock<String>>,
    errors: Arc<watch::Sender<Option<String>>>,
}

impl CardElement {
    /// Mount an element backed by a tokenized payment method (pm_...)
    pub fn mount(payment_method: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            payment_method: Arc::new(RwLock::new(payment_method.into())),
            errors: Arc::new(tx),
        }
    }

    /// Mount an element the page tokenizes later, at submit time
    pub fn mount_untokenized() -> Self {
        Self::mount(String::new())
    }

    pub fn payment_method(&self) -> String {
        match self.payment_method.read() {
            Ok(pm) => pm.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Record the payment method the page tokenized the card into
    pub fn set_payment_method(&self, payment_method: impl Into<String>) {
        let payment_method = payment_method.into();
        match self.payment_method.write() {
            Ok(mut pm) => *pm = payment_method,
            Err(poisoned) => *poisoned.into_inner() = payment_method,
        }
    }

    /// Record an element change event. `None` clears the error.
    pub fn report_change(&self, error: Option<String>) {
        let error = error.filter(|e| !e.trim().is_empty());
        self.errors.send_if_modified(|current| {
            if *current == error {
                false
            } else {
                *current = error;
                true
            }
        });
    }

    /// Observe validation-error changes
    pub fn subscribe_errors(&self) -> watch::Receiver<Option<String>> {
        self.errors.subscribe()
    }

    /// Current validation error, if any
    pub fn current_error(&self) -> Option<String> {
        self.errors.borrow().clone()
    }
}

/// Result of a card confirmation accepted by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPaymentIntent {
    pub id: String,
    pub status: String,
}

/// Page-supplied card gateway client
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait CardGateway: Send + Sync {
    /// Confirm a card payment. Gateway-reported errors come back as
    /// `ProviderDeclined` carrying the gateway's message.
    async fn confirm_card_payment(
        &self,
        client_secret: &str,
        card: &CardElement,
    ) -> CheckoutResult<CardPaymentIntent>;
}

/// Card gateway client over the payment intents HTTP API
pub struct StripeCardGateway {
    config: CardGatewayConfig,
    client: Client,
}

impl StripeCardGateway {
    /// Create a new client bound to a publishable key
    pub fn new(config: CardGatewayConfig) -> CheckoutResult<Self> {
        let builder = Client::builder();
        // The browser's fetch owns timeouts on wasm32
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_secs(config.timeout_secs));

        let client = builder.build().map_err(|e| {
            CheckoutError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { config, client })
    }
}

/// Payment intent id embedded in a client secret (`pi_..._secret_...`)
fn intent_id_from_secret(client_secret: &str) -> CheckoutResult<&str> {
    match client_secret.split_once("_secret_") {
        Some((id, _)) if id.starts_with("pi_") => Ok(id),
        _ => Err(CheckoutError::Submission(
            "Order response carried an invalid client secret".to_string(),
        )),
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl CardGateway for StripeCardGateway {
    #[instrument(skip(self, client_secret, card))]
    async fn confirm_card_payment(
        &self,
        client_secret: &str,
        card: &CardElement,
    ) -> CheckoutResult<CardPaymentIntent> {
        let intent_id = intent_id_from_secret(client_secret)?;
        let url = format!(
            "{}/v1/payment_intents/{}/confirm",
            self.config.api_base_url, intent_id
        );

        let payment_method = card.payment_method();
        let form_params = [
            ("client_secret", client_secret),
            ("payment_method", payment_method.as_str()),
            ("expected_payment_method_type", "card"),
        ];

        debug!("Confirming card payment: intent={}", intent_id);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| {
                error!("Card gateway unreachable: {}", e);
                CheckoutError::ProviderDeclined(
                    "Unable to reach the card gateway. Please try again.".to_string(),
                )
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            CheckoutError::ProviderDeclined(format!("Card gateway response unreadable: {}", e))
        })?;

        if !status.is_success() {
            error!("Card gateway error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<GatewayErrorResponse>(&body) {
                return Err(CheckoutError::ProviderDeclined(error_response.error.message));
            }

            return Err(CheckoutError::ProviderDeclined(format!(
                "Card gateway returned HTTP {}",
                status
            )));
        }

        let intent: PaymentIntentResponse = serde_json::from_str(&body).map_err(|e| {
            CheckoutError::ProviderDeclined(format!("Card gateway response unreadable: {}", e))
        })?;

        let PaymentIntentResponse {
            id,
            status,
            last_payment_error,
        } = intent;

        match status.as_str() {
            "succeeded" | "processing" | "requires_capture" => Ok(CardPaymentIntent { id, status }),
            "requires_action" => Err(CheckoutError::ProviderDeclined(
                "Additional authentication is required to complete this payment.".to_string(),
            )),
            other => Err(CheckoutError::ProviderDeclined(
                last_payment_error
                    .map(|e| e.message)
                    .unwrap_or_else(|| format!("Payment not completed (status: {})", other)),
            )),
        }
    }
}

/// Card gateway confirmation handler
pub struct CardGatewayStrategy {
    gateway: Option<Arc<dyn CardGateway>>,
    element: Option<CardElement>,
}

impl CardGatewayStrategy {
    /// Handler with an initialized client and/or mounted element
    pub fn new(gateway: Option<Arc<dyn CardGateway>>, element: Option<CardElement>) -> Self {
        Self { gateway, element }
    }

    /// Initialize from the checkout configuration. Without a publishable key
    /// the handler stays registered but not ready.
    pub fn from_config(
        config: &CheckoutConfig,
        element: Option<CardElement>,
    ) -> CheckoutResult<Self> {
        let gateway = match CardGatewayConfig::from_checkout_config(config) {
            Some(config) => Some(Arc::new(StripeCardGateway::new(config)?) as Arc<dyn CardGateway>),
            None => None,
        };
        Ok(Self::new(gateway, element))
    }

    /// Mounted element, if any
    pub fn element(&self) -> Option<&CardElement> {
        self.element.as_ref()
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ConfirmationStrategy for CardGatewayStrategy {
    #[instrument(skip(self, response), fields(provider = "stripe"))]
    async fn confirm(&self, response: &OrderSubmissionResponse) -> CheckoutResult<Confirmation> {
        let (gateway, element) = match (&self.gateway, &self.element) {
            (Some(gateway), Some(element)) => (gateway, element),
            _ => return Err(CheckoutError::ProviderNotReady(CARD_NOT_READY_MESSAGE.to_string())),
        };

        let client_secret = response
            .client_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                CheckoutError::Submission("Order response is missing a client secret".to_string())
            })?;

        // The element already knows the card is incomplete or invalid
        if let Some(message) = element.current_error() {
            return Err(CheckoutError::ProviderDeclined(message));
        }
        if element.payment_method().trim().is_empty() {
            return Err(CheckoutError::Validation(CARD_INCOMPLETE_MESSAGE.to_string()));
        }

        let intent = gateway.confirm_card_payment(client_secret, element).await?;
        info!("Card payment confirmed: intent={}, status={}", intent.id, intent.status);

        Ok(Confirmation::Settled(PaymentOutcome::success(CARD_SUCCESS_MESSAGE)))
    }

    fn provider(&self) -> ProviderKind {
        ProviderKind::CardGateway
    }

    fn is_ready(&self) -> bool {
        self.gateway.is_some() && self.element.is_some()
    }
}

// =============================================================================
// Card Gateway API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct PaymentIntentResponse {
    id: String,
    status: String,
    #[serde(default)]
    last_payment_error: Option<GatewayError>,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorResponse {
    error: GatewayError,
}

#[derive(Debug, Deserialize)]
struct GatewayError {
    message: String,
}
