//! # Redirect Gateway
//!
//! Widget-based confirmation. `confirm()` opens the hosted widget and returns
//! `Confirmation::Pending` straight away; the widget's completion handler or
//! payment-failed event settles the attempt later.

use async_trait::async_trait;
use checkout_core::{
    outcome_channel, CheckoutError, CheckoutResult, Confirmation, ConfirmationStrategy,
    OrderSubmissionResponse, ProviderCredentials, ProviderKind, RedirectWidget, WidgetCallbacks,
    WidgetSession, WidgetTheme,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Reported when the widget library is not on the page
pub const WIDGET_MISSING_MESSAGE: &str = "Razorpay script missing.";

/// Redirect gateway confirmation handler
pub struct RedirectGatewayStrategy {
    widget: Option<Arc<dyn RedirectWidget>>,
    page_key: Option<String>,
    theme: WidgetTheme,
}

impl RedirectGatewayStrategy {
    pub fn new(widget: Option<Arc<dyn RedirectWidget>>, credentials: &ProviderCredentials) -> Self {
        Self {
            widget,
            page_key: credentials.redirect_key().map(String::from),
            theme: WidgetTheme::default(),
        }
    }

    /// Builder: widget branding
    pub fn with_theme(mut self, theme: WidgetTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Build the widget session from the server response
    fn build_session(&self, response: &OrderSubmissionResponse) -> CheckoutResult<WidgetSession> {
        let key = response
            .key_id
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .or(self.page_key.as_deref())
            .ok_or_else(|| {
                CheckoutError::ProviderNotReady("Razorpay key is not configured.".to_string())
            })?;

        let amount = response.amount.ok_or_else(|| missing_field("amount"))?;
        let currency = response
            .currency
            .clone()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| missing_field("currency"))?;
        let order_id = response
            .order_id
            .as_ref()
            .map(|id| id.to_string())
            .ok_or_else(|| missing_field("order_id"))?;

        Ok(WidgetSession {
            key: key.to_string(),
            amount,
            currency,
            order_id,
            name: self.theme.name.clone(),
            description: self.theme.description.clone(),
            theme_color: self.theme.theme_color.clone(),
            retry: false,
        })
    }
}

fn missing_field(field: &str) -> CheckoutError {
    CheckoutError::Submission(format!("Order response is missing {}", field))
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ConfirmationStrategy for RedirectGatewayStrategy {
    #[instrument(skip(self, response), fields(provider = "razorpay"))]
    async fn confirm(&self, response: &OrderSubmissionResponse) -> CheckoutResult<Confirmation> {
        let widget = match &self.widget {
            Some(widget) if widget.is_loaded() => widget,
            _ => {
                return Err(CheckoutError::ProviderScriptMissing(
                    WIDGET_MISSING_MESSAGE.to_string(),
                ))
            }
        };

        let session = self.build_session(response)?;
        debug!(
            "Opening redirect widget: order_id={}, amount={} {}",
            session.order_id, session.amount, session.currency
        );

        let (resolver, pending) = outcome_channel();
        widget.open(session, WidgetCallbacks::new(resolver))?;
        info!("Redirect widget opened, awaiting gateway callback");

        Ok(Confirmation::Pending(pending))
    }

    fn provider(&self) -> ProviderKind {
        ProviderKind::RedirectGateway
    }

    fn is_ready(&self) -> bool {
        self.widget.as_ref().map(|w| w.is_loaded()).unwrap_or(false)
    }
}
