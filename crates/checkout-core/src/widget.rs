//! # Redirect Gateway Widget Contract
//!
//! The hosted payment widget is owned by the page, not by this crate. The
//! redirect-gateway handler talks to it only through [`RedirectWidget`], and
//! the widget reports back only through [`WidgetCallbacks`].

use crate::error::CheckoutResult;
use crate::outcome::{OutcomeResolver, PaymentOutcome};
use serde::{Deserialize, Serialize};

/// Shown when the gateway accepted the payment in the widget
pub const REDIRECT_SUCCESS_MESSAGE: &str =
    "Payment initiated. We'll confirm once the gateway notifies us.";

/// Shown when the gateway failed the payment without a description
pub const PAYMENT_FAILED_FALLBACK: &str = "Payment failed.";

/// Shown when the widget is closed before reporting anything
pub const WIDGET_CLOSED_MESSAGE: &str = "Payment window closed before completion.";

/// Theme color used when none is configured
pub const DEFAULT_THEME_COLOR: &str = "#0d6efd";

/// Options used to open one widget session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSession {
    pub key: String,
    /// Amount in the smallest currency unit
    pub amount: i64,
    pub currency: String,
    pub order_id: String,
    pub name: String,
    pub description: String,
    pub theme_color: String,
    /// In-widget retries stay off: a failure event is terminal for the attempt
    pub retry: bool,
}

/// Completion hooks handed to the widget.
///
/// All three paths feed the same single-assignment outcome.
#[derive(Debug, Clone)]
pub struct WidgetCallbacks {
    resolver: OutcomeResolver,
}

impl WidgetCallbacks {
    pub fn new(resolver: OutcomeResolver) -> Self {
        Self { resolver }
    }

    /// The widget's completion handler fired
    pub fn complete(&self) {
        self.resolver
            .resolve(PaymentOutcome::success(REDIRECT_SUCCESS_MESSAGE));
    }

    /// The widget raised its payment-failed event
    pub fn payment_failed(&self, description: Option<&str>) {
        let reason = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(PAYMENT_FAILED_FALLBACK);
        self.resolver.resolve(PaymentOutcome::failure(reason));
    }

    /// The widget was closed. No-op if an outcome was already delivered.
    pub fn dismissed(&self) {
        if !self.resolver.is_resolved() {
            self.resolver
                .resolve(PaymentOutcome::failure(WIDGET_CLOSED_MESSAGE));
        }
    }
}

/// Page-supplied redirect gateway widget library
pub trait RedirectWidget: Send + Sync {
    /// Whether the widget script is present on the page
    fn is_loaded(&self) -> bool;

    /// Construct a session and open it. Must return as soon as the widget is
    /// shown; the outcome arrives later through `callbacks`.
    fn open(&self, session: WidgetSession, callbacks: WidgetCallbacks) -> CheckoutResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::outcome_channel;

    #[tokio::test]
    async fn test_failed_event_carries_description() {
        let (resolver, pending) = outcome_channel();
        WidgetCallbacks::new(resolver).payment_failed(Some("Card declined"));

        assert_eq!(
            pending.wait().await,
            Some(PaymentOutcome::failure("Card declined"))
        );
    }

    #[tokio::test]
    async fn test_failed_event_without_description() {
        let (resolver, pending) = outcome_channel();
        WidgetCallbacks::new(resolver).payment_failed(None);

        assert_eq!(
            pending.wait().await,
            Some(PaymentOutcome::failure(PAYMENT_FAILED_FALLBACK))
        );
    }

    #[tokio::test]
    async fn test_dismiss_after_completion_is_ignored() {
        let (resolver, pending) = outcome_channel();
        let callbacks = WidgetCallbacks::new(resolver);

        callbacks.complete();
        callbacks.dismissed();

        assert_eq!(
            pending.wait().await,
            Some(PaymentOutcome::success(REDIRECT_SUCCESS_MESSAGE))
        );
    }

    #[tokio::test]
    async fn test_dismiss_alone_fails_attempt() {
        let (resolver, pending) = outcome_channel();
        WidgetCallbacks::new(resolver).dismissed();

        assert_eq!(
            pending.wait().await,
            Some(PaymentOutcome::failure(WIDGET_CLOSED_MESSAGE))
        );
    }
}
