//! # Checkout Error Types
//!
//! Typed error handling for the checkout orchestrator.
//! Every attempt-level error ends the attempt as `Failed`; `user_message()`
//! is the text shown in the status region.

use thiserror::Error;

/// Fallback shown when an error carries no usable message
pub const GENERIC_FAILURE: &str = "Something went wrong.";

/// Message shown for any failed order-creation call
pub const ORDER_CREATION_FAILED: &str = "Unable to create order. Please try again.";

/// Core error type for all checkout operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Form failed local constraint validation (no network call made)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Order-creation call failed or returned a malformed body
    #[error("Order submission failed: {0}")]
    Submission(String),

    /// A provider dependency (client, card element, key) was never initialized
    #[error("Provider not ready: {0}")]
    ProviderNotReady(String),

    /// The redirect gateway's widget library is not loaded
    #[error("Provider script missing: {0}")]
    ProviderScriptMissing(String),

    /// The provider itself reported a payment error
    #[error("Payment declined: {0}")]
    ProviderDeclined(String),

    /// Configuration errors (missing endpoint, malformed keys)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CheckoutError {
    /// Human-readable message for the status region.
    ///
    /// Provider messages pass through verbatim; empty messages fall back to
    /// [`GENERIC_FAILURE`].
    pub fn user_message(&self) -> String {
        let message = match self {
            CheckoutError::Validation(m)
            | CheckoutError::Submission(m)
            | CheckoutError::ProviderNotReady(m)
            | CheckoutError::ProviderScriptMissing(m)
            | CheckoutError::ProviderDeclined(m) => m.as_str(),
            CheckoutError::Configuration(_) | CheckoutError::Internal(_) => GENERIC_FAILURE,
        };

        if message.trim().is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            message.to_string()
        }
    }

    /// Short category label used in log fields
    pub fn category(&self) -> &'static str {
        match self {
            CheckoutError::Validation(_) => "validation",
            CheckoutError::Submission(_) => "submission",
            CheckoutError::ProviderNotReady(_) => "provider_not_ready",
            CheckoutError::ProviderScriptMissing(_) => "provider_script_missing",
            CheckoutError::ProviderDeclined(_) => "provider_declined",
            CheckoutError::Configuration(_) => "configuration",
            CheckoutError::Internal(_) => "internal",
        }
    }

    /// Returns true if the provider was reached and refused the payment
    pub fn is_decline(&self) -> bool {
        matches!(self, CheckoutError::ProviderDeclined(_))
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_passthrough() {
        assert_eq!(
            CheckoutError::ProviderDeclined("Your card was declined.".into()).user_message(),
            "Your card was declined."
        );
        assert_eq!(
            CheckoutError::Submission(ORDER_CREATION_FAILED.into()).user_message(),
            ORDER_CREATION_FAILED
        );
    }

    #[test]
    fn test_user_message_fallbacks() {
        assert_eq!(
            CheckoutError::ProviderDeclined("   ".into()).user_message(),
            GENERIC_FAILURE
        );
        assert_eq!(
            CheckoutError::Internal("lock poisoned".into()).user_message(),
            GENERIC_FAILURE
        );
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            CheckoutError::ProviderNotReady("x".into()).category(),
            "provider_not_ready"
        );
        assert!(CheckoutError::ProviderDeclined("x".into()).is_decline());
        assert!(!CheckoutError::Submission("x".into()).is_decline());
    }
}
