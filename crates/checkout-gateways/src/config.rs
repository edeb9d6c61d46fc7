//! # Card Gateway Configuration
//!
//! Client-side configuration for the card gateway. Only the publishable key
//! is used here; secret keys never reach the checkout page.

use checkout_core::CheckoutConfig;

/// Production API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Pinned API version
pub const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";

/// Card gateway client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardGatewayConfig {
    /// Publishable key (pk_test_... or pk_live_...)
    pub publishable_key: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,

    /// Confirmation request timeout
    pub timeout_secs: u64,
}

impl CardGatewayConfig {
    /// Create config with an explicit key
    pub fn new(publishable_key: impl Into<String>) -> Self {
        Self {
            publishable_key: publishable_key.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_secs: 30,
        }
    }

    /// Build from the checkout configuration. `None` when the page embeds no
    /// publishable key.
    pub fn from_checkout_config(config: &CheckoutConfig) -> Option<Self> {
        config.credentials.card_key().map(|key| Self {
            timeout_secs: config.request_timeout_secs,
            ..Self::new(key)
        })
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.publishable_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::ProviderCredentials;

    #[test]
    fn test_from_checkout_config() {
        let mut checkout = CheckoutConfig::new("/orders/checkout/")
            .with_credentials(ProviderCredentials::new(Some("pk_test_abc".into()), None));
        checkout.request_timeout_secs = 12;

        let config = CardGatewayConfig::from_checkout_config(&checkout).unwrap();
        assert_eq!(config.auth_header(), "Bearer pk_test_abc");
        assert_eq!(config.timeout_secs, 12);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_no_key_no_config() {
        let checkout = CheckoutConfig::new("/orders/checkout/");
        assert!(CardGatewayConfig::from_checkout_config(&checkout).is_none());
    }

    #[test]
    fn test_custom_base_url() {
        let config =
            CardGatewayConfig::new("pk_live_xyz").with_api_base_url("http://127.0.0.1:9999");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
    }
}
