//! # Checkout Configuration
//!
//! Immutable configuration handed to the orchestrator at construction.
//! Loaded from a TOML file, environment variables, or page metadata.

use crate::error::{CheckoutError, CheckoutResult};
use crate::widget::DEFAULT_THEME_COLOR;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::Path;

/// Meta tag carrying the card gateway publishable key
pub const CARD_KEY_META: &str = "stripe-public-key";

/// Meta tag carrying the redirect gateway key id
pub const REDIRECT_KEY_META: &str = "razorpay-key";

/// Default anti-forgery header
pub const DEFAULT_CSRF_HEADER: &str = "X-CSRFToken";

/// Page-embedded public keys. Absence disables the matching provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCredentials {
    /// Card gateway publishable key (pk_test_... or pk_live_...)
    #[serde(default)]
    pub card_public_key: Option<String>,

    /// Redirect gateway key id (rzp_test_... or rzp_live_...)
    #[serde(default)]
    pub redirect_key: Option<String>,
}

impl ProviderCredentials {
    pub fn new(card_public_key: Option<String>, redirect_key: Option<String>) -> Self {
        Self {
            card_public_key: non_blank(card_public_key),
            redirect_key: non_blank(redirect_key),
        }
    }

    /// Read keys from page meta tags (name -> content)
    pub fn from_meta(meta: &HashMap<String, String>) -> Self {
        Self::new(
            meta.get(CARD_KEY_META).cloned(),
            meta.get(REDIRECT_KEY_META).cloned(),
        )
    }

    /// Read keys from the environment.
    ///
    /// Env vars (both optional):
    /// - `CHECKOUT_STRIPE_PUBLIC_KEY`
    /// - `CHECKOUT_RAZORPAY_KEY`
    pub fn from_env() -> Self {
        Self::new(
            env::var("CHECKOUT_STRIPE_PUBLIC_KEY").ok(),
            env::var("CHECKOUT_RAZORPAY_KEY").ok(),
        )
    }

    /// Check key formats. Missing keys are fine; malformed ones are not.
    pub fn validate(&self) -> CheckoutResult<()> {
        if let Some(key) = &self.card_public_key {
            if !key.starts_with("pk_test_") && !key.starts_with("pk_live_") {
                return Err(CheckoutError::Configuration(
                    "Card gateway key must start with pk_test_ or pk_live_".to_string(),
                ));
            }
        }

        if let Some(key) = &self.redirect_key {
            if !key.starts_with("rzp_test_") && !key.starts_with("rzp_live_") {
                return Err(CheckoutError::Configuration(
                    "Redirect gateway key must start with rzp_test_ or rzp_live_".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn card_key(&self) -> Option<&str> {
        self.card_public_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn redirect_key(&self) -> Option<&str> {
        self.redirect_key.as_deref().filter(|k| !k.is_empty())
    }
}

/// Branding passed to the redirect gateway widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetTheme {
    #[serde(default = "default_widget_name")]
    pub name: String,
    #[serde(default = "default_widget_description")]
    pub description: String,
    #[serde(default = "default_theme_color")]
    pub theme_color: String,
}

fn default_widget_name() -> String {
    "Payment".to_string()
}

fn default_widget_description() -> String {
    "Complete your payment".to_string()
}

fn default_theme_color() -> String {
    DEFAULT_THEME_COLOR.to_string()
}

impl Default for WidgetTheme {
    fn default() -> Self {
        Self {
            name: default_widget_name(),
            description: default_widget_description(),
            theme_color: default_theme_color(),
        }
    }
}

/// Orchestrator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Order-creation endpoint
    pub endpoint: String,

    /// Anti-forgery token sent with every submission
    #[serde(default)]
    pub csrf_token: String,

    /// Header carrying the anti-forgery token
    #[serde(default = "default_csrf_header")]
    pub csrf_header: String,

    /// Order submission timeout
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Reject unknown providers instead of falling back to deferred settlement
    #[serde(default)]
    pub strict_providers: bool,

    #[serde(default)]
    pub credentials: ProviderCredentials,

    #[serde(default)]
    pub widget: WidgetTheme,
}

fn default_csrf_header() -> String {
    DEFAULT_CSRF_HEADER.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl CheckoutConfig {
    /// Create config with explicit values (for testing)
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            csrf_token: String::new(),
            csrf_header: default_csrf_header(),
            request_timeout_secs: default_timeout_secs(),
            strict_providers: false,
            credentials: ProviderCredentials::default(),
            widget: WidgetTheme::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `CHECKOUT_ENDPOINT`
    ///
    /// Optional: `CHECKOUT_CSRF_TOKEN`, `CHECKOUT_TIMEOUT_SECS`,
    /// `CHECKOUT_STRICT_PROVIDERS`, plus the credential vars.
    pub fn from_env() -> CheckoutResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let endpoint = env::var("CHECKOUT_ENDPOINT").map_err(|_| {
            CheckoutError::Configuration("CHECKOUT_ENDPOINT not set".to_string())
        })?;

        let config = Self::new(endpoint).with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document, then apply environment overrides
    pub fn from_toml_str(content: &str) -> CheckoutResult<Self> {
        let config = Self::read_toml(content)?.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document as written, ignoring the environment
    pub fn parse_toml(content: &str) -> CheckoutResult<Self> {
        let config = Self::read_toml(content)?.normalized();
        config.validate()?;
        Ok(config)
    }

    fn read_toml(content: &str) -> CheckoutResult<Self> {
        toml::from_str(content)
            .map_err(|e| CheckoutError::Configuration(format!("Invalid config: {}", e)))
    }

    /// Load a TOML config file
    pub fn from_path(path: impl AsRef<Path>) -> CheckoutResult<Self> {
        let path = path.as_ref();
        dotenvy::dotenv().ok();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CheckoutError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(token) = env::var("CHECKOUT_CSRF_TOKEN") {
            self.csrf_token = token;
        }
        if let Some(secs) = env::var("CHECKOUT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.request_timeout_secs = secs;
        }
        if let Ok(strict) = env::var("CHECKOUT_STRICT_PROVIDERS") {
            self.strict_providers = matches!(strict.as_str(), "1" | "true" | "yes");
        }

        let env_keys = ProviderCredentials::from_env();
        if env_keys.card_public_key.is_some() {
            self.credentials.card_public_key = env_keys.card_public_key;
        }
        if env_keys.redirect_key.is_some() {
            self.credentials.redirect_key = env_keys.redirect_key;
        }
        self.normalized()
    }

    /// Blank keys count as absent
    fn normalized(mut self) -> Self {
        self.credentials = ProviderCredentials::new(
            self.credentials.card_public_key.take(),
            self.credentials.redirect_key.take(),
        );
        self
    }

    /// Validate endpoint and key formats
    pub fn validate(&self) -> CheckoutResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(CheckoutError::Configuration(
                "Checkout endpoint must not be empty".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(CheckoutError::Configuration(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        self.credentials.validate()
    }

    /// Builder: set credentials
    pub fn with_credentials(mut self, credentials: ProviderCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Builder: set anti-forgery token
    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = token.into();
        self
    }

    /// Builder: set strict provider mode
    pub fn with_strict_providers(mut self, strict: bool) -> Self {
        self.strict_providers = strict;
        self
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
