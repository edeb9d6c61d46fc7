//! # Confirmation Strategy Trait
//!
//! Strategy pattern over payment providers. Each provider confirms a payment
//! with its own protocol behind the same `confirm()` capability.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                ConfirmationStrategy (trait)                 │
//! │  ├── confirm()      -> Settled(outcome) | Pending(outcome)  │
//! │  ├── provider()                                             │
//! │  └── is_ready()                                             │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!          ┌─────────────────┼─────────────────┐
//!          │                 │                 │
//!  ┌───────┴───────┐ ┌───────┴───────┐ ┌───────┴───────┐
//!  │ CardGateway   │ │RedirectGateway│ │   Deferred    │
//!  │ (in-page)     │ │ (widget)      │ │  Settlement   │
//!  └───────────────┘ └───────────────┘ └───────────────┘
//! ```

use crate::error::{CheckoutError, CheckoutResult};
use crate::order::{OrderSubmissionResponse, ProviderKind};
use crate::outcome::{PaymentOutcome, PendingOutcome};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Result of handing a response to a provider
pub enum Confirmation {
    /// The provider finished within the call
    Settled(PaymentOutcome),
    /// The provider will report later through an external callback
    Pending(PendingOutcome),
}

impl fmt::Debug for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confirmation::Settled(outcome) => f.debug_tuple("Settled").field(outcome).finish(),
            Confirmation::Pending(_) => f.write_str("Pending"),
        }
    }
}

/// Core trait for provider confirmation handlers.
///
/// Futures are `Send` on native targets. On wasm32 they run on the browser's
/// single thread and hold JS handles, so the bound is dropped there.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait ConfirmationStrategy: Send + Sync {
    /// Confirm the payment described by an order submission response.
    ///
    /// Readiness must be checked before any network call.
    async fn confirm(&self, response: &OrderSubmissionResponse) -> CheckoutResult<Confirmation>;

    /// Which provider this handler serves
    fn provider(&self) -> ProviderKind;

    /// Whether the provider's page dependencies are initialized
    fn is_ready(&self) -> bool {
        true
    }
}

/// Type alias for a shared confirmation strategy (dynamic dispatch)
pub type BoxedConfirmationStrategy = Arc<dyn ConfirmationStrategy>;

/// Provider handlers keyed by discriminator
#[derive(Clone)]
pub struct ProviderRegistry {
    strategies: HashMap<ProviderKind, BoxedConfirmationStrategy>,
    fallback: ProviderKind,
    strict: bool,
}

impl ProviderRegistry {
    /// Create an empty registry. Unknown providers fall back to deferred
    /// settlement.
    pub fn new() -> Self {
        Self {
            strategies: HashMap::new(),
            fallback: ProviderKind::DeferredSettlement,
            strict: false,
        }
    }

    /// Register a strategy, replacing any previous one for its provider
    pub fn register(&mut self, strategy: BoxedConfirmationStrategy) {
        self.strategies.insert(strategy.provider(), strategy);
    }

    /// Register with builder pattern
    pub fn with_strategy(mut self, strategy: BoxedConfirmationStrategy) -> Self {
        self.register(strategy);
        self
    }

    /// Builder: reject unknown or absent providers instead of falling back
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Get a strategy by provider
    pub fn get(&self, provider: ProviderKind) -> Option<&BoxedConfirmationStrategy> {
        self.strategies.get(&provider)
    }

    /// Resolve the handler for a raw `provider` value from the server.
    pub fn resolve(&self, provider: Option<&str>) -> CheckoutResult<&BoxedConfirmationStrategy> {
        let kind = match provider.and_then(ProviderKind::parse) {
            Some(kind) => kind,
            None if self.strict => {
                return Err(CheckoutError::Submission(format!(
                    "Unsupported payment provider: {}",
                    provider.unwrap_or("<missing>")
                )));
            }
            None => {
                warn!(
                    provider = provider.unwrap_or("<missing>"),
                    fallback = %self.fallback,
                    "Unrecognized payment provider, using fallback"
                );
                self.fallback
            }
        };

        self.get(kind).ok_or_else(|| {
            CheckoutError::Internal(format!("No handler registered for provider {}", kind))
        })
    }

    /// List all registered providers
    pub fn providers(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|p| self.strategies.contains_key(p))
            .collect()
    }

    /// Check if a provider is registered and ready
    pub fn is_ready(&self, provider: ProviderKind) -> bool {
        self.get(provider).map(|s| s.is_ready()).unwrap_or(false)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
