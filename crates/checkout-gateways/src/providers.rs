//! # Provider Setup
//!
//! Builds the provider registry from page configuration: credentials are read
//! once, each handler is initialized with whatever the page supplied, and
//! handlers whose dependencies are missing stay registered but not ready.

use crate::card::{CardElement, CardGatewayStrategy};
use crate::deferred::DeferredSettlementStrategy;
use crate::redirect::RedirectGatewayStrategy;
use checkout_core::{
    BoxedConfirmationStrategy, CheckoutConfig, CheckoutResult, ProviderKind, ProviderRegistry,
    RedirectWidget,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Page-supplied provider dependencies
#[derive(Default, Clone)]
pub struct PageProviders {
    /// Mounted card element (only when the card gateway client initialized)
    pub card_element: Option<CardElement>,
    /// Redirect gateway widget library
    pub widget: Option<Arc<dyn RedirectWidget>>,
}

impl PageProviders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_card_element(mut self, element: CardElement) -> Self {
        self.card_element = Some(element);
        self
    }

    pub fn with_widget(mut self, widget: Arc<dyn RedirectWidget>) -> Self {
        self.widget = Some(widget);
        self
    }
}

/// Register all three handlers for a configuration
pub fn build_registry(
    config: &CheckoutConfig,
    page: PageProviders,
) -> CheckoutResult<ProviderRegistry> {
    let card = CardGatewayStrategy::from_config(config, page.card_element)?;
    let redirect = RedirectGatewayStrategy::new(page.widget, &config.credentials)
        .with_theme(config.widget.clone());

    let registry = ProviderRegistry::new()
        .strict(config.strict_providers)
        .with_strategy(Arc::new(card) as BoxedConfirmationStrategy)
        .with_strategy(Arc::new(redirect) as BoxedConfirmationStrategy)
        .with_strategy(Arc::new(DeferredSettlementStrategy) as BoxedConfirmationStrategy);

    for provider in registry.providers() {
        if registry.is_ready(provider) {
            info!("Payment provider ready: {}", provider);
        } else {
            warn!("Payment provider not ready: {}", provider);
        }
    }

    Ok(registry)
}

/// Whether the card-input section should be visible for a payment method
pub fn shows_card_section(registry: &ProviderRegistry, payment_method: Option<&str>) -> bool {
    payment_method.and_then(ProviderKind::parse) == Some(ProviderKind::CardGateway)
        && registry.is_ready(ProviderKind::CardGateway)
}
