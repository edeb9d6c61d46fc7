//! # Lightning-Checkout
//!
//! Headless checkout driver: runs one attempt against an order endpoint.
//!
//! ## Usage
//!
//! ```bash
//! # Configure the endpoint (or point CHECKOUT_CONFIG at a TOML file)
//! export CHECKOUT_ENDPOINT=http://localhost:8000/orders/checkout/
//! export CHECKOUT_CSRF_TOKEN=...
//! export CHECKOUT_STRIPE_PUBLIC_KEY=pk_test_...   # optional
//! export CHECKOUT_CARD_PAYMENT_METHOD=pm_card_visa # optional, mounts the card element
//!
//! # Run with an order form description
//! lightning-checkout order.toml
//! ```

use anyhow::Context;
use checkout_client::{Attempt, CheckoutOrchestrator, TracingSurface};
use checkout_core::{CheckoutConfig, OrderForm};
use checkout_gateways::{build_registry, CardElement, PageProviders};
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = match std::env::var("CHECKOUT_CONFIG") {
        Ok(path) => CheckoutConfig::from_path(&path)?,
        Err(_) => CheckoutConfig::from_env()?,
    };

    let form_path = std::env::args()
        .nth(1)
        .context("usage: lightning-checkout <order-form.toml>")?;
    let form_toml = std::fs::read_to_string(&form_path)
        .with_context(|| format!("Failed to read {}", form_path))?;
    let form = OrderForm::from_toml_str(&form_toml)
        .with_context(|| format!("Failed to parse {}", form_path))?;

    // The card element only exists where the card gateway client initialized
    let mut page = PageProviders::new();
    if config.credentials.card_key().is_some() {
        if let Ok(pm) = std::env::var("CHECKOUT_CARD_PAYMENT_METHOD") {
            page = page.with_card_element(CardElement::mount(pm));
        }
    }

    let registry = build_registry(&config, page)?;
    info!("Endpoint: {}", config.endpoint);
    info!("Payment providers: {:?}", registry.providers());

    let orchestrator = CheckoutOrchestrator::with_http(config, registry, Arc::new(TracingSurface))?;

    match orchestrator.submit(&form).await {
        Attempt::Completed(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.outcome.is_success() {
                anyhow::bail!("checkout failed: {}", report.outcome.message());
            }
        }
        Attempt::Rejected(report) => {
            warn!("Form is incomplete: {}", report);
            anyhow::bail!("form rejected: {}", report);
        }
        Attempt::Ignored => anyhow::bail!("an attempt is already processing"),
    }

    Ok(())
}
