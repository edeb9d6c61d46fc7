//! # checkout-gateways
//!
//! Payment provider confirmation handlers for lightning-checkout.
//!
//! Three handlers share the `ConfirmationStrategy` contract:
//!
//! 1. **CardGatewayStrategy** - in-page card confirmation
//!    - Needs a publishable key and a mounted card element
//!    - Settles within the call
//!
//! 2. **RedirectGatewayStrategy** - hosted widget
//!    - Needs the widget library on the page
//!    - Returns a pending outcome settled by widget callbacks
//!
//! 3. **DeferredSettlementStrategy** - Cash on Delivery
//!    - No network; also the fallback for unknown providers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_gateways::{build_registry, CardElement, PageProviders};
//!
//! let page = PageProviders::new().with_card_element(CardElement::mount("pm_card_visa"));
//! let registry = build_registry(&config, page)?;
//!
//! let strategy = registry.resolve(response.provider.as_deref())?;
//! let confirmation = strategy.confirm(&response).await?;
//! ```

pub mod card;
pub mod config;
pub mod deferred;
pub mod providers;
pub mod redirect;

// Re-exports
pub use card::{CardElement, CardGateway, CardGatewayStrategy, CardPaymentIntent, StripeCardGateway};
pub use config::CardGatewayConfig;
pub use deferred::DeferredSettlementStrategy;
pub use providers::{build_registry, shows_card_section, PageProviders};
pub use redirect::RedirectGatewayStrategy;
