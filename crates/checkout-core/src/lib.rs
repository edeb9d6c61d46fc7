//! # checkout-core
//!
//! Core types and traits for the lightning-checkout orchestrator.
//!
//! This crate provides:
//! - `OrderForm` and `FormValidator` for local form validation
//! - `OrderSubmissionRequest` / `OrderSubmissionResponse` wire types
//! - `ConfirmationStrategy` trait and `ProviderRegistry` for provider dispatch
//! - `PaymentOutcome` and the single-assignment outcome cell
//! - `RedirectWidget` contract for widget-based gateways
//! - `StatusSurface`, `UiState` and `StatusView` for the page projection
//! - `CheckoutConfig` / `ProviderCredentials`
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::{OrderForm, FormValidator, ProviderRegistry};
//!
//! let form = OrderForm::new()
//!     .required_field("address_id", "3")
//!     .payment_options(["cod", "stripe"])
//!     .select_payment_method("cod");
//!
//! assert!(FormValidator::new().validate(&form));
//!
//! // Resolve the handler for the server's provider discriminator
//! let strategy = registry.resolve(response.provider.as_deref())?;
//! let confirmation = strategy.confirm(&response).await?;
//! ```

pub mod config;
pub mod error;
pub mod form;
pub mod order;
pub mod outcome;
pub mod status;
pub mod strategy;
pub mod widget;

// Re-exports for convenience
pub use config::{CheckoutConfig, ProviderCredentials, WidgetTheme};
pub use error::{CheckoutError, CheckoutResult};
pub use form::{FieldKind, FormField, FormValidator, OrderForm, ValidationReport, Violation};
pub use order::{OrderRef, OrderSubmissionRequest, OrderSubmissionResponse, ProviderKind};
pub use outcome::{outcome_channel, OutcomeResolver, PaymentOutcome, PendingOutcome};
pub use status::{StatusKind, StatusSurface, StatusView, UiState, PROCESSING_MESSAGE};
pub use strategy::{
    BoxedConfirmationStrategy, Confirmation, ConfirmationStrategy, ProviderRegistry,
};
pub use widget::{RedirectWidget, WidgetCallbacks, WidgetSession};
