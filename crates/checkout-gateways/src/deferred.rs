//! # Deferred Settlement
//!
//! Cash on Delivery. Nothing to confirm online; the order is already placed
//! once the server answers.

use async_trait::async_trait;
use checkout_core::{
    CheckoutResult, Confirmation, ConfirmationStrategy, OrderSubmissionResponse, PaymentOutcome,
    ProviderKind,
};
use tracing::info;

/// Shown once a deferred-settlement order is placed
pub const DEFERRED_SUCCESS_MESSAGE: &str =
    "Order placed with Cash on Delivery. Expect a confirmation email soon.";

/// Deferred settlement handler (also the registry fallback)
#[derive(Debug, Clone, Copy, Default)]
pub struct DeferredSettlementStrategy;

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ConfirmationStrategy for DeferredSettlementStrategy {
    async fn confirm(&self, response: &OrderSubmissionResponse) -> CheckoutResult<Confirmation> {
        info!(
            "Deferred settlement order placed: order_id={}",
            response
                .order_id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
        Ok(Confirmation::Settled(PaymentOutcome::success(
            DEFERRED_SUCCESS_MESSAGE,
        )))
    }

    fn provider(&self) -> ProviderKind {
        ProviderKind::DeferredSettlement
    }
}
