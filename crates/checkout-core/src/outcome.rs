//! # Payment Outcomes
//!
//! Terminal results of a checkout attempt, and the single-assignment cell
//! used by providers whose completion arrives through external callbacks.
//!
//! ```text
//!   OutcomeResolver (clone) ──┐
//!   OutcomeResolver (clone) ──┼──► oneshot ──► PendingOutcome::wait()
//!   OutcomeResolver (clone) ──┘   (first resolve wins, later ones assert)
//! ```

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing::error;

/// Terminal result of one attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum PaymentOutcome {
    Success(String),
    Failure(String),
}

impl PaymentOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        PaymentOutcome::Success(message.into())
    }

    pub fn failure(message: impl Into<String>) -> Self {
        PaymentOutcome::Failure(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PaymentOutcome::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            PaymentOutcome::Success(m) | PaymentOutcome::Failure(m) => m,
        }
    }
}

/// Create a linked resolver / pending outcome pair
pub fn outcome_channel() -> (OutcomeResolver, PendingOutcome) {
    let (tx, rx) = oneshot::channel();
    (
        OutcomeResolver {
            slot: Arc::new(Mutex::new(Some(tx))),
        },
        PendingOutcome { rx },
    )
}

/// Write side of the outcome cell. Clones share the same slot.
#[derive(Debug, Clone)]
pub struct OutcomeResolver {
    slot: Arc<Mutex<Option<oneshot::Sender<PaymentOutcome>>>>,
}

impl OutcomeResolver {
    /// Resolve the outcome.
    ///
    /// Only the first call takes effect. A second resolution is a programming
    /// error: it asserts in debug builds and is logged and dropped otherwise.
    /// Returns true if this call delivered the outcome.
    pub fn resolve(&self, outcome: PaymentOutcome) -> bool {
        let sender = match self.slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        match sender {
            // A dropped receiver means the attempt is gone; nothing to report to
            Some(tx) => tx.send(outcome).is_ok(),
            None => {
                error!(outcome = ?outcome, "Payment outcome resolved more than once");
                debug_assert!(false, "payment outcome resolved more than once");
                false
            }
        }
    }

    /// True once any clone has resolved the outcome
    pub fn is_resolved(&self) -> bool {
        match self.slot.lock() {
            Ok(slot) => slot.is_none(),
            Err(poisoned) => poisoned.into_inner().is_none(),
        }
    }
}

/// Read side of the outcome cell
#[derive(Debug)]
pub struct PendingOutcome {
    rx: oneshot::Receiver<PaymentOutcome>,
}

impl PendingOutcome {
    /// Wait for the outcome. `None` when every resolver was dropped unresolved.
    pub async fn wait(self) -> Option<PaymentOutcome> {
        self.rx.await.ok()
    }
}
