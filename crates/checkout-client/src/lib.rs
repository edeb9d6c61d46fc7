//! # checkout-client
//!
//! Checkout orchestrator for lightning-checkout.
//!
//! This crate provides:
//! - `HttpOrderSubmitter` for the order-creation endpoint
//! - `CheckoutOrchestrator`, the attempt state machine
//! - `TracingSurface` / `RecordingSurface` headless status projections
//!
//! ## Attempt flow
//!
//! | Step | Suspends | Failure |
//! |------|----------|---------|
//! | Validate form | no | `Attempt::Rejected`, UI untouched |
//! | Submit order | yes (HTTP) | Failed: "Unable to create order. Please try again." |
//! | Resolve provider | no | Failed (strict mode only) |
//! | Confirm | card: HTTP, redirect: widget callback | Failed with provider message |

pub mod orchestrator;
pub mod submission;
pub mod surface;

pub use orchestrator::{Attempt, AttemptReport, CheckoutOrchestrator};
pub use submission::{HttpOrderSubmitter, OrderSubmitter};
pub use surface::{RecordingSurface, TracingSurface};
