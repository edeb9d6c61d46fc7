//! # Status Reporting
//!
//! Attempt state and its projection onto the page: an alert-style status
//! region and a busy/idle submit control. Surfaces only render; the
//! orchestrator owns the state and decides what to push.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shown while an attempt is in flight
pub const PROCESSING_MESSAGE: &str = "Processing order...";

/// Status region flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Info,
    Success,
    Danger,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Info => "info",
            StatusKind::Success => "success",
            StatusKind::Danger => "danger",
        }
    }

    /// CSS class list for the alert region
    pub fn alert_class(&self) -> String {
        format!("alert alert-{}", self.as_str())
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Orchestrator state. `Idle` only at page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiState {
    #[default]
    Idle,
    Processing,
    Succeeded,
    Failed,
}

impl UiState {
    /// Whether a submission may start from this state
    pub fn accepts_submit(&self) -> bool {
        !matches!(self, UiState::Processing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UiState::Succeeded | UiState::Failed)
    }
}

/// Output surface owned by the checkout page
pub trait StatusSurface: Send + Sync {
    /// Render the status region. Repeating a report must not change anything
    /// beyond the rendered text.
    fn report(&self, kind: StatusKind, message: &str);

    /// Disable the submit control and show its spinner, or restore it
    fn set_busy(&self, busy: bool);

    /// Show or hide the card-input section
    fn show_card_section(&self, _visible: bool) {}
}

/// What the surface currently shows. Used to push only changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusView {
    pub status: Option<(StatusKind, String)>,
    pub busy: bool,
}

impl StatusView {
    /// Project a state onto the surface, skipping unchanged parts
    pub fn apply(
        &mut self,
        surface: &dyn StatusSurface,
        kind: StatusKind,
        message: &str,
        busy: bool,
    ) {
        let changed = match &self.status {
            Some((k, m)) => *k != kind || m != message,
            None => true,
        };
        if changed {
            surface.report(kind, message);
            self.status = Some((kind, message.to_string()));
        }
        self.set_busy(surface, busy);
    }

    /// Update only the busy projection. `true -> true` is a no-op.
    pub fn set_busy(&mut self, surface: &dyn StatusSurface, busy: bool) {
        if self.busy != busy {
            surface.set_busy(busy);
            self.busy = busy;
        }
    }
}
