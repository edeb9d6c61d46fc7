//! # Status Surfaces
//!
//! Headless renderings of the checkout status region and submit control.

use checkout_core::{StatusKind, StatusSurface};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info};

/// Renders status through `tracing` (used by the CLI)
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSurface;

impl StatusSurface for TracingSurface {
    fn report(&self, kind: StatusKind, message: &str) {
        match kind {
            StatusKind::Danger => error!(status = %kind, "{}", message),
            _ => info!(status = %kind, "{}", message),
        }
    }

    fn set_busy(&self, busy: bool) {
        debug!(busy, "Submit control");
    }

    fn show_card_section(&self, visible: bool) {
        debug!(visible, "Card section");
    }
}

/// Records every projection call in order. Useful for embedding tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    events: Mutex<Vec<String>>,
}

impl RecordingSurface {
    fn events_mut(&self) -> MutexGuard<'_, Vec<String>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// All calls as `kind:message`, `busy:bool` or `card_section:bool`
    pub fn events(&self) -> Vec<String> {
        self.events_mut().clone()
    }

    /// Last rendered status as `(kind, message)`
    pub fn last_status(&self) -> Option<(String, String)> {
        self.events_mut()
            .iter()
            .rev()
            .filter(|e| !e.starts_with("busy:") && !e.starts_with("card_section:"))
            .find_map(|e| e.split_once(':'))
            .map(|(k, m)| (k.to_string(), m.to_string()))
    }

    /// Whether the submit control is currently busy
    pub fn busy(&self) -> bool {
        self.events_mut()
            .iter()
            .rev()
            .find_map(|e| e.strip_prefix("busy:"))
            .map(|b| b == "true")
            .unwrap_or(false)
    }
}

impl StatusSurface for RecordingSurface {
    fn report(&self, kind: StatusKind, message: &str) {
        self.events_mut().push(format!("{}:{}", kind, message));
    }

    fn set_busy(&self, busy: bool) {
        self.events_mut().push(format!("busy:{}", busy));
    }

    fn show_card_section(&self, visible: bool) {
        self.events_mut().push(format!("card_section:{}", visible));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_surface_projection() {
        let surface = RecordingSurface::default();
        surface.report(StatusKind::Info, "Processing order...");
        surface.set_busy(true);
        surface.report(StatusKind::Danger, "Card declined: try another card");
        surface.set_busy(false);

        assert_eq!(
            surface.last_status(),
            Some((
                "danger".to_string(),
                "Card declined: try another card".to_string()
            ))
        );
        assert!(!surface.busy());
    }
}
