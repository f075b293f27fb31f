use std::sync::Mutex;

use serde::Serialize;

use crate::controller::{PresentationSurface, IDLE_LABEL};
use crate::models::view::ViewModel;

/// What the user currently sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceSnapshot {
    pub trigger_enabled: bool,
    pub trigger_label: String,
    pub error: Option<String>,
    pub report: Option<ViewModel>,
}

impl Default for SurfaceSnapshot {
    fn default() -> Self {
        Self {
            trigger_enabled: true,
            trigger_label: IDLE_LABEL.to_string(),
            error: None,
            report: None,
        }
    }
}

/// In-memory surface. The HTTP layer renders its snapshot once the
/// controller is done.
#[derive(Debug, Default)]
pub struct BufferedSurface {
    state: Mutex<SurfaceSnapshot>,
}

impl BufferedSurface {
    pub fn snapshot(&self) -> SurfaceSnapshot {
        self.with_state(|state| state.clone())
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut SurfaceSnapshot) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

impl PresentationSurface for BufferedSurface {
    fn set_trigger(&self, enabled: bool, label: &str) {
        self.with_state(|state| {
            state.trigger_enabled = enabled;
            state.trigger_label = label.to_string();
        });
    }

    fn clear(&self) {
        self.with_state(|state| {
            state.error = None;
            state.report = None;
        });
    }

    fn show_error(&self, message: &str) {
        self.with_state(|state| state.error = Some(message.to_string()));
    }

    fn show_report(&self, report: &ViewModel) {
        self.with_state(|state| state.report = Some(report.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::BUSY_LABEL;

    #[test]
    fn test_starts_idle() {
        let surface = BufferedSurface::default();
        let snap = surface.snapshot();
        assert!(snap.trigger_enabled);
        assert_eq!(snap.trigger_label, IDLE_LABEL);
        assert!(snap.error.is_none() && snap.report.is_none());
    }

    #[test]
    fn test_error_slot_replaces_prior_message() {
        let surface = BufferedSurface::default();
        surface.show_error("first");
        surface.show_error("second");
        assert_eq!(surface.snapshot().error.as_deref(), Some("second"));
        surface.clear();
        assert!(surface.snapshot().error.is_none());
    }

    #[test]
    fn test_trigger_state() {
        let surface = BufferedSurface::default();
        surface.set_trigger(false, BUSY_LABEL);
        let snap = surface.snapshot();
        assert!(!snap.trigger_enabled);
        assert_eq!(snap.trigger_label, BUSY_LABEL);
    }
}
