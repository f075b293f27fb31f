//! Request controller: owns the submit lifecycle for one session.
//!
//! `Idle → Validating → Submitting → (Success | Failure) → Idle`
//!
//! The controller only talks to the outside through two capabilities: an
//! [`AnalysisTransport`] that performs the upload, and a
//! [`PresentationSurface`] it writes state into. At most one submission is in
//! flight; a trigger that arrives while one is running is ignored.

pub mod surface;
pub mod validation;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analyzer_client::AnalyzerError;
use crate::models::analysis::AnalysisResult;
use crate::models::view::ViewModel;
use crate::presentation::ResultPresenter;

pub use surface::{BufferedSurface, SurfaceSnapshot};
pub use validation::{validate_upload, ResumeFile, ValidationError};

pub const IDLE_LABEL: &str = "Analyze Resume";
pub const BUSY_LABEL: &str = "Analyzing...";
pub const GENERIC_TRANSPORT_MESSAGE: &str = "An error occurred during analysis";
pub const GENERIC_SERVICE_MESSAGE: &str = "Analysis failed";

/// Where the controller writes what the user sees.
pub trait PresentationSurface: Send + Sync {
    fn set_trigger(&self, enabled: bool, label: &str);
    /// Hides any prior error and result.
    fn clear(&self);
    /// Single message slot; replaces whatever was shown before.
    fn show_error(&self, message: &str);
    fn show_report(&self, report: &ViewModel);
}

/// Raw answer from the analysis service.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs the single upload exchange. Timeouts belong to the implementation.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn analyze(&self, file: &ResumeFile) -> Result<TransportResponse, AnalyzerError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    Idle,
    Validating,
    Submitting,
    Success,
    Failure,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Network failure or an unreadable response. The detail is logged, the
    /// user gets a generic message.
    #[error("{}", GENERIC_TRANSPORT_MESSAGE)]
    Transport { detail: String },

    /// Error reported by the service, shown verbatim.
    #[error("{0}")]
    Service(String),
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Rendered(ViewModel),
    Failed(SubmitError),
    /// A submission was already in flight.
    Ignored,
}

pub struct RequestController<S> {
    transport: Arc<dyn AnalysisTransport>,
    surface: S,
    presenter: ResultPresenter,
    state: Mutex<ControllerState>,
}

impl<S: PresentationSurface> RequestController<S> {
    pub fn new(transport: Arc<dyn AnalysisTransport>, surface: S) -> Self {
        Self {
            transport,
            surface,
            presenter: ResultPresenter,
            state: Mutex::new(ControllerState::Idle),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn state(&self) -> ControllerState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Runs one submission to completion. Always leaves the controller idle
    /// with the trigger re-enabled.
    pub async fn submit(&self, file: Option<ResumeFile>) -> SubmitOutcome {
        if !self.try_begin() {
            debug!("Submission ignored: a request is already in flight");
            return SubmitOutcome::Ignored;
        }

        let file = match validate_upload(file.as_ref()) {
            Ok(file) => file,
            Err(e) => {
                warn!("Upload rejected before submission: {e}");
                self.transition(ControllerState::Failure);
                self.surface.show_error(&e.to_string());
                self.transition(ControllerState::Idle);
                return SubmitOutcome::Failed(e.into());
            }
        };

        let _busy = BusyGuard::acquire(self);
        info!(
            "Submitting '{}' ({} bytes) for analysis",
            file.file_name,
            file.bytes.len()
        );

        match self.analyze(file).await {
            Ok(report) => {
                info!(
                    "Report ready: {} sections, {} recommendations",
                    report.fragments.len(),
                    report.recommendations().len()
                );
                self.transition(ControllerState::Success);
                self.surface.show_report(&report);
                SubmitOutcome::Rendered(report)
            }
            Err(e) => {
                if let SubmitError::Transport { detail } = &e {
                    warn!("Analysis transport failed: {detail}");
                } else {
                    warn!("Analysis service rejected the resume: {e}");
                }
                self.transition(ControllerState::Failure);
                self.surface.show_error(&e.to_string());
                SubmitOutcome::Failed(e)
            }
        }
    }

    async fn analyze(&self, file: &ResumeFile) -> Result<ViewModel, SubmitError> {
        let response = self
            .transport
            .analyze(file)
            .await
            .map_err(|e| SubmitError::Transport {
                detail: e.to_string(),
            })?;
        let result = interpret_response(response)?;
        Ok(self.presenter.present(&result))
    }

    fn try_begin(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if *state != ControllerState::Idle {
            return false;
        }
        debug!("Controller: {:?} -> {:?}", *state, ControllerState::Validating);
        *state = ControllerState::Validating;
        true
    }

    fn transition(&self, next: ControllerState) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        debug!("Controller: {:?} -> {:?}", *state, next);
        *state = next;
    }
}

/// Holds the busy state for the duration of a submission. Dropping it
/// re-enables the trigger and returns the controller to idle on every path.
struct BusyGuard<'a, S: PresentationSurface> {
    controller: &'a RequestController<S>,
}

impl<'a, S: PresentationSurface> BusyGuard<'a, S> {
    fn acquire(controller: &'a RequestController<S>) -> Self {
        controller.transition(ControllerState::Submitting);
        controller.surface.set_trigger(false, BUSY_LABEL);
        controller.surface.clear();
        Self { controller }
    }
}

impl<S: PresentationSurface> Drop for BusyGuard<'_, S> {
    fn drop(&mut self) {
        self.controller.surface.set_trigger(true, IDLE_LABEL);
        self.controller.transition(ControllerState::Idle);
    }
}

/// Maps a raw response onto a payload or a submit error.
fn interpret_response(response: TransportResponse) -> Result<AnalysisResult, SubmitError> {
    let body: Value =
        serde_json::from_slice(&response.body).map_err(|e| SubmitError::Transport {
            detail: format!("unreadable response body (status {}): {e}", response.status),
        })?;

    if !response.is_success() {
        let message = service_message(&body).unwrap_or(GENERIC_SERVICE_MESSAGE);
        return Err(SubmitError::Service(message.to_string()));
    }

    let result = AnalysisResult::from_value(body).map_err(|e| SubmitError::Transport {
        detail: e.to_string(),
    })?;

    // The service may also report failure under a success status.
    if let Some(message) = result.error.as_deref().filter(|m| !m.trim().is_empty()) {
        return Err(SubmitError::Service(message.to_string()));
    }

    Ok(result)
}

/// Accepts `{"error": "..."}` and `{"error": {"message": "..."}}`.
fn service_message(body: &Value) -> Option<&str> {
    let error = body.get("error")?;
    error
        .as_str()
        .or_else(|| error.get("message").and_then(Value::as_str))
        .filter(|m| !m.trim().is_empty())
}
