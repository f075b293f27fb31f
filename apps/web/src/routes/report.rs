//! Axum handlers for the report pages and the JSON report API.

use axum::{
    extract::{multipart::Multipart, State},
    http::StatusCode,
    response::Html,
    Json,
};
use tracing::warn;

use crate::analyzer_client::RESUME_FIELD;
use crate::controller::{
    BufferedSurface, RequestController, ResumeFile, SubmitError, SubmitOutcome, SurfaceSnapshot,
};
use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;
use crate::models::view::ViewModel;
use crate::presentation::ResultPresenter;
use crate::render::render_page;
use crate::state::AppState;

/// GET /
///
/// Upload page in its idle state.
pub async fn handle_index() -> Html<String> {
    Html(render_page(&SurfaceSnapshot::default()))
}

/// POST /report
///
/// Runs one submission and renders whatever the surface ends up showing.
/// Every request is its own session with its own controller, so concurrent
/// uploads never block each other and `Ignored` cannot occur here. The
/// single-flight rule only applies to callers sharing one controller.
pub async fn handle_report_page(
    State(state): State<AppState>,
    multipart: Multipart,
) -> (StatusCode, Html<String>) {
    let file = match read_resume(multipart).await {
        Ok(file) => file,
        Err(e) => {
            let snapshot = SurfaceSnapshot {
                error: Some(e.to_string()),
                ..Default::default()
            };
            return (e.status(), Html(render_page(&snapshot)));
        }
    };

    let controller = RequestController::new(state.analyzer.clone(), BufferedSurface::default());
    let outcome = controller.submit(file).await;
    let status = outcome_status(&outcome);

    (status, Html(render_page(&controller.surface().snapshot())))
}

/// POST /api/v1/report
///
/// Same flow as the page, returning the view model as JSON. Per-request
/// session like `/report`, so the 409 mapping is only reached by a shared
/// controller.
pub async fn handle_report_json(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ViewModel>, AppError> {
    let file = read_resume(multipart).await?;

    let controller = RequestController::new(state.analyzer.clone(), BufferedSurface::default());
    report_result(controller.submit(file).await).map(Json)
}

/// POST /api/v1/present
///
/// Presents an analysis payload supplied by the caller. No upstream call.
pub async fn handle_present(Json(result): Json<AnalysisResult>) -> Json<ViewModel> {
    Json(ResultPresenter.present(&result))
}

fn report_result(outcome: SubmitOutcome) -> Result<ViewModel, AppError> {
    match outcome {
        SubmitOutcome::Rendered(view) => Ok(view),
        SubmitOutcome::Failed(e) => Err(e.into()),
        SubmitOutcome::Ignored => Err(AppError::Conflict(
            "An analysis is already in progress".to_string(),
        )),
    }
}

fn outcome_status(outcome: &SubmitOutcome) -> StatusCode {
    match outcome {
        SubmitOutcome::Rendered(_) => StatusCode::OK,
        SubmitOutcome::Ignored => StatusCode::CONFLICT,
        SubmitOutcome::Failed(SubmitError::Validation(_)) => StatusCode::BAD_REQUEST,
        SubmitOutcome::Failed(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Pulls the `resume` field out of the form. A field with no file name is
/// treated as "nothing selected", like an empty file input.
async fn read_resume(mut multipart: Multipart) -> Result<Option<ResumeFile>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("").to_string();
        if file_name.is_empty() {
            return Ok(None);
        }
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| {
            warn!("Failed to read upload '{file_name}': {e}");
            AppError::Validation(format!("Could not read uploaded file: {e}"))
        })?;

        return Ok(Some(
            ResumeFile::new(file_name, bytes).with_content_type(content_type),
        ));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ValidationError;

    #[test]
    fn test_ignored_submission_is_a_conflict() {
        let err = report_result(SubmitOutcome::Ignored).unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(outcome_status(&SubmitOutcome::Ignored), StatusCode::CONFLICT);
    }

    #[test]
    fn test_failed_submission_maps_to_error_status() {
        let err = report_result(SubmitOutcome::Failed(SubmitError::Validation(
            ValidationError::NoFileSelected,
        )))
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = report_result(SubmitOutcome::Failed(SubmitError::Service("No text".into())))
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }
}
