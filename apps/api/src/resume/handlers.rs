//! Axum route handlers for the resume builder.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::gateway::Gateway;
use crate::models::resume::Resume;
use crate::resume::builder::ResumeEdit;
use crate::resume::markdown::render_resume_to_md;
use crate::routes::UserIdQuery;
use crate::state::AppState;

/// Stored resume, or a fully-initialized empty one when the user has none yet.
pub async fn load_resume(gateway: &dyn Gateway, user_id: Uuid) -> Result<Resume, AppError> {
    Ok(gateway.get_resume(user_id).await?.unwrap_or_default())
}

/// GET /api/v1/resume
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(load_resume(state.gateway.as_ref(), params.user_id).await?))
}

/// PUT /api/v1/resume
///
/// Merge write of a full or partial resume document.
pub async fn handle_save_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    Json(document): Json<Value>,
) -> Result<StatusCode, AppError> {
    if !document.is_object() {
        return Err(AppError::Validation(
            "resume must be a JSON object".to_string(),
        ));
    }
    // Shape check only; the raw document is what gets merged.
    serde_json::from_value::<Resume>(document.clone())
        .map_err(|e| AppError::Validation(format!("invalid resume: {e}")))?;

    state.gateway.save_resume(params.user_id, &document).await?;
    info!("Saved resume for user {}", params.user_id);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/resume/edits
///
/// Applies a batch of edits to the stored resume and saves the result.
pub async fn handle_apply_edits(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    Json(edits): Json<Vec<ResumeEdit>>,
) -> Result<Json<Resume>, AppError> {
    let mut resume = load_resume(state.gateway.as_ref(), params.user_id).await?;
    let count = edits.len();
    resume.apply_all(edits)?;

    let document = serde_json::to_value(&resume).map_err(anyhow::Error::from)?;
    state.gateway.save_resume(params.user_id, &document).await?;
    info!("Applied {count} resume edits for user {}", params.user_id);
    Ok(Json(resume))
}

/// GET /api/v1/resume/markdown
pub async fn handle_export_markdown(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<impl IntoResponse, AppError> {
    let resume = load_resume(state.gateway.as_ref(), params.user_id).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        render_resume_to_md(&resume),
    ))
}
