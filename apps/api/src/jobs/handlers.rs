//! Axum route handlers for the job tracker.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::lifecycle::{self, JobOrder};
use crate::models::job::{JobApplication, JobApplicationPatch, JobStatus, NewJobApplication};
use crate::models::StatusBadge;
use crate::routes::{CreatedResponse, UserIdQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    pub user_id: Uuid,
    #[serde(default)]
    pub order: Option<JobOrder>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: JobStatus,
}

#[derive(Debug, Serialize)]
pub struct JobApplicationView {
    #[serde(flatten)]
    pub job: JobApplication,
    pub badge: StatusBadge,
}

impl From<JobApplication> for JobApplicationView {
    fn from(job: JobApplication) -> Self {
        let badge = job.status.badge();
        Self { job, badge }
    }
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<ListJobsQuery>,
) -> Result<Json<Vec<JobApplicationView>>, AppError> {
    let jobs =
        lifecycle::list_job_applications(state.gateway.as_ref(), params.user_id, params.order)
            .await?;
    Ok(Json(jobs.into_iter().map(JobApplicationView::from).collect()))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    Json(req): Json<NewJobApplication>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let id = lifecycle::create_job_application(
        state.gateway.as_ref(),
        state.clock.as_ref(),
        params.user_id,
        req,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// PATCH /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
    Json(patch): Json<JobApplicationPatch>,
) -> Result<StatusCode, AppError> {
    lifecycle::update_job_application(state.gateway.as_ref(), params.user_id, id, patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/jobs/:id/status
pub async fn handle_update_job_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
    Json(req): Json<StatusUpdate>,
) -> Result<StatusCode, AppError> {
    lifecycle::update_job_status(state.gateway.as_ref(), params.user_id, id, req.status).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    lifecycle::delete_job_application(state.gateway.as_ref(), params.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
