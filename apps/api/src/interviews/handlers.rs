//! Axum route handlers for mock interviews and interview view sessions.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::clock::Clock;
use crate::errors::AppError;
use crate::interviews::expiry::{reconcile, time_remaining, TimeRemaining};
use crate::interviews::scheduling::{self, ScheduleRequest};
use crate::models::interview::{MockInterview, MockInterviewPatch};
use crate::models::StatusBadge;
use crate::routes::{CreatedResponse, UserIdQuery};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct InterviewView {
    #[serde(flatten)]
    pub interview: MockInterview,
    pub title: &'static str,
    pub badge: StatusBadge,
    pub time_remaining: TimeRemaining,
}

impl InterviewView {
    pub fn new(interview: MockInterview, now: DateTime<Utc>) -> Self {
        Self {
            title: interview.interview_type.title(),
            badge: interview.status.badge(),
            time_remaining: time_remaining(&interview, now),
            interview,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ViewOpenedResponse {
    pub view_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewSnapshotResponse {
    /// The first reconciliation pass has not completed yet.
    Pending,
    Ready {
        reconciled_at: DateTime<Utc>,
        pass: u64,
        interviews: Vec<InterviewView>,
    },
}

/// Soonest first, so the list reads like an agenda.
fn into_views(mut interviews: Vec<MockInterview>, now: DateTime<Utc>) -> Vec<InterviewView> {
    interviews.sort_by(|a, b| {
        a.scheduled_at
            .cmp(&b.scheduled_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    interviews
        .into_iter()
        .map(|interview| InterviewView::new(interview, now))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/interviews
///
/// Runs one reconciliation pass and returns what is still active.
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<InterviewView>>, AppError> {
    let now = state.clock.now();
    let outcome = reconcile(state.gateway.as_ref(), params.user_id, now).await?;
    Ok(Json(into_views(outcome.active, now)))
}

/// POST /api/v1/interviews
pub async fn handle_schedule_interview(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    Json(req): Json<ScheduleRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let id = scheduling::schedule_interview(
        state.gateway.as_ref(),
        state.clock.as_ref(),
        params.user_id,
        req,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// PATCH /api/v1/interviews/:id
pub async fn handle_update_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
    Json(patch): Json<MockInterviewPatch>,
) -> Result<StatusCode, AppError> {
    scheduling::update_interview(state.gateway.as_ref(), params.user_id, id, patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/interviews/:id
pub async fn handle_delete_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    scheduling::delete_interview(state.gateway.as_ref(), params.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/interviews/views
pub async fn handle_open_view(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> (StatusCode, Json<ViewOpenedResponse>) {
    let view_id = state.interview_views.open(params.user_id);
    (StatusCode::CREATED, Json(ViewOpenedResponse { view_id }))
}

/// GET /api/v1/interviews/views/:view_id
pub async fn handle_view_snapshot(
    State(state): State<AppState>,
    Path(view_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ViewSnapshotResponse>, AppError> {
    let snapshot = state
        .interview_views
        .snapshot(view_id, params.user_id)
        .ok_or_else(|| AppError::NotFound(format!("Interview view {view_id} not found")))?;

    let response = match snapshot {
        None => ViewSnapshotResponse::Pending,
        Some(snapshot) => ViewSnapshotResponse::Ready {
            reconciled_at: snapshot.reconciled_at,
            pass: snapshot.pass,
            // Countdown labels are computed against the current time, not the pass time.
            interviews: into_views(snapshot.active, state.clock.now()),
        },
    };
    Ok(Json(response))
}

/// DELETE /api/v1/interviews/views/:view_id
pub async fn handle_close_view(
    State(state): State<AppState>,
    Path(view_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    if state.interview_views.close(view_id, params.user_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Interview view {view_id} not found")))
    }
}
