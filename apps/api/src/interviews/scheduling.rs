use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::errors::AppError;
use crate::gateway::Gateway;
use crate::models::interview::{
    InterviewDraft, InterviewDuration, InterviewStatus, InterviewType, MockInterviewPatch,
};

/// Offsets beyond ±18h are not real timezones.
const MAX_UTC_OFFSET_MINUTES: i32 = 18 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleRequest {
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub duration: InterviewDuration,
    #[serde(default)]
    pub notes: Option<String>,
    /// Client's offset from UTC in minutes (e.g. 120 for UTC+2). Defaults to UTC.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

/// Combines a wall-clock date and time at the given offset into one instant.
pub fn combine_date_time(
    date: NaiveDate,
    time: NaiveTime,
    utc_offset_minutes: i32,
) -> Result<DateTime<Utc>, AppError> {
    if utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
        return Err(AppError::Validation(format!(
            "utc_offset_minutes {utc_offset_minutes} is out of range"
        )));
    }
    let offset = FixedOffset::east_opt(utc_offset_minutes * 60).ok_or_else(|| {
        AppError::Validation(format!("utc_offset_minutes {utc_offset_minutes} is out of range"))
    })?;
    offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::Validation("Invalid interview date and time".to_string()))
}

/// The scheduled instant must be strictly after `now`.
pub fn ensure_future(scheduled_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), AppError> {
    if scheduled_at <= now {
        return Err(AppError::Validation(
            "Please select a future date and time for the interview".to_string(),
        ));
    }
    Ok(())
}

/// Validates a request into a draft without touching the gateway.
pub fn prepare_draft(req: ScheduleRequest, now: DateTime<Utc>) -> Result<InterviewDraft, AppError> {
    let scheduled_at = combine_date_time(req.date, req.time, req.utc_offset_minutes.unwrap_or(0))?;
    ensure_future(scheduled_at, now)?;
    Ok(InterviewDraft {
        interview_type: req.interview_type,
        scheduled_at,
        duration: req.duration,
        notes: req.notes.filter(|n| !n.trim().is_empty()),
    })
}

pub async fn schedule_interview(
    gateway: &dyn Gateway,
    clock: &dyn Clock,
    user_id: Uuid,
    req: ScheduleRequest,
) -> Result<Uuid, AppError> {
    let draft = prepare_draft(req, clock.now())?;
    let (kind, at) = (draft.interview_type, draft.scheduled_at);
    let id = gateway.schedule_mock_interview(user_id, draft).await?;
    info!("Scheduled {kind} interview {id} at {at} for user {user_id}");
    Ok(id)
}

/// Status and notes are editable while the interview is still listed.
/// Transitions are not constrained.
pub async fn update_interview(
    gateway: &dyn Gateway,
    user_id: Uuid,
    interview_id: Uuid,
    patch: MockInterviewPatch,
) -> Result<(), AppError> {
    if patch.is_empty() {
        return Err(AppError::Validation(
            "Nothing to update: provide status and/or notes".to_string(),
        ));
    }
    if let Some(InterviewStatus::Unrecognized(raw)) = &patch.status {
        warn!("Storing unrecognized interview status '{raw}'");
    }
    gateway
        .update_mock_interview(user_id, interview_id, &patch)
        .await?;
    Ok(())
}

pub async fn delete_interview(
    gateway: &dyn Gateway,
    user_id: Uuid,
    interview_id: Uuid,
) -> Result<(), AppError> {
    gateway.delete_mock_interview(user_id, interview_id).await?;
    info!("Deleted mock interview {interview_id} for user {user_id}");
    Ok(())
}
