//! Job application lifecycle: creation defaults, free-form status transitions
//! and explicit ordering on top of the gateway's unordered lists.

use std::cmp::Ordering;

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::errors::AppError;
use crate::gateway::Gateway;
use crate::models::job::{
    JobApplication, JobApplicationDraft, JobApplicationPatch, JobStatus, NewJobApplication,
};

/// Deterministic orderings a caller may ask for. Ties break on id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobOrder {
    /// Most recent application first.
    AppliedDate,
    /// Alphabetical, case-insensitive.
    Company,
    /// Newest record first.
    CreatedAt,
    /// Most recently touched first.
    UpdatedAt,
}

/// Resolves client input into a draft: required fields checked, defaults applied.
pub fn prepare_draft(
    input: NewJobApplication,
    clock: &dyn Clock,
) -> Result<JobApplicationDraft, AppError> {
    let company = required(input.company, "company")?;
    let position = required(input.position, "position")?;

    Ok(JobApplicationDraft {
        company,
        position,
        location: non_blank(input.location),
        // An unselected status field arrives as "".
        status: input
            .status
            .filter(|status| !status.as_str().trim().is_empty())
            .unwrap_or_default(),
        applied_date: input
            .applied_date
            .unwrap_or_else(|| clock.now().date_naive()),
        link: non_blank(input.link),
        notes: non_blank(input.notes),
    })
}

pub async fn create_job_application(
    gateway: &dyn Gateway,
    clock: &dyn Clock,
    user_id: Uuid,
    input: NewJobApplication,
) -> Result<Uuid, AppError> {
    let draft = prepare_draft(input, clock)?;
    warn_if_unrecognized(&draft.status);
    let company = draft.company.clone();
    let id = gateway.add_job_application(user_id, draft).await?;
    info!("Created job application {id} ({company}) for user {user_id}");
    Ok(id)
}

/// Any status is forwarded; unknown values surface later as an unrecognized badge.
pub async fn update_job_status(
    gateway: &dyn Gateway,
    user_id: Uuid,
    job_id: Uuid,
    status: JobStatus,
) -> Result<(), AppError> {
    warn_if_unrecognized(&status);
    gateway
        .update_job_application(user_id, job_id, &JobApplicationPatch::status(status.clone()))
        .await?;
    info!("Job application {job_id} moved to '{status}' for user {user_id}");
    Ok(())
}

pub async fn update_job_application(
    gateway: &dyn Gateway,
    user_id: Uuid,
    job_id: Uuid,
    mut patch: JobApplicationPatch,
) -> Result<(), AppError> {
    if let Some(company) = patch.company.take() {
        patch.company = Some(required(company, "company")?);
    }
    if let Some(position) = patch.position.take() {
        patch.position = Some(required(position, "position")?);
    }
    if let Some(status) = &patch.status {
        warn_if_unrecognized(status);
    }
    gateway.update_job_application(user_id, job_id, &patch).await?;
    Ok(())
}

pub async fn delete_job_application(
    gateway: &dyn Gateway,
    user_id: Uuid,
    job_id: Uuid,
) -> Result<(), AppError> {
    gateway.delete_job_application(user_id, job_id).await?;
    info!("Deleted job application {job_id} for user {user_id}");
    Ok(())
}

/// Lists a user's applications. Without an `order` the gateway's native
/// order is returned as-is, which is not guaranteed to be stable.
pub async fn list_job_applications(
    gateway: &dyn Gateway,
    user_id: Uuid,
    order: Option<JobOrder>,
) -> Result<Vec<JobApplication>, AppError> {
    let mut jobs = gateway.get_job_applications(user_id).await?;
    if let Some(order) = order {
        sort_jobs(&mut jobs, order);
    }
    Ok(jobs)
}

pub fn sort_jobs(jobs: &mut [JobApplication], order: JobOrder) {
    jobs.sort_by(|a, b| compare(a, b, order).then_with(|| a.id.cmp(&b.id)));
}

fn compare(a: &JobApplication, b: &JobApplication, order: JobOrder) -> Ordering {
    match order {
        JobOrder::AppliedDate => b.applied_date.cmp(&a.applied_date),
        JobOrder::Company => a.company.to_lowercase().cmp(&b.company.to_lowercase()),
        JobOrder::CreatedAt => b.created_at.cmp(&a.created_at),
        JobOrder::UpdatedAt => b.updated_at.cmp(&a.updated_at),
    }
}

fn required(value: String, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn warn_if_unrecognized(status: &JobStatus) {
    if !status.is_recognized() {
        warn!("Storing unrecognized job status '{status}'");
    }
}
