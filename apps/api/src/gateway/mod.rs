//! Persistence gateway: the one shared resource in the service.
//!
//! Collections are scoped per user: one resume document, a set of job
//! applications and a set of mock interviews. Backends are swapped at startup
//! via `GATEWAY_BACKEND`; `AppState` carries an `Arc<dyn Gateway>`.

pub mod memory;
pub mod postgres;

#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::models::interview::{InterviewDraft, MockInterview, MockInterviewPatch};
use crate::models::job::{JobApplication, JobApplicationDraft, JobApplicationPatch};
use crate::models::resume::Resume;

pub use memory::MemoryGateway;
pub use postgres::PgGateway;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Gateway unavailable: {0}")]
    Unavailable(String),
}

/// CRUD contract over the three per-user collections.
///
/// Timestamps and ids are assigned here, never by callers. List operations
/// return records in backend-native order; callers sort when they need to.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn get_resume(&self, user_id: Uuid) -> Result<Option<Resume>, GatewayError>;

    /// Merge write: `document` must be a JSON object. Nested objects merge
    /// field-by-field, everything else replaces the stored value.
    async fn save_resume(&self, user_id: Uuid, document: &Value) -> Result<(), GatewayError>;

    async fn add_job_application(
        &self,
        user_id: Uuid,
        draft: JobApplicationDraft,
    ) -> Result<Uuid, GatewayError>;

    async fn update_job_application(
        &self,
        user_id: Uuid,
        job_id: Uuid,
        patch: &JobApplicationPatch,
    ) -> Result<(), GatewayError>;

    /// Deleting an id that does not exist succeeds.
    async fn delete_job_application(&self, user_id: Uuid, job_id: Uuid)
        -> Result<(), GatewayError>;

    async fn get_job_applications(&self, user_id: Uuid)
        -> Result<Vec<JobApplication>, GatewayError>;

    /// Persists with status `scheduled`.
    async fn schedule_mock_interview(
        &self,
        user_id: Uuid,
        draft: InterviewDraft,
    ) -> Result<Uuid, GatewayError>;

    async fn get_mock_interviews(&self, user_id: Uuid) -> Result<Vec<MockInterview>, GatewayError>;

    async fn update_mock_interview(
        &self,
        user_id: Uuid,
        interview_id: Uuid,
        patch: &MockInterviewPatch,
    ) -> Result<(), GatewayError>;

    /// Deleting an id that does not exist succeeds.
    async fn delete_mock_interview(
        &self,
        user_id: Uuid,
        interview_id: Uuid,
    ) -> Result<(), GatewayError>;
}

/// Deep-merges `patch` into `target`. Objects merge recursively; arrays,
/// scalars and nulls in the patch replace the target value.
pub fn merge_document(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => merge_objects(target, patch),
        (target, patch) => *target = patch.clone(),
    }
}

fn merge_objects(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        match target.get_mut(key) {
            Some(existing) if existing.is_object() && value.is_object() => {
                merge_document(existing, value);
                continue;
            }
            _ => {}
        }
        target.insert(key.clone(), value.clone());
    }
}

/// Decodes a stored resume document, filling any absent sections.
pub fn decode_resume(document: Value) -> Result<Resume, GatewayError> {
    serde_json::from_value(document).map_err(|e| GatewayError::InvalidDocument(e.to_string()))
}

pub(crate) fn require_object(document: &Value) -> Result<(), GatewayError> {
    if document.is_object() {
        Ok(())
    } else {
        Err(GatewayError::InvalidDocument(
            "resume document must be a JSON object".to_string(),
        ))
    }
}
