//! Test doubles layered over `MemoryGateway`.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::clock::Clock;
use crate::gateway::{Gateway, GatewayError, MemoryGateway};
use crate::models::interview::{InterviewDraft, MockInterview, MockInterviewPatch};
use crate::models::job::{JobApplication, JobApplicationDraft, JobApplicationPatch};
use crate::models::resume::Resume;

/// Counts every call and can be told to fail: wholesale (`set_offline`) or
/// only for deletes of specific interview ids.
pub struct FaultyGateway {
    inner: MemoryGateway,
    calls: AtomicUsize,
    offline: AtomicBool,
    failing_deletes: Mutex<HashSet<Uuid>>,
}

impl FaultyGateway {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: MemoryGateway::new(clock),
            calls: AtomicUsize::new(0),
            offline: AtomicBool::new(false),
            failing_deletes: Mutex::new(HashSet::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn fail_delete_of(&self, interview_id: Uuid) {
        self.failing_deletes.lock().unwrap().insert(interview_id);
    }

    fn enter(&self) -> Result<(), GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            Err(GatewayError::Unavailable("simulated outage".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Gateway for FaultyGateway {
    async fn get_resume(&self, user_id: Uuid) -> Result<Option<Resume>, GatewayError> {
        self.enter()?;
        self.inner.get_resume(user_id).await
    }

    async fn save_resume(&self, user_id: Uuid, document: &Value) -> Result<(), GatewayError> {
        self.enter()?;
        self.inner.save_resume(user_id, document).await
    }

    async fn add_job_application(
        &self,
        user_id: Uuid,
        draft: JobApplicationDraft,
    ) -> Result<Uuid, GatewayError> {
        self.enter()?;
        self.inner.add_job_application(user_id, draft).await
    }

    async fn update_job_application(
        &self,
        user_id: Uuid,
        job_id: Uuid,
        patch: &JobApplicationPatch,
    ) -> Result<(), GatewayError> {
        self.enter()?;
        self.inner.update_job_application(user_id, job_id, patch).await
    }

    async fn delete_job_application(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<(), GatewayError> {
        self.enter()?;
        self.inner.delete_job_application(user_id, job_id).await
    }

    async fn get_job_applications(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<JobApplication>, GatewayError> {
        self.enter()?;
        self.inner.get_job_applications(user_id).await
    }

    async fn schedule_mock_interview(
        &self,
        user_id: Uuid,
        draft: InterviewDraft,
    ) -> Result<Uuid, GatewayError> {
        self.enter()?;
        self.inner.schedule_mock_interview(user_id, draft).await
    }

    async fn get_mock_interviews(&self, user_id: Uuid) -> Result<Vec<MockInterview>, GatewayError> {
        self.enter()?;
        self.inner.get_mock_interviews(user_id).await
    }

    async fn update_mock_interview(
        &self,
        user_id: Uuid,
        interview_id: Uuid,
        patch: &MockInterviewPatch,
    ) -> Result<(), GatewayError> {
        self.enter()?;
        self.inner
            .update_mock_interview(user_id, interview_id, patch)
            .await
    }

    async fn delete_mock_interview(
        &self,
        user_id: Uuid,
        interview_id: Uuid,
    ) -> Result<(), GatewayError> {
        self.enter()?;
        if self.failing_deletes.lock().unwrap().contains(&interview_id) {
            return Err(GatewayError::Unavailable(format!(
                "simulated delete failure for {interview_id}"
            )));
        }
        self.inner.delete_mock_interview(user_id, interview_id).await
    }
}
