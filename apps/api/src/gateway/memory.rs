use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::clock::Clock;
use crate::gateway::{decode_resume, merge_document, require_object, Gateway, GatewayError};
use crate::models::interview::{InterviewDraft, InterviewStatus, MockInterview, MockInterviewPatch};
use crate::models::job::{JobApplication, JobApplicationDraft, JobApplicationPatch};
use crate::models::resume::Resume;

#[derive(Default)]
struct UserCollections {
    resume: Option<Value>,
    jobs: HashMap<Uuid, JobApplication>,
    interviews: HashMap<Uuid, MockInterview>,
}

/// In-process gateway. Lists come back in `HashMap` order, i.e. unordered,
/// which is all the contract promises.
pub struct MemoryGateway {
    users: RwLock<HashMap<Uuid, UserCollections>>,
    clock: Arc<dyn Clock>,
}

impl MemoryGateway {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            clock,
        }
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn get_resume(&self, user_id: Uuid) -> Result<Option<Resume>, GatewayError> {
        let users = self.users.read().await;
        match users.get(&user_id).and_then(|u| u.resume.clone()) {
            Some(document) => Ok(Some(decode_resume(document)?)),
            None => Ok(None),
        }
    }

    async fn save_resume(&self, user_id: Uuid, document: &Value) -> Result<(), GatewayError> {
        require_object(document)?;
        let mut users = self.users.write().await;
        let stored = users
            .entry(user_id)
            .or_default()
            .resume
            .get_or_insert_with(|| Value::Object(Default::default()));
        merge_document(stored, document);
        debug!("Merged resume document for user {user_id}");
        Ok(())
    }

    async fn add_job_application(
        &self,
        user_id: Uuid,
        draft: JobApplicationDraft,
    ) -> Result<Uuid, GatewayError> {
        let now = self.clock.now();
        let id = Uuid::new_v4();
        let job = JobApplication {
            id,
            company: draft.company,
            position: draft.position,
            location: draft.location,
            status: draft.status,
            applied_date: draft.applied_date,
            link: draft.link,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        };
        self.users
            .write()
            .await
            .entry(user_id)
            .or_default()
            .jobs
            .insert(id, job);
        Ok(id)
    }

    async fn update_job_application(
        &self,
        user_id: Uuid,
        job_id: Uuid,
        patch: &JobApplicationPatch,
    ) -> Result<(), GatewayError> {
        let now = self.clock.now();
        let mut users = self.users.write().await;
        let job = users
            .get_mut(&user_id)
            .and_then(|u| u.jobs.get_mut(&job_id))
            .ok_or_else(|| GatewayError::NotFound(format!("Job application {job_id}")))?;
        patch.apply_to(job);
        job.updated_at = now;
        Ok(())
    }

    async fn delete_job_application(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<(), GatewayError> {
        if let Some(user) = self.users.write().await.get_mut(&user_id) {
            user.jobs.remove(&job_id);
        }
        Ok(())
    }

    async fn get_job_applications(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<JobApplication>, GatewayError> {
        Ok(self
            .users
            .read()
            .await
            .get(&user_id)
            .map(|u| u.jobs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn schedule_mock_interview(
        &self,
        user_id: Uuid,
        draft: InterviewDraft,
    ) -> Result<Uuid, GatewayError> {
        let now = self.clock.now();
        let id = Uuid::new_v4();
        let interview = MockInterview {
            id,
            interview_type: draft.interview_type,
            scheduled_at: draft.scheduled_at,
            duration: draft.duration,
            status: InterviewStatus::Scheduled,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        };
        self.users
            .write()
            .await
            .entry(user_id)
            .or_default()
            .interviews
            .insert(id, interview);
        Ok(id)
    }

    async fn get_mock_interviews(&self, user_id: Uuid) -> Result<Vec<MockInterview>, GatewayError> {
        Ok(self
            .users
            .read()
            .await
            .get(&user_id)
            .map(|u| u.interviews.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn update_mock_interview(
        &self,
        user_id: Uuid,
        interview_id: Uuid,
        patch: &MockInterviewPatch,
    ) -> Result<(), GatewayError> {
        let now = self.clock.now();
        let mut users = self.users.write().await;
        let interview = users
            .get_mut(&user_id)
            .and_then(|u| u.interviews.get_mut(&interview_id))
            .ok_or_else(|| GatewayError::NotFound(format!("Mock interview {interview_id}")))?;
        patch.apply_to(interview);
        interview.updated_at = now;
        Ok(())
    }

    async fn delete_mock_interview(
        &self,
        user_id: Uuid,
        interview_id: Uuid,
    ) -> Result<(), GatewayError> {
        if let Some(user) = self.users.write().await.get_mut(&user_id) {
            user.interviews.remove(&interview_id);
        }
        Ok(())
    }
}
