use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::clock::Clock;
use crate::gateway::{decode_resume, merge_document, require_object, Gateway, GatewayError};
use crate::models::interview::{
    InterviewDraft, InterviewStatus, MockInterview, MockInterviewPatch, MockInterviewRow,
};
use crate::models::job::{
    JobApplication, JobApplicationDraft, JobApplicationPatch, JobApplicationRow,
};
use crate::models::resume::Resume;

/// PostgreSQL-backed gateway. Every statement is scoped by `user_id`.
#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl PgGateway {
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl Gateway for PgGateway {
    async fn get_resume(&self, user_id: Uuid) -> Result<Option<Resume>, GatewayError> {
        let document: Option<Value> =
            sqlx::query_scalar("SELECT data FROM resumes WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        document.map(decode_resume).transpose()
    }

    async fn save_resume(&self, user_id: Uuid, document: &Value) -> Result<(), GatewayError> {
        require_object(document)?;
        let now = self.clock.now();

        // Row lock so two concurrent merges do not drop each other's fields.
        let mut tx = self.pool.begin().await?;
        let stored: Option<Value> =
            sqlx::query_scalar("SELECT data FROM resumes WHERE user_id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;

        let mut merged = stored.unwrap_or_else(|| Value::Object(Default::default()));
        merge_document(&mut merged, document);

        sqlx::query(
            r#"
            INSERT INTO resumes (user_id, data, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT (user_id) DO UPDATE
                SET data = EXCLUDED.data, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user_id)
        .bind(&merged)
        .bind(now)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        debug!("Merged resume document for user {user_id}");
        Ok(())
    }

    async fn add_job_application(
        &self,
        user_id: Uuid,
        draft: JobApplicationDraft,
    ) -> Result<Uuid, GatewayError> {
        let id = Uuid::new_v4();
        let now = self.clock.now();
        sqlx::query(
            r#"
            INSERT INTO job_applications
                (id, user_id, company, position, location, status,
                 applied_date, link, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&draft.company)
        .bind(&draft.position)
        .bind(&draft.location)
        .bind(draft.status.as_str())
        .bind(draft.applied_date)
        .bind(&draft.link)
        .bind(&draft.notes)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!("Inserted job application {id} for user {user_id}");
        Ok(id)
    }

    async fn update_job_application(
        &self,
        user_id: Uuid,
        job_id: Uuid,
        patch: &JobApplicationPatch,
    ) -> Result<(), GatewayError> {
        let result = sqlx::query(
            r#"
            UPDATE job_applications SET
                company      = COALESCE($3, company),
                position     = COALESCE($4, position),
                location     = COALESCE($5, location),
                status       = COALESCE($6, status),
                applied_date = COALESCE($7, applied_date),
                link         = COALESCE($8, link),
                notes        = COALESCE($9, notes),
                updated_at   = $10
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(job_id)
        .bind(user_id)
        .bind(&patch.company)
        .bind(&patch.position)
        .bind(&patch.location)
        .bind(patch.status.as_ref().map(|s| s.as_str()))
        .bind(patch.applied_date)
        .bind(&patch.link)
        .bind(&patch.notes)
        .bind(self.clock.now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(GatewayError::NotFound(format!("Job application {job_id}")));
        }
        Ok(())
    }

    async fn delete_job_application(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<(), GatewayError> {
        sqlx::query("DELETE FROM job_applications WHERE id = $1 AND user_id = $2")
            .bind(job_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_job_applications(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<JobApplication>, GatewayError> {
        let rows = sqlx::query_as::<_, JobApplicationRow>(
            "SELECT * FROM job_applications WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(JobApplication::from).collect())
    }

    async fn schedule_mock_interview(
        &self,
        user_id: Uuid,
        draft: InterviewDraft,
    ) -> Result<Uuid, GatewayError> {
        let id = Uuid::new_v4();
        let now = self.clock.now();
        sqlx::query(
            r#"
            INSERT INTO mock_interviews
                (id, user_id, interview_type, scheduled_at, duration_minutes,
                 status, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(draft.interview_type.as_str())
        .bind(draft.scheduled_at)
        .bind(draft.duration.minutes() as i32)
        .bind(InterviewStatus::Scheduled.as_str())
        .bind(&draft.notes)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!("Inserted mock interview {id} for user {user_id}");
        Ok(id)
    }

    async fn get_mock_interviews(&self, user_id: Uuid) -> Result<Vec<MockInterview>, GatewayError> {
        let rows = sqlx::query_as::<_, MockInterviewRow>(
            "SELECT * FROM mock_interviews WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                MockInterview::try_from(row).map_err(|e| {
                    GatewayError::InvalidDocument(format!("mock interview {id}: {e}"))
                })
            })
            .collect()
    }

    async fn update_mock_interview(
        &self,
        user_id: Uuid,
        interview_id: Uuid,
        patch: &MockInterviewPatch,
    ) -> Result<(), GatewayError> {
        let result = sqlx::query(
            r#"
            UPDATE mock_interviews SET
                status     = COALESCE($3, status),
                notes      = COALESCE($4, notes),
                updated_at = $5
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(interview_id)
        .bind(user_id)
        .bind(patch.status.as_ref().map(|s| s.as_str()))
        .bind(&patch.notes)
        .bind(self.clock.now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(GatewayError::NotFound(format!(
                "Mock interview {interview_id}"
            )));
        }
        Ok(())
    }

    async fn delete_mock_interview(
        &self,
        user_id: Uuid,
        interview_id: Uuid,
    ) -> Result<(), GatewayError> {
        let result = sqlx::query("DELETE FROM mock_interviews WHERE id = $1 AND user_id = $2")
            .bind(interview_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            debug!("Mock interview {interview_id} already gone for user {user_id}");
        }
        Ok(())
    }
}
