pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interviews::handlers as interviews;
use crate::jobs::handlers as jobs;
use crate::resume::handlers as resume;
use crate::state::AppState;

/// Identity of the signed-in user, supplied by the external auth layer.
#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job tracker
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:id",
            patch(jobs::handle_update_job).delete(jobs::handle_delete_job),
        )
        .route(
            "/api/v1/jobs/:id/status",
            patch(jobs::handle_update_job_status),
        )
        // Mock interviews
        .route(
            "/api/v1/interviews",
            get(interviews::handle_list_interviews).post(interviews::handle_schedule_interview),
        )
        .route(
            "/api/v1/interviews/views",
            post(interviews::handle_open_view),
        )
        .route(
            "/api/v1/interviews/views/:view_id",
            get(interviews::handle_view_snapshot).delete(interviews::handle_close_view),
        )
        .route(
            "/api/v1/interviews/:id",
            patch(interviews::handle_update_interview).delete(interviews::handle_delete_interview),
        )
        // Resume builder
        .route(
            "/api/v1/resume",
            get(resume::handle_get_resume).put(resume::handle_save_resume),
        )
        .route("/api/v1/resume/edits", post(resume::handle_apply_edits))
        .route(
            "/api/v1/resume/markdown",
            get(resume::handle_export_markdown),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration as StdDuration;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::clock::ManualClock;
    use crate::config::{Config, GatewayBackend};
    use crate::gateway::MemoryGateway;

    struct TestApp {
        router: Router,
        clock: Arc<ManualClock>,
        user: Uuid,
    }

    fn app() -> TestApp {
        let clock = Arc::new(ManualClock::at(
            Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap(),
        ));
        let gateway = Arc::new(MemoryGateway::new(clock.clone()));
        let config = Config {
            gateway_backend: GatewayBackend::Memory,
            database_url: None,
            database_max_connections: 1,
            port: 0,
            rust_log: "debug".to_string(),
            reconcile_interval_secs: 60,
        };
        let state = AppState::new(gateway, clock.clone(), config);
        TestApp {
            router: build_router(state),
            clock,
            user: Uuid::new_v4(),
        }
    }

    impl TestApp {
        async fn call(&self, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
            let sep = if path.contains('?') { '&' } else { '?' };
            let uri = format!("{path}{sep}user_id={}", self.user);
            let builder = Request::builder().method(method).uri(uri);
            let request = match body {
                Some(body) => builder
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes)
                    .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
            };
            (status, value)
        }
    }

    #[tokio::test]
    async fn test_health() {
        let app = app();
        let (status, body) = app.call(Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["open_interview_views"], 0);
    }

    #[tokio::test]
    async fn test_job_tracker_flow() {
        let app = app();
        let (status, created) = app
            .call(
                Method::POST,
                "/api/v1/jobs",
                Some(json!({ "company": "Acme", "position": "Backend Engineer" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();

        let (_, jobs) = app.call(Method::GET, "/api/v1/jobs", None).await;
        assert_eq!(jobs[0]["status"], "applied");
        assert_eq!(jobs[0]["applied_date"], "2024-01-10");
        assert_eq!(jobs[0]["badge"]["tone"], "blue");
        let first_update = jobs[0]["updated_at"].as_str().unwrap().to_string();

        app.clock.advance(Duration::minutes(1));
        let (status, _) = app
            .call(
                Method::PATCH,
                &format!("/api/v1/jobs/{id}/status"),
                Some(json!({ "status": "rejected" })),
            )
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, jobs) = app.call(Method::GET, "/api/v1/jobs?order=company", None).await;
        assert_eq!(jobs[0]["status"], "rejected");
        assert_eq!(jobs[0]["badge"]["label"], "Rejected");
        let later: chrono::DateTime<Utc> = jobs[0]["updated_at"].as_str().unwrap().parse().unwrap();
        let earlier: chrono::DateTime<Utc> = first_update.parse().unwrap();
        assert!(later > earlier);
    }

    #[tokio::test]
    async fn test_unknown_job_status_renders_unrecognized() {
        let app = app();
        let (_, created) = app
            .call(
                Method::POST,
                "/api/v1/jobs",
                Some(json!({ "company": "Acme", "position": "SRE", "status": "ghosted" })),
            )
            .await;
        assert!(created["id"].is_string());

        let (_, jobs) = app.call(Method::GET, "/api/v1/jobs", None).await;
        assert_eq!(jobs[0]["status"], "ghosted");
        assert_eq!(jobs[0]["badge"]["label"], "Unrecognized");
        assert_eq!(jobs[0]["badge"]["tone"], "gray");
    }

    #[tokio::test]
    async fn test_job_validation_error_shape() {
        let app = app();
        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/jobs",
                Some(json!({ "company": " ", "position": "SRE" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_updating_missing_job_is_404() {
        let app = app();
        let (status, body) = app
            .call(
                Method::PATCH,
                &format!("/api/v1/jobs/{}/status", Uuid::new_v4()),
                Some(json!({ "status": "offered" })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_past_interview_rejected() {
        let app = app();
        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/interviews",
                Some(json!({ "type": "technical", "date": "2024-01-10", "time": "11:59:00" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            "Please select a future date and time for the interview"
        );

        let (_, list) = app.call(Method::GET, "/api/v1/interviews", None).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_interview_lifecycle_and_expiry() {
        let app = app();
        let (status, created) = app
            .call(
                Method::POST,
                "/api/v1/interviews",
                Some(json!({
                    "type": "system-design",
                    "date": "2024-01-10",
                    "time": "14:00:00",
                    "duration": 90,
                    "notes": "Design a URL shortener"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();

        let (_, list) = app.call(Method::GET, "/api/v1/interviews", None).await;
        assert_eq!(list[0]["type"], "system-design");
        assert_eq!(list[0]["duration"], 90);
        assert_eq!(list[0]["status"], "scheduled");
        assert_eq!(list[0]["title"], "System Design Interview");
        assert_eq!(list[0]["time_remaining"], "More than 1 hour");

        app.clock
            .set(Utc.with_ymd_and_hms(2024, 1, 10, 14, 30, 0).unwrap());
        let (status, _) = app
            .call(
                Method::PATCH,
                &format!("/api/v1/interviews/{id}"),
                Some(json!({ "status": "in-progress" })),
            )
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, list) = app.call(Method::GET, "/api/v1/interviews", None).await;
        assert_eq!(list[0]["status"], "in-progress");
        assert_eq!(list[0]["time_remaining"], "30 min remaining");

        app.clock
            .set(Utc.with_ymd_and_hms(2024, 1, 10, 15, 1, 0).unwrap());
        let (_, list) = app.call(Method::GET, "/api/v1/interviews", None).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_unknown_interview_duration_rejected() {
        let app = app();
        let (status, _) = app
            .call(
                Method::POST,
                "/api/v1/interviews",
                Some(json!({ "type": "hr", "date": "2024-02-01", "time": "10:00:00", "duration": 50 })),
            )
            .await;
        assert!(status.is_client_error());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interview_view_session() {
        let app = app();
        app.call(
            Method::POST,
            "/api/v1/interviews",
            Some(json!({ "type": "hr", "date": "2024-01-10", "time": "12:30:00" })),
        )
        .await;

        let (status, opened) = app.call(Method::POST, "/api/v1/interviews/views", None).await;
        assert_eq!(status, StatusCode::CREATED);
        let view = opened["view_id"].as_str().unwrap().to_string();
        let path = format!("/api/v1/interviews/views/{view}");

        tokio::time::sleep(StdDuration::from_millis(10)).await;
        let (status, snapshot) = app.call(Method::GET, &path, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(snapshot["state"], "ready");
        assert_eq!(snapshot["pass"], 1);
        assert_eq!(snapshot["interviews"][0]["time_remaining"], "Starts in 30 min");

        // Window closes at 13:30; the next timer tick purges it.
        app.clock
            .set(Utc.with_ymd_and_hms(2024, 1, 10, 13, 31, 0).unwrap());
        tokio::time::sleep(StdDuration::from_secs(61)).await;
        let (_, snapshot) = app.call(Method::GET, &path, None).await;
        assert_eq!(snapshot["pass"], 2);
        assert_eq!(snapshot["interviews"], json!([]));

        let (status, _) = app.call(Method::DELETE, &path, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.call(Method::GET, &path, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_resume_merge_and_edits() {
        let app = app();
        let (_, empty) = app.call(Method::GET, "/api/v1/resume", None).await;
        assert_eq!(empty["personal_info"]["name"], "");
        assert_eq!(empty["education"], json!([]));

        app.call(
            Method::PUT,
            "/api/v1/resume",
            Some(json!({ "personal_info": { "name": "A", "email": "a@example.com" } })),
        )
        .await;
        app.call(
            Method::PUT,
            "/api/v1/resume",
            Some(json!({ "personal_info": { "name": "A" } })),
        )
        .await;
        let (status, _) = app
            .call(
                Method::PUT,
                "/api/v1/resume",
                Some(json!({
                    "personal_info": { "name": "A" },
                    "education": [{ "school": "MIT", "degree": "BSc" }]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, resume) = app.call(Method::GET, "/api/v1/resume", None).await;
        assert_eq!(resume["personal_info"]["email"], "a@example.com");
        assert_eq!(resume["education"][0]["school"], "MIT");

        let (status, edited) = app
            .call(
                Method::POST,
                "/api/v1/resume/edits",
                Some(json!([
                    { "op": "add_skill", "skill": "Rust" },
                    { "op": "update_education", "index": 0, "entry": { "school": "MIT", "degree": "MSc" } }
                ])),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(edited["skills"], json!(["Rust"]));
        assert_eq!(edited["education"][0]["degree"], "MSc");

        let (status, _) = app
            .call(
                Method::POST,
                "/api/v1/resume/edits",
                Some(json!([{ "op": "remove_project", "index": 3 }])),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, md) = app.call(Method::GET, "/api/v1/resume/markdown", None).await;
        assert_eq!(status, StatusCode::OK);
        let md = md.as_str().unwrap();
        assert!(md.starts_with("# A\n"));
        assert!(md.contains("## Skills\n\nRust\n"));
    }

    #[tokio::test]
    async fn test_resume_rejects_non_object_and_bad_shapes() {
        let app = app();
        let (status, _) = app
            .call(Method::PUT, "/api/v1/resume", Some(json!(["not", "a", "resume"])))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .call(Method::PUT, "/api/v1/resume", Some(json!({ "skills": 5 })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
