use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{BadgeTone, StatusBadge};

/// Job application status.
///
/// Any string is accepted on the way in; values outside the five known states
/// are kept verbatim as `Unrecognized` so they round-trip through storage and
/// render as an "unrecognized" badge instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Applied,
    Interviewing,
    Offered,
    Rejected,
    Accepted,
    Unrecognized(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Applied => "applied",
            JobStatus::Interviewing => "interviewing",
            JobStatus::Offered => "offered",
            JobStatus::Rejected => "rejected",
            JobStatus::Accepted => "accepted",
            JobStatus::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, JobStatus::Unrecognized(_))
    }

    pub fn badge(&self) -> StatusBadge {
        let (label, tone) = match self {
            JobStatus::Applied => ("Applied", BadgeTone::Blue),
            JobStatus::Interviewing => ("Interviewing", BadgeTone::Yellow),
            JobStatus::Offered => ("Offered", BadgeTone::Green),
            JobStatus::Rejected => ("Rejected", BadgeTone::Red),
            JobStatus::Accepted => ("Accepted", BadgeTone::Purple),
            JobStatus::Unrecognized(_) => ("Unrecognized", BadgeTone::Gray),
        };
        StatusBadge {
            label: label.to_string(),
            tone,
        }
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        JobStatus::Applied
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "applied" => JobStatus::Applied,
            "interviewing" => JobStatus::Interviewing,
            "offered" => JobStatus::Offered,
            "rejected" => JobStatus::Rejected,
            "accepted" => JobStatus::Accepted,
            _ => JobStatus::Unrecognized(raw),
        }
    }
}

impl From<&str> for JobStatus {
    fn from(raw: &str) -> Self {
        JobStatus::from(raw.to_string())
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked job application as stored by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: Uuid,
    pub company: String,
    pub position: String,
    pub location: Option<String>,
    pub status: JobStatus,
    pub applied_date: NaiveDate,
    pub link: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client input for a new application. Only company and position are required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewJobApplication {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub applied_date: Option<NaiveDate>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Fully-resolved fields handed to the gateway; id and timestamps are assigned there.
#[derive(Debug, Clone, PartialEq)]
pub struct JobApplicationDraft {
    pub company: String,
    pub position: String,
    pub location: Option<String>,
    pub status: JobStatus,
    pub applied_date: NaiveDate,
    pub link: Option<String>,
    pub notes: Option<String>,
}

/// Partial update. `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobApplicationPatch {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub applied_date: Option<NaiveDate>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl JobApplicationPatch {
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, job: &mut JobApplication) {
        if let Some(company) = &self.company {
            job.company = company.clone();
        }
        if let Some(position) = &self.position {
            job.position = position.clone();
        }
        if let Some(location) = &self.location {
            job.location = Some(location.clone());
        }
        if let Some(status) = &self.status {
            job.status = status.clone();
        }
        if let Some(applied_date) = self.applied_date {
            job.applied_date = applied_date;
        }
        if let Some(link) = &self.link {
            job.link = Some(link.clone());
        }
        if let Some(notes) = &self.notes {
            job.notes = Some(notes.clone());
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct JobApplicationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: String,
    pub position: String,
    pub location: Option<String>,
    pub status: String,
    pub applied_date: NaiveDate,
    pub link: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<JobApplicationRow> for JobApplication {
    fn from(row: JobApplicationRow) -> Self {
        JobApplication {
            id: row.id,
            company: row.company,
            position: row.position,
            location: row.location,
            status: JobStatus::from(row.status),
            applied_date: row.applied_date,
            link: row.link,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
