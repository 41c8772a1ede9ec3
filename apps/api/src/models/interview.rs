use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{BadgeTone, StatusBadge};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterviewType {
    Technical,
    Behavioral,
    SystemDesign,
    Hr,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Technical => "technical",
            InterviewType::Behavioral => "behavioral",
            InterviewType::SystemDesign => "system-design",
            InterviewType::Hr => "hr",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            InterviewType::Technical => "Technical Interview",
            InterviewType::Behavioral => "Behavioral Interview",
            InterviewType::SystemDesign => "System Design Interview",
            InterviewType::Hr => "HR Interview",
        }
    }
}

impl FromStr for InterviewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "technical" => Ok(InterviewType::Technical),
            "behavioral" => Ok(InterviewType::Behavioral),
            "system-design" => Ok(InterviewType::SystemDesign),
            "hr" => Ok(InterviewType::Hr),
            other => Err(format!("unknown interview type '{other}'")),
        }
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared session length. Recorded for display only; the active window is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum InterviewDuration {
    Minutes30,
    Minutes45,
    Minutes60,
    Minutes90,
}

impl InterviewDuration {
    pub fn minutes(&self) -> u32 {
        match self {
            InterviewDuration::Minutes30 => 30,
            InterviewDuration::Minutes45 => 45,
            InterviewDuration::Minutes60 => 60,
            InterviewDuration::Minutes90 => 90,
        }
    }
}

impl Default for InterviewDuration {
    fn default() -> Self {
        InterviewDuration::Minutes60
    }
}

impl TryFrom<u32> for InterviewDuration {
    type Error = String;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        match minutes {
            30 => Ok(InterviewDuration::Minutes30),
            45 => Ok(InterviewDuration::Minutes45),
            60 => Ok(InterviewDuration::Minutes60),
            90 => Ok(InterviewDuration::Minutes90),
            other => Err(format!(
                "unsupported interview duration {other} (expected 30, 45, 60 or 90 minutes)"
            )),
        }
    }
}

impl From<InterviewDuration> for u32 {
    fn from(duration: InterviewDuration) -> Self {
        duration.minutes()
    }
}

/// Interview status. Transitions are user-driven and unconstrained.
/// Unknown strings are preserved as `Unrecognized`, same policy as job statuses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InterviewStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Unrecognized(String),
}

impl InterviewStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InterviewStatus::Scheduled => "scheduled",
            InterviewStatus::InProgress => "in-progress",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Cancelled => "cancelled",
            InterviewStatus::Unrecognized(raw) => raw,
        }
    }

    pub fn badge(&self) -> StatusBadge {
        let (label, tone) = match self {
            InterviewStatus::Scheduled => ("Scheduled", BadgeTone::Blue),
            InterviewStatus::InProgress => ("In Progress", BadgeTone::Yellow),
            InterviewStatus::Completed => ("Completed", BadgeTone::Green),
            InterviewStatus::Cancelled => ("Cancelled", BadgeTone::Red),
            InterviewStatus::Unrecognized(_) => ("Unrecognized", BadgeTone::Gray),
        };
        StatusBadge {
            label: label.to_string(),
            tone,
        }
    }
}

impl From<String> for InterviewStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "scheduled" => InterviewStatus::Scheduled,
            "in-progress" => InterviewStatus::InProgress,
            "completed" => InterviewStatus::Completed,
            "cancelled" => InterviewStatus::Cancelled,
            _ => InterviewStatus::Unrecognized(raw),
        }
    }
}

impl From<&str> for InterviewStatus {
    fn from(raw: &str) -> Self {
        InterviewStatus::from(raw.to_string())
    }
}

impl From<InterviewStatus> for String {
    fn from(status: InterviewStatus) -> Self {
        match status {
            InterviewStatus::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockInterview {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub scheduled_at: DateTime<Utc>,
    pub duration: InterviewDuration,
    pub status: InterviewStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated scheduling request handed to the gateway, which assigns the id,
/// timestamps and the initial `scheduled` status.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewDraft {
    pub interview_type: InterviewType,
    pub scheduled_at: DateTime<Utc>,
    pub duration: InterviewDuration,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MockInterviewPatch {
    #[serde(default)]
    pub status: Option<InterviewStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl MockInterviewPatch {
    pub fn status(status: InterviewStatus) -> Self {
        Self {
            status: Some(status),
            notes: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.notes.is_none()
    }

    pub fn apply_to(&self, interview: &mut MockInterview) {
        if let Some(status) = &self.status {
            interview.status = status.clone();
        }
        if let Some(notes) = &self.notes {
            interview.notes = Some(notes.clone());
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct MockInterviewRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub interview_type: String,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<MockInterviewRow> for MockInterview {
    type Error = String;

    fn try_from(row: MockInterviewRow) -> Result<Self, Self::Error> {
        let minutes = u32::try_from(row.duration_minutes)
            .map_err(|_| format!("negative duration {}", row.duration_minutes))?;
        Ok(MockInterview {
            id: row.id,
            interview_type: row.interview_type.parse()?,
            scheduled_at: row.scheduled_at,
            duration: InterviewDuration::try_from(minutes)?,
            status: InterviewStatus::from(row.status),
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
