//! Expiry rules for mock interviews.
//!
//! An interview stays listed for a fixed active window after its scheduled
//! start. Once `now` is past the window end the next reconciliation pass
//! deletes it, whatever its status. The window ignores the declared duration:
//! a 90-minute session is still purged 60 minutes after it starts.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Serializer};
use tracing::{error, info};
use uuid::Uuid;

use crate::gateway::{Gateway, GatewayError};
use crate::models::interview::MockInterview;

pub const ACTIVE_WINDOW_MINUTES: i64 = 60;

pub fn active_window() -> Duration {
    Duration::minutes(ACTIVE_WINDOW_MINUTES)
}

pub fn window_end(scheduled_at: DateTime<Utc>) -> DateTime<Utc> {
    scheduled_at + active_window()
}

/// Strictly past the window end; the end instant itself is still active.
pub fn is_expired(interview: &MockInterview, now: DateTime<Utc>) -> bool {
    now > window_end(interview.scheduled_at)
}

/// Splits into `(active, expired)`, preserving input order within each side.
pub fn partition_expired(
    interviews: Vec<MockInterview>,
    now: DateTime<Utc>,
) -> (Vec<MockInterview>, Vec<MockInterview>) {
    interviews
        .into_iter()
        .partition(|interview| !is_expired(interview, now))
}

#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    pub active: Vec<MockInterview>,
    pub purged: Vec<Uuid>,
    /// Expired interviews whose delete failed; they will be retried next pass.
    pub failed: Vec<Uuid>,
}

/// One reconciliation pass for a user.
///
/// A failure to fetch aborts the pass. Individual delete failures are logged
/// and skipped so one bad record cannot block the rest. Failed records are
/// still left out of `active`.
pub async fn reconcile(
    gateway: &dyn Gateway,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<ReconcileOutcome, GatewayError> {
    let interviews = gateway.get_mock_interviews(user_id).await?;
    let (active, expired) = partition_expired(interviews, now);

    let mut outcome = ReconcileOutcome {
        active,
        ..Default::default()
    };
    for interview in expired {
        match gateway.delete_mock_interview(user_id, interview.id).await {
            Ok(()) => {
                info!(
                    "Purged expired interview {} scheduled for {} (status '{}')",
                    interview.id, interview.scheduled_at, interview.status
                );
                outcome.purged.push(interview.id);
            }
            Err(e) => {
                error!("Failed to delete expired interview {}: {e}", interview.id);
                outcome.failed.push(interview.id);
            }
        }
    }
    Ok(outcome)
}

/// Countdown shown next to an interview. Pure function of the window and `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRemaining {
    /// Start is more than an hour away.
    MoreThanAnHour,
    /// Start is within the next hour.
    StartsIn { minutes: i64 },
    /// Inside the active window; whole minutes until the window closes.
    MinutesLeft(i64),
    Expired,
}

impl TimeRemaining {
    pub fn at(scheduled_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let end = window_end(scheduled_at);
        if now > end {
            return TimeRemaining::Expired;
        }
        if now >= scheduled_at {
            return TimeRemaining::MinutesLeft((end - now).num_minutes());
        }
        let until_start = scheduled_at - now;
        if until_start <= active_window() {
            // Round up so the last partial minute still reads "1 min".
            let minutes = (until_start.num_seconds() + 59) / 60;
            TimeRemaining::StartsIn { minutes }
        } else {
            TimeRemaining::MoreThanAnHour
        }
    }
}

pub fn time_remaining(interview: &MockInterview, now: DateTime<Utc>) -> TimeRemaining {
    TimeRemaining::at(interview.scheduled_at, now)
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeRemaining::MoreThanAnHour => f.write_str("More than 1 hour"),
            TimeRemaining::StartsIn { minutes } => write!(f, "Starts in {minutes} min"),
            TimeRemaining::MinutesLeft(minutes) => write!(f, "{minutes} min remaining"),
            TimeRemaining::Expired => f.write_str("Expired"),
        }
    }
}

impl Serialize for TimeRemaining {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
