//! Periodic reconciliation task owned by an open interview view.
//!
//! Runs one pass immediately, then one per period until the handle is
//! cancelled or dropped, or until its lease goes stale because nobody has
//! read the view for a while. Passes run back to back on a single task, so they
//! never overlap for the same handle; passes from different views of the same
//! user may, which is safe because deleting a missing interview is a no-op.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::gateway::Gateway;
use crate::interviews::expiry::reconcile;
use crate::models::interview::MockInterview;

/// Result of the most recent successful pass.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileSnapshot {
    pub active: Vec<MockInterview>,
    pub reconciled_at: DateTime<Utc>,
    /// Completed passes since the view was opened, failed ones excluded.
    pub pass: u64,
}

/// Keep-alive for a reconciliation loop: stale once untouched for longer than
/// `idle_timeout`. Measured on the tokio clock.
#[derive(Debug, Clone)]
pub struct Lease {
    last_seen: Arc<Mutex<Instant>>,
    idle_timeout: Duration,
}

impl Lease {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            last_seen: Arc::new(Mutex::new(Instant::now())),
            idle_timeout,
        }
    }

    pub fn touch(&self) {
        *self.last_seen() = Instant::now();
    }

    pub fn is_stale(&self) -> bool {
        self.last_seen().elapsed() > self.idle_timeout
    }

    fn last_seen(&self) -> std::sync::MutexGuard<'_, Instant> {
        self.last_seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Owner of a running reconciliation loop. Dropping it aborts the loop.
pub struct ReconcileHandle {
    user_id: Uuid,
    latest: watch::Receiver<Option<ReconcileSnapshot>>,
    lease: Lease,
    task: JoinHandle<()>,
}

impl ReconcileHandle {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// `None` until the first pass has succeeded.
    pub fn latest(&self) -> Option<ReconcileSnapshot> {
        self.latest.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ReconcileSnapshot>> {
        self.latest.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Live means running with a lease that has not gone stale.
    pub fn is_live(&self) -> bool {
        self.is_running() && !self.lease.is_stale()
    }

    pub fn touch(&self) {
        self.lease.touch();
    }

    /// Stops the loop. A pass that is mid-flight is dropped and its result discarded.
    pub fn cancel(self) {
        // Drop does the work.
    }
}

impl Drop for ReconcileHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn spawn_reconciliation(
    gateway: Arc<dyn Gateway>,
    clock: Arc<dyn Clock>,
    user_id: Uuid,
    period: Duration,
    lease: Lease,
) -> ReconcileHandle {
    let (tx, rx) = watch::channel(None);
    let task_lease = lease.clone();
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut pass = 0u64;
        loop {
            // First tick completes immediately.
            ticker.tick().await;
            if task_lease.is_stale() {
                info!("Reconciliation for user {user_id} stopped: view idle");
                break;
            }
            let now = clock.now();
            match reconcile(gateway.as_ref(), user_id, now).await {
                Ok(outcome) => {
                    pass += 1;
                    debug!(
                        "Reconciliation pass {pass} for user {user_id}: {} active, {} purged, {} failed",
                        outcome.active.len(),
                        outcome.purged.len(),
                        outcome.failed.len()
                    );
                    let snapshot = ReconcileSnapshot {
                        active: outcome.active,
                        reconciled_at: now,
                        pass,
                    };
                    if tx.send(Some(snapshot)).is_err() {
                        // Every receiver is gone; nobody is watching any more.
                        break;
                    }
                }
                Err(e) => {
                    // Keep the last good snapshot.
                    warn!("Reconciliation pass for user {user_id} failed: {e}");
                }
            }
        }
    });

    ReconcileHandle {
        user_id,
        latest: rx,
        lease,
        task,
    }
}
