use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::gateway::Gateway;
use crate::interviews::reconciler::{
    spawn_reconciliation, Lease, ReconcileHandle, ReconcileSnapshot,
};

/// Reconciliation periods a view may go unread before it is evicted.
pub const IDLE_PERIODS: u32 = 5;

/// Open interview views, each owning its own reconciliation loop.
///
/// A client opens a view when it starts displaying a user's interviews and
/// closes it on teardown; closing drops the handle, which aborts the loop.
/// Every snapshot read renews the view's lease. A view left unread for
/// `IDLE_PERIODS` periods stops reconciling and is dropped on the next access.
pub struct InterviewViews {
    gateway: Arc<dyn Gateway>,
    clock: Arc<dyn Clock>,
    period: Duration,
    open: Mutex<HashMap<Uuid, ReconcileHandle>>,
}

impl InterviewViews {
    pub fn new(gateway: Arc<dyn Gateway>, clock: Arc<dyn Clock>, period: Duration) -> Self {
        Self {
            gateway,
            clock,
            period,
            open: Mutex::new(HashMap::new()),
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn open(&self, user_id: Uuid) -> Uuid {
        let view_id = Uuid::new_v4();
        let handle = spawn_reconciliation(
            self.gateway.clone(),
            self.clock.clone(),
            user_id,
            self.period,
            Lease::new(self.period * IDLE_PERIODS),
        );
        self.lock().insert(view_id, handle);
        info!("Opened interview view {view_id} for user {user_id}");
        view_id
    }

    /// Latest snapshot for a view owned by `user_id`; renews the view's lease.
    /// Outer `None`: no such view. Inner `None`: first pass not finished yet.
    pub fn snapshot(&self, view_id: Uuid, user_id: Uuid) -> Option<Option<ReconcileSnapshot>> {
        self.lock()
            .get(&view_id)
            .filter(|handle| handle.user_id() == user_id)
            .map(|handle| {
                handle.touch();
                handle.latest()
            })
    }

    /// Returns false when the view does not exist for this user.
    pub fn close(&self, view_id: Uuid, user_id: Uuid) -> bool {
        let handle = {
            let mut open = self.lock();
            match open.get(&view_id) {
                Some(handle) if handle.user_id() == user_id => open.remove(&view_id),
                _ => None,
            }
        };
        match handle {
            Some(handle) => {
                handle.cancel();
                info!("Closed interview view {view_id} for user {user_id}");
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Locks the registry, dropping views whose loop is no longer live.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, ReconcileHandle>> {
        // A panic while holding the lock cannot leave the map half-updated.
        let mut open = self.open.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        open.retain(|view_id, handle| {
            let live = handle.is_live();
            if !live {
                info!(
                    "Evicted idle interview view {view_id} for user {}",
                    handle.user_id()
                );
            }
            live
        });
        open
    }
}
