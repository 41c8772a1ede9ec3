use std::sync::Arc;

use crate::clock::Clock;
use crate::config::Config;
use crate::gateway::Gateway;
use crate::interviews::InterviewViews;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable persistence backend. Postgres by default; swap via GATEWAY_BACKEND.
    pub gateway: Arc<dyn Gateway>,
    pub clock: Arc<dyn Clock>,
    pub config: Config,
    /// Open interview views and their reconciliation loops.
    pub interview_views: Arc<InterviewViews>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn Gateway>, clock: Arc<dyn Clock>, config: Config) -> Self {
        let interview_views = Arc::new(InterviewViews::new(
            gateway.clone(),
            clock.clone(),
            config.reconcile_interval(),
        ));
        Self {
            gateway,
            clock,
            config,
            interview_views,
        }
    }
}
