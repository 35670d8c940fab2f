use std::sync::Arc;

use fwhub_core::trigger::JobTrigger;
use fwhub_db::store::DocumentStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend chosen once at startup.
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<ServerConfig>,
    /// Job trigger gateway.
    pub job_trigger: Arc<dyn JobTrigger>,
}

impl AppState {
    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}
