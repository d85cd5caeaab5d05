use crate::dashboard::Dashboard;
use std::sync::Arc;

/// Read-only after startup, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
        }
    }
}
