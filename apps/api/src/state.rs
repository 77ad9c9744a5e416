use std::sync::Arc;

use crate::config::Config;
use crate::guidance::policy::AdapterPolicy;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Model client, fallback catalogs and the career index. Read-only after startup.
    pub policy: Arc<AdapterPolicy>,
    pub config: Config,
}
