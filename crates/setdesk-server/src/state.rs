use std::sync::Arc;

use setdesk_core::{Executor, RecordStore};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<Executor>,
    /// Bearer token for `/api` routes. `None` disables auth.
    pub api_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(executor: Arc<Executor>, api_token: Option<String>) -> Self {
        Self {
            executor,
            api_token: api_token.map(Arc::from),
        }
    }

    pub fn store(&self) -> Arc<dyn RecordStore> {
        self.executor.store().clone()
    }
}
