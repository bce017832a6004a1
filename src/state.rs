use std::sync::Arc;

use crate::config::Config;
use crate::llm::GenerationBackend;

/// Shared, immutable per-process state handed to every request handler.
/// All mutable state is per-request; nothing here is behind a lock.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: Arc<dyn GenerationBackend>,
}

impl AppState {
    pub fn new(config: Arc<Config>, backend: Arc<dyn GenerationBackend>) -> Self {
        AppState { config, backend }
    }
}
