use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::CrushStore;

/// Shared per-process handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CrushStore>,
    pub token_length: usize,
}

impl AppState {
    pub fn new(store: CrushStore, token_length: usize) -> Self {
        Self {
            store: Arc::new(store),
            token_length,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(CrushStore::from_config(&config.store), config.security.token_length)
    }
}
