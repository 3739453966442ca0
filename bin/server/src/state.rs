//! Server application state

use std::sync::Arc;
use storage::Storage;

/// Shared by every worker; holds nothing between requests besides the storage handle
pub struct AppState {
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}
