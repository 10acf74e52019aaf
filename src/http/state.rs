//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::services::availability_cache::AvailabilityCache;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for store operations
    pub repository: Arc<dyn FullRepository>,
    /// Per-(branch, academic year) cache of availability indexes,
    /// invalidated on every write
    pub availability_cache: AvailabilityCache,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            availability_cache: AvailabilityCache::new(),
        }
    }
}
