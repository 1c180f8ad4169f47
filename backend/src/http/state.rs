//! Application state for the HTTP server.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::db::repository::FullRepository;
use crate::services::ConflictPolicy;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn FullRepository>,
    /// Window and shift tunables for the conflict engine
    pub policy: ConflictPolicy,
    /// Held across check-and-persist in the write handlers, so two requests
    /// served by this process cannot both pass the check for the same slot.
    pub assignment_gate: Arc<Mutex<()>>,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            policy: ConflictPolicy::default(),
            assignment_gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }
}
