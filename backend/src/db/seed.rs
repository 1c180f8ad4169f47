//! JSON seed documents for the in-memory repository.
//!
//! ```json
//! {
//!   "shuttles": [{ "id": 5, "model": "Sprinter", "plate_number": "ABC-123" }],
//!   "drivers": [{ "id": 1, "profile": { "first_name": "Ana", "last_name": "Reyes" } }],
//!   "schedules": [{ "driver_id": 1, "shuttle_id": 5, "date": "2025-01-10", "time": "09:00" }]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::repository::{ErrorContext, RepositoryError};
use crate::models::{Driver, NewSchedule, Shuttle};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetSeed {
    #[serde(default)]
    pub shuttles: Vec<Shuttle>,
    #[serde(default)]
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub schedules: Vec<NewSchedule>,
}

impl FleetSeed {
    /// Read and parse a seed file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RepositoryError::ConfigurationError {
                message: format!("Failed to read seed file: {}", e),
                context: ErrorContext::new("load_seed").with_details(path.display().to_string()),
            }
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, RepositoryError> {
        serde_json::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse seed file: {}", e))
        })
    }
}
