//! Shuttle and driver directory entries.

use serde::{Deserialize, Serialize};

use super::schedule::{DriverId, ShuttleId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shuttle {
    pub id: ShuttleId,
    pub model: String,
    pub plate_number: String,
}

/// User account linked to a driver, carrying the human-readable name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}

impl Driver {
    /// Name shown to users; `Driver #{id}` when no profile is linked.
    pub fn display_name(&self) -> String {
        match &self.profile {
            Some(profile) => format!("{} {}", profile.first_name, profile.last_name)
                .trim()
                .to_string(),
            None => format!("Driver #{}", self.id),
        }
    }
}
