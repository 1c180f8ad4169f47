//! Greedy alternatives for a conflicting assignment.
//!
//! Each suggestion changes exactly one dimension of the request: another
//! shuttle, another driver, or another time. Combinations are never
//! verified jointly, so a shuttle alternative may still collide on the
//! driver axis.

use chrono::NaiveTime;
use log::debug;
use serde::{Deserialize, Serialize};

use super::candidate::CandidateAssignment;
use super::conflict_checker::has_conflict;
use super::error::ConflictError;
use super::policy::ConflictPolicy;
use crate::db::repository::FullRepository;
use crate::models::{hhmm, shift_within_day, Driver, DriverId, Shuttle, ShuttleId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Suggestion {
    ShuttleAlternative {
        shuttle_id: ShuttleId,
        model: String,
        plate_number: String,
    },
    DriverAlternative {
        driver_id: DriverId,
        name: String,
    },
    TimeAlternative {
        #[serde(with = "hhmm")]
        time: NaiveTime,
    },
}

impl From<Shuttle> for Suggestion {
    fn from(shuttle: Shuttle) -> Self {
        Suggestion::ShuttleAlternative {
            shuttle_id: shuttle.id,
            model: shuttle.model,
            plate_number: shuttle.plate_number,
        }
    }
}

impl From<Driver> for Suggestion {
    fn from(driver: Driver) -> Self {
        Suggestion::DriverAlternative {
            name: driver.display_name(),
            driver_id: driver.id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionReport {
    pub has_conflict: bool,
    pub suggestions: Vec<Suggestion>,
}

impl SuggestionReport {
    pub fn no_conflict() -> Self {
        Self::default()
    }

    pub fn shuttle_ids(&self) -> Vec<ShuttleId> {
        self.suggestions
            .iter()
            .filter_map(|s| match s {
                Suggestion::ShuttleAlternative { shuttle_id, .. } => Some(*shuttle_id),
                _ => None,
            })
            .collect()
    }

    pub fn driver_ids(&self) -> Vec<DriverId> {
        self.suggestions
            .iter()
            .filter_map(|s| match s {
                Suggestion::DriverAlternative { driver_id, .. } => Some(*driver_id),
                _ => None,
            })
            .collect()
    }

    pub fn times(&self) -> Vec<NaiveTime> {
        self.suggestions
            .iter()
            .filter_map(|s| match s {
                Suggestion::TimeAlternative { time } => Some(*time),
                _ => None,
            })
            .collect()
    }
}

/// Alternatives for `candidate`, or an empty report if it does not conflict.
///
/// Order: free shuttles, free drivers (both ascending id), then the earlier
/// and later time shifts that pass the checker. Shifts that would leave the
/// candidate's date are skipped.
pub async fn suggest_alternatives<R>(
    repo: &R,
    policy: &ConflictPolicy,
    candidate: &CandidateAssignment,
) -> Result<SuggestionReport, ConflictError>
where
    R: FullRepository + ?Sized,
{
    if !has_conflict(repo, policy, candidate).await? {
        return Ok(SuggestionReport::no_conflict());
    }

    let window = candidate.window_query(policy);
    let shuttles = repo
        .shuttles_free_in(&window)
        .await
        .map_err(ConflictError::store("shuttles_free_in"))?;
    let drivers = repo
        .drivers_free_in(&window)
        .await
        .map_err(ConflictError::store("drivers_free_in"))?;

    let mut suggestions: Vec<Suggestion> = Vec::with_capacity(shuttles.len() + drivers.len() + 2);
    suggestions.extend(shuttles.into_iter().map(Suggestion::from));
    suggestions.extend(drivers.into_iter().map(Suggestion::from));

    for offset in [-policy.time_shift_minutes, policy.time_shift_minutes] {
        let Some(time) = shift_within_day(candidate.time, offset) else {
            debug!(
                "skipping time alternative {:+} min from {}: leaves {}",
                offset,
                candidate.time.format("%H:%M"),
                candidate.date
            );
            continue;
        };

        if !has_conflict(repo, policy, &candidate.at_time(time)).await? {
            suggestions.push(Suggestion::TimeAlternative { time });
        }
    }

    debug!(
        "{} suggestion(s) for driver={} shuttle={} on {}",
        suggestions.len(),
        candidate.driver_id,
        candidate.shuttle_id,
        candidate.date
    );

    Ok(SuggestionReport {
        has_conflict: true,
        suggestions,
    })
}

#[cfg(test)]
#[path = "suggestions_tests.rs"]
mod suggestions_tests;
