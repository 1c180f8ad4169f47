//! Yes/no overlap predicate for a candidate assignment.

use log::debug;

use super::candidate::CandidateAssignment;
use super::error::ConflictError;
use super::policy::ConflictPolicy;
use crate::db::repository::ScheduleRepository;
use crate::models::ResourceFilter;

/// Whether any live schedule on the candidate's date, within the proximity
/// window, uses the candidate's driver OR shuttle.
///
/// The schedule named by `candidate.exclude_id` is ignored, so an edited
/// schedule never collides with its own stored version. A window touching
/// midnight is clamped to the candidate's date: schedules on the adjacent
/// date are never consulted.
pub async fn has_conflict<R>(
    repo: &R,
    policy: &ConflictPolicy,
    candidate: &CandidateAssignment,
) -> Result<bool, ConflictError>
where
    R: ScheduleRepository + ?Sized,
{
    let query = candidate
        .window_query(policy)
        .with_resource(ResourceFilter::DriverOrShuttle {
            driver_id: candidate.driver_id,
            shuttle_id: candidate.shuttle_id,
        });

    let found = repo
        .exists_in_window(&query)
        .await
        .map_err(ConflictError::store("has_conflict"))?;

    debug!(
        "conflict check driver={} shuttle={} on {} at {}: {}",
        candidate.driver_id,
        candidate.shuttle_id,
        candidate.date,
        candidate.time.format("%H:%M"),
        found
    );
    Ok(found)
}

#[cfg(test)]
#[path = "conflict_checker_tests.rs"]
mod conflict_checker_tests;
