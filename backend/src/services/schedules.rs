//! Schedule writes guarded by the conflict engine.
//!
//! These do not close the check-then-act race on their own; callers that
//! need exclusivity serialize them (the HTTP layer holds an assignment gate).

use log::{debug, info};

use super::candidate::CandidateAssignment;
use super::conflict_reporter::{describe_conflicts, ConflictDetail};
use super::error::ConflictError;
use super::policy::ConflictPolicy;
use super::suggestions::{suggest_alternatives, Suggestion};
use crate::db::repository::{FullRepository, RepositoryError};
use crate::models::{Schedule, ScheduleId};

#[derive(Debug, thiserror::Error)]
pub enum ScheduleWriteError {
    /// The assignment collides with live schedules.
    #[error("assignment conflicts with {} existing schedule(s)", .conflicts.len())]
    Conflict {
        conflicts: Vec<ConflictDetail>,
        suggestions: Vec<Suggestion>,
    },

    #[error(transparent)]
    Check(#[from] ConflictError),

    #[error(transparent)]
    Store(#[from] RepositoryError),
}

impl ScheduleWriteError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Conflict { .. } => false,
            Self::Check(err) => err.is_retryable(),
            Self::Store(err) => err.is_retryable(),
        }
    }
}

/// Persist `candidate` as a new schedule unless it collides.
///
/// Any `exclude_id` on the candidate is ignored: a new schedule has nothing
/// to exclude.
pub async fn create_checked<R>(
    repo: &R,
    policy: &ConflictPolicy,
    candidate: &CandidateAssignment,
) -> Result<Schedule, ScheduleWriteError>
where
    R: FullRepository + ?Sized,
{
    let candidate = candidate.excluding(None);
    ensure_free(repo, policy, &candidate).await?;

    let schedule = repo.create_schedule(&candidate.to_new_schedule()).await?;
    info!(
        "Created schedule {} (driver={}, shuttle={}, {} {})",
        schedule.id,
        schedule.driver_id,
        schedule.shuttle_id,
        schedule.date,
        schedule.time.format("%H:%M")
    );
    Ok(schedule)
}

/// Reassign schedule `id` to `candidate` unless it collides with any
/// schedule other than itself.
pub async fn update_checked<R>(
    repo: &R,
    policy: &ConflictPolicy,
    id: ScheduleId,
    candidate: &CandidateAssignment,
) -> Result<Schedule, ScheduleWriteError>
where
    R: FullRepository + ?Sized,
{
    repo.get_schedule(id).await?;

    let candidate = candidate.excluding(Some(id));
    ensure_free(repo, policy, &candidate).await?;

    let schedule = repo.update_schedule(id, &candidate.to_new_schedule()).await?;
    info!("Updated schedule {}", schedule.id);
    Ok(schedule)
}

async fn ensure_free<R>(
    repo: &R,
    policy: &ConflictPolicy,
    candidate: &CandidateAssignment,
) -> Result<(), ScheduleWriteError>
where
    R: FullRepository + ?Sized,
{
    let conflicts = describe_conflicts(repo, policy, candidate).await?;
    if conflicts.is_empty() {
        return Ok(());
    }

    let report = suggest_alternatives(repo, policy, candidate).await?;
    debug!(
        "Rejecting assignment: {} conflict(s), {} suggestion(s)",
        conflicts.len(),
        report.suggestions.len()
    );
    Err(ScheduleWriteError::Conflict {
        conflicts,
        suggestions: report.suggestions,
    })
}

#[cfg(test)]
#[path = "schedules_tests.rs"]
mod schedules_tests;
