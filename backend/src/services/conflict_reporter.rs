//! Per-dimension explanation of why a candidate collides.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::candidate::CandidateAssignment;
use super::error::ConflictError;
use super::policy::ConflictPolicy;
use crate::db::repository::ScheduleRepository;
use crate::models::{hhmm, format_time_of_day, ResourceDimension, ResourceFilter, Schedule};

/// One colliding schedule, attributed to the resource it shares with the
/// candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictDetail {
    pub dimension: ResourceDimension,
    #[serde(with = "hhmm")]
    pub colliding_time: NaiveTime,
    pub colliding_schedule: Schedule,
}

impl ConflictDetail {
    /// Operator-facing sentence, e.g. `driver already assigned at 09:00`.
    pub fn message(&self) -> String {
        format!(
            "{} already assigned at {}",
            self.dimension,
            format_time_of_day(self.colliding_time)
        )
    }
}

/// At most one detail per dimension, driver first, shuttle second.
///
/// Within a dimension the earliest colliding schedule (by time, then id)
/// is reported. A schedule sharing both driver and shuttle yields two
/// details referencing the same schedule.
pub async fn describe_conflicts<R>(
    repo: &R,
    policy: &ConflictPolicy,
    candidate: &CandidateAssignment,
) -> Result<Vec<ConflictDetail>, ConflictError>
where
    R: ScheduleRepository + ?Sized,
{
    let base = candidate.window_query(policy);
    let probes = [
        (
            ResourceDimension::Driver,
            ResourceFilter::Driver(candidate.driver_id),
        ),
        (
            ResourceDimension::Shuttle,
            ResourceFilter::Shuttle(candidate.shuttle_id),
        ),
    ];

    let mut details = Vec::with_capacity(probes.len());
    for (dimension, filter) in probes {
        let hit = repo
            .first_in_window(&base.with_resource(filter))
            .await
            .map_err(ConflictError::store("describe_conflicts"))?;

        if let Some(schedule) = hit {
            details.push(ConflictDetail {
                dimension,
                colliding_time: schedule.time,
                colliding_schedule: schedule,
            });
        }
    }
    Ok(details)
}
