//! Shuttle and driver directory trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Driver, ScheduleQuery, Shuttle};

/// Read access to the resource directories.
///
/// The `*_free_in` methods are anti-joins: they enumerate resources whose id
/// does not appear on any live schedule matched by the query. The query's
/// resource filter is ignored; only date, window and exclusion apply.
/// Results come back in ascending id order.
#[async_trait]
pub trait FleetRepository: Send + Sync {
    async fn list_shuttles(&self) -> RepositoryResult<Vec<Shuttle>>;

    async fn list_drivers(&self) -> RepositoryResult<Vec<Driver>>;

    /// Shuttles not booked by any schedule inside the query window.
    async fn shuttles_free_in(&self, query: &ScheduleQuery) -> RepositoryResult<Vec<Shuttle>>;

    /// Drivers not booked by any schedule inside the query window.
    async fn drivers_free_in(&self, query: &ScheduleQuery) -> RepositoryResult<Vec<Driver>>;
}
