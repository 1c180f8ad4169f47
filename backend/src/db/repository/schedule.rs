//! Schedule store trait.
//!
//! Covers the windowed lookups the conflict engine needs plus the write
//! operations used by schedule management.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::models::{NewSchedule, Schedule, ScheduleId, ScheduleQuery};

/// Repository trait for schedule records.
///
/// Soft-deleted schedules are filtered out by every method; callers never see
/// them.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the store is healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Window Queries ====================

    /// Whether any live schedule matches `query`.
    async fn exists_in_window(&self, query: &ScheduleQuery) -> RepositoryResult<bool>;

    /// First live schedule matching `query`, ordered by `(time, id)`.
    async fn first_in_window(&self, query: &ScheduleQuery) -> RepositoryResult<Option<Schedule>>;

    /// All live schedules matching `query`, ordered by `(time, id)`.
    async fn find_in_window(&self, query: &ScheduleQuery) -> RepositoryResult<Vec<Schedule>>;

    // ==================== Schedule Management ====================

    /// Persist a new schedule and return it with its assigned id.
    async fn create_schedule(&self, schedule: &NewSchedule) -> RepositoryResult<Schedule>;

    /// Fetch a live schedule.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - if absent or soft-deleted
    async fn get_schedule(&self, id: ScheduleId) -> RepositoryResult<Schedule>;

    /// Reassign driver, shuttle, date and time of a live schedule.
    async fn update_schedule(
        &self,
        id: ScheduleId,
        schedule: &NewSchedule,
    ) -> RepositoryResult<Schedule>;

    /// Mark a schedule as deleted. NotFound if absent or already deleted.
    async fn soft_delete_schedule(&self, id: ScheduleId) -> RepositoryResult<()>;

    /// Live schedules on `date`, ordered by `(time, id)`.
    async fn list_schedules_for_date(&self, date: NaiveDate) -> RepositoryResult<Vec<Schedule>>;
}
