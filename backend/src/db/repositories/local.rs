//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data lives in ordered
//! maps, so enumeration order is ascending id, matching the SQL backend.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::debug;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::db::repository::*;
use crate::db::seed::FleetSeed;
use crate::models::{
    Driver, DriverId, NewSchedule, ResourceFilter, Schedule, ScheduleId, ScheduleQuery, Shuttle,
    ShuttleId,
};

/// In-memory local repository.
///
/// Clones share the same underlying data.
///
/// # Example
/// ```
/// use fleet_dispatch::db::repositories::LocalRepository;
/// use fleet_dispatch::models::{Shuttle, ShuttleId};
///
/// let repo = LocalRepository::new();
/// repo.insert_shuttle(Shuttle {
///     id: ShuttleId::new(5),
///     model: "Sprinter".to_string(),
///     plate_number: "ABC-123".to_string(),
/// });
/// assert_eq!(repo.shuttle_count(), 1);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    schedules: BTreeMap<ScheduleId, Schedule>,
    shuttles: BTreeMap<ShuttleId, Shuttle>,
    drivers: BTreeMap<DriverId, Driver>,

    next_schedule_id: ScheduleId,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            schedules: BTreeMap::new(),
            shuttles: BTreeMap::new(),
            drivers: BTreeMap::new(),
            next_schedule_id: ScheduleId(1),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository pre-populated from a seed document.
    pub fn from_seed(seed: &FleetSeed) -> Self {
        let repo = Self::new();
        repo.load_seed(seed);
        repo
    }

    /// Add or replace a shuttle in the directory.
    pub fn insert_shuttle(&self, shuttle: Shuttle) {
        self.data.write().shuttles.insert(shuttle.id, shuttle);
    }

    /// Add or replace a driver in the directory.
    pub fn insert_driver(&self, driver: Driver) {
        self.data.write().drivers.insert(driver.id, driver);
    }

    /// Insert a schedule synchronously, assigning the next id.
    pub fn insert_schedule(&self, schedule: &NewSchedule) -> Schedule {
        let mut data = self.data.write();
        let id = data.next_schedule_id;
        data.next_schedule_id = ScheduleId(id.0 + 1);

        let stored = Schedule {
            id,
            driver_id: schedule.driver_id,
            shuttle_id: schedule.shuttle_id,
            date: schedule.date,
            time: schedule.time,
            deleted_at: None,
        };
        data.schedules.insert(id, stored.clone());
        stored
    }

    /// Load every shuttle, driver and schedule of a seed document.
    pub fn load_seed(&self, seed: &FleetSeed) {
        for shuttle in &seed.shuttles {
            self.insert_shuttle(shuttle.clone());
        }
        for driver in &seed.drivers {
            self.insert_driver(driver.clone());
        }
        for schedule in &seed.schedules {
            self.insert_schedule(schedule);
        }
        debug!(
            "Loaded seed: {} shuttles, {} drivers, {} schedules",
            seed.shuttles.len(),
            seed.drivers.len(),
            seed.schedules.len()
        );
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Number of schedules held, soft-deleted ones included.
    pub fn schedule_count(&self) -> usize {
        self.data.read().schedules.len()
    }

    pub fn shuttle_count(&self) -> usize {
        self.data.read().shuttles.len()
    }

    pub fn driver_count(&self) -> usize {
        self.data.read().drivers.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Store is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }

    fn matching(data: &LocalData, query: &ScheduleQuery) -> Vec<Schedule> {
        let mut found: Vec<Schedule> = data
            .schedules
            .values()
            .filter(|s| query.matches(s))
            .cloned()
            .collect();
        found.sort_by_key(|s| (s.time, s.id));
        found
    }

    fn missing(id: ScheduleId, operation: &str) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("Schedule {} not found", id),
            ErrorContext::new(operation)
                .with_entity("schedule")
                .with_entity_id(id),
        )
    }

    fn live_mut<'a>(
        data: &'a mut LocalData,
        id: ScheduleId,
        operation: &str,
    ) -> RepositoryResult<&'a mut Schedule> {
        data.schedules
            .get_mut(&id)
            .filter(|s| !s.is_deleted())
            .ok_or_else(|| Self::missing(id, operation))
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScheduleRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn exists_in_window(&self, query: &ScheduleQuery) -> RepositoryResult<bool> {
        self.check_health("exists_in_window")?;
        let data = self.data.read();
        Ok(data.schedules.values().any(|s| query.matches(s)))
    }

    async fn first_in_window(&self, query: &ScheduleQuery) -> RepositoryResult<Option<Schedule>> {
        self.check_health("first_in_window")?;
        let data = self.data.read();
        Ok(Self::matching(&data, query).into_iter().next())
    }

    async fn find_in_window(&self, query: &ScheduleQuery) -> RepositoryResult<Vec<Schedule>> {
        self.check_health("find_in_window")?;
        let data = self.data.read();
        Ok(Self::matching(&data, query))
    }

    async fn create_schedule(&self, schedule: &NewSchedule) -> RepositoryResult<Schedule> {
        self.check_health("create_schedule")?;
        Ok(self.insert_schedule(schedule))
    }

    async fn get_schedule(&self, id: ScheduleId) -> RepositoryResult<Schedule> {
        self.check_health("get_schedule")?;
        let data = self.data.read();
        data.schedules
            .get(&id)
            .filter(|s| !s.is_deleted())
            .cloned()
            .ok_or_else(|| Self::missing(id, "get_schedule"))
    }

    async fn update_schedule(
        &self,
        id: ScheduleId,
        schedule: &NewSchedule,
    ) -> RepositoryResult<Schedule> {
        self.check_health("update_schedule")?;
        let mut data = self.data.write();
        let stored = Self::live_mut(&mut data, id, "update_schedule")?;
        stored.driver_id = schedule.driver_id;
        stored.shuttle_id = schedule.shuttle_id;
        stored.date = schedule.date;
        stored.time = schedule.time;
        Ok(stored.clone())
    }

    async fn soft_delete_schedule(&self, id: ScheduleId) -> RepositoryResult<()> {
        self.check_health("soft_delete_schedule")?;
        let mut data = self.data.write();
        let stored = Self::live_mut(&mut data, id, "soft_delete_schedule")?;
        stored.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn list_schedules_for_date(&self, date: NaiveDate) -> RepositoryResult<Vec<Schedule>> {
        self.check_health("list_schedules_for_date")?;
        let data = self.data.read();
        let mut found: Vec<Schedule> = data
            .schedules
            .values()
            .filter(|s| !s.is_deleted() && s.date == date)
            .cloned()
            .collect();
        found.sort_by_key(|s| (s.time, s.id));
        Ok(found)
    }
}

#[async_trait]
impl FleetRepository for LocalRepository {
    async fn list_shuttles(&self) -> RepositoryResult<Vec<Shuttle>> {
        self.check_health("list_shuttles")?;
        Ok(self.data.read().shuttles.values().cloned().collect())
    }

    async fn list_drivers(&self) -> RepositoryResult<Vec<Driver>> {
        self.check_health("list_drivers")?;
        Ok(self.data.read().drivers.values().cloned().collect())
    }

    async fn shuttles_free_in(&self, query: &ScheduleQuery) -> RepositoryResult<Vec<Shuttle>> {
        self.check_health("shuttles_free_in")?;
        let query = query.with_resource(ResourceFilter::Any);
        let data = self.data.read();
        let busy: HashSet<ShuttleId> = data
            .schedules
            .values()
            .filter(|s| query.matches(s))
            .map(|s| s.shuttle_id)
            .collect();
        Ok(data
            .shuttles
            .values()
            .filter(|s| !busy.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn drivers_free_in(&self, query: &ScheduleQuery) -> RepositoryResult<Vec<Driver>> {
        self.check_health("drivers_free_in")?;
        let query = query.with_resource(ResourceFilter::Any);
        let data = self.data.read();
        let busy: HashSet<DriverId> = data
            .schedules
            .values()
            .filter(|s| query.matches(s))
            .map(|s| s.driver_id)
            .collect();
        Ok(data
            .drivers
            .values()
            .filter(|d| !busy.contains(&d.id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;
    use chrono::NaiveTime;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn booking(driver: i64, shuttle: i64, h: u32, m: u32) -> NewSchedule {
        NewSchedule {
            driver_id: DriverId::new(driver),
            shuttle_id: ShuttleId::new(shuttle),
            date: date(),
            time: at(h, m),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let repo = LocalRepository::new();
        let a = repo.create_schedule(&booking(1, 5, 9, 0)).await.unwrap();
        let b = repo.create_schedule(&booking(2, 6, 9, 0)).await.unwrap();
        assert_eq!(a.id, ScheduleId(1));
        assert_eq!(b.id, ScheduleId(2));
    }

    #[tokio::test]
    async fn test_soft_deleted_schedules_are_invisible() {
        let repo = LocalRepository::new();
        let stored = repo.create_schedule(&booking(1, 5, 9, 0)).await.unwrap();
        repo.soft_delete_schedule(stored.id).await.unwrap();

        let query = ScheduleQuery::new(date(), TimeWindow::around(at(9, 0), 30));
        assert!(!repo.exists_in_window(&query).await.unwrap());
        assert!(repo.get_schedule(stored.id).await.unwrap_err().is_not_found());
        assert!(repo
            .soft_delete_schedule(stored.id)
            .await
            .unwrap_err()
            .is_not_found());
        assert_eq!(repo.schedule_count(), 1);
    }

    #[tokio::test]
    async fn test_first_in_window_orders_by_time() {
        let repo = LocalRepository::new();
        repo.create_schedule(&booking(1, 5, 9, 20)).await.unwrap();
        let early = repo.create_schedule(&booking(1, 6, 8, 45)).await.unwrap();

        let query = ScheduleQuery::new(date(), TimeWindow::around(at(9, 0), 30))
            .with_resource(ResourceFilter::Driver(DriverId::new(1)));
        let first = repo.first_in_window(&query).await.unwrap().unwrap();
        assert_eq!(first.id, early.id);
    }

    #[tokio::test]
    async fn test_unhealthy_store_fails_with_retryable_error() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);

        let query = ScheduleQuery::new(date(), TimeWindow::around(at(9, 0), 30));
        let err = repo.exists_in_window(&query).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(!repo.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_keeps_health_flag() {
        let repo = LocalRepository::new();
        repo.insert_schedule(&booking(1, 5, 9, 0));
        repo.set_healthy(false);
        repo.clear();
        assert_eq!(repo.schedule_count(), 0);
        assert!(!repo.health_check().await.unwrap());
    }
}
