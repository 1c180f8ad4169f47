//! Schedule records and the query shapes used to search them.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::time::{hhmm, TimeWindow};
use crate::define_id_type;

define_id_type!(i64, ScheduleId);
define_id_type!(i64, DriverId);
define_id_type!(i64, ShuttleId);

/// A persisted driver + shuttle assignment on a date and start time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub driver_id: DriverId,
    pub shuttle_id: ShuttleId,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    /// Soft-deletion marker; deleted schedules are invisible to store queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Schedule {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Field set for creating or reassigning a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSchedule {
    pub driver_id: DriverId,
    pub shuttle_id: ShuttleId,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
}

/// The two resource axes a schedule occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceDimension {
    Driver,
    Shuttle,
}

impl fmt::Display for ResourceDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceDimension::Driver => f.write_str("driver"),
            ResourceDimension::Shuttle => f.write_str("shuttle"),
        }
    }
}

/// Resource predicate of a [`ScheduleQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceFilter {
    /// Every schedule in the window, regardless of resources.
    Any,
    Driver(DriverId),
    Shuttle(ShuttleId),
    /// Schedules using the driver OR the shuttle.
    DriverOrShuttle {
        driver_id: DriverId,
        shuttle_id: ShuttleId,
    },
}

impl ResourceFilter {
    pub fn matches(&self, schedule: &Schedule) -> bool {
        match *self {
            ResourceFilter::Any => true,
            ResourceFilter::Driver(driver_id) => schedule.driver_id == driver_id,
            ResourceFilter::Shuttle(shuttle_id) => schedule.shuttle_id == shuttle_id,
            ResourceFilter::DriverOrShuttle {
                driver_id,
                shuttle_id,
            } => schedule.driver_id == driver_id || schedule.shuttle_id == shuttle_id,
        }
    }
}

/// Windowed search over live schedules of one date.
///
/// Matches schedules whose `date` equals `date`, whose `time` lies inside
/// `window` (inclusive), whose resources satisfy `resource`, and whose id is
/// not `exclude_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleQuery {
    pub date: NaiveDate,
    pub window: TimeWindow,
    pub resource: ResourceFilter,
    pub exclude_id: Option<ScheduleId>,
}

impl ScheduleQuery {
    pub fn new(date: NaiveDate, window: TimeWindow) -> Self {
        Self {
            date,
            window,
            resource: ResourceFilter::Any,
            exclude_id: None,
        }
    }

    pub fn with_resource(mut self, resource: ResourceFilter) -> Self {
        self.resource = resource;
        self
    }

    pub fn excluding(mut self, exclude_id: Option<ScheduleId>) -> Self {
        self.exclude_id = exclude_id;
        self
    }

    /// In-memory evaluation of the query. Soft-deleted rows never match.
    pub fn matches(&self, schedule: &Schedule) -> bool {
        !schedule.is_deleted()
            && schedule.date == self.date
            && self.window.contains(schedule.time)
            && self.resource.matches(schedule)
            && self.exclude_id != Some(schedule.id)
    }
}
