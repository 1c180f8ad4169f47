//! The proposed assignment under evaluation.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::error::ConflictError;
use super::policy::ConflictPolicy;
use crate::models::{
    hhmm, parse_date, parse_time_of_day, DriverId, NewSchedule, ScheduleId, ScheduleQuery,
    ShuttleId, TimeWindow,
};

/// A (driver, shuttle, date, time) proposal, optionally ignoring one existing
/// schedule (the one being edited).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateAssignment {
    pub driver_id: DriverId,
    pub shuttle_id: ShuttleId,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_id: Option<ScheduleId>,
}

impl CandidateAssignment {
    pub fn new(
        driver_id: DriverId,
        shuttle_id: ShuttleId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Self {
        Self {
            driver_id,
            shuttle_id,
            date,
            time,
            exclude_id: None,
        }
    }

    /// Build a candidate from raw `YYYY-MM-DD` / `HH:MM` strings.
    pub fn parse(
        driver_id: DriverId,
        shuttle_id: ShuttleId,
        date: &str,
        time: &str,
        exclude_id: Option<ScheduleId>,
    ) -> Result<Self, ConflictError> {
        let date = parse_date(date)?;
        let time = parse_time_of_day(time)?;
        Ok(Self::new(driver_id, shuttle_id, date, time).excluding(exclude_id))
    }

    pub fn excluding(mut self, exclude_id: Option<ScheduleId>) -> Self {
        self.exclude_id = exclude_id;
        self
    }

    /// Same candidate at another time of the same date.
    pub fn at_time(mut self, time: NaiveTime) -> Self {
        self.time = time;
        self
    }

    pub fn with_driver(mut self, driver_id: DriverId) -> Self {
        self.driver_id = driver_id;
        self
    }

    pub fn with_shuttle(mut self, shuttle_id: ShuttleId) -> Self {
        self.shuttle_id = shuttle_id;
        self
    }

    pub fn window(&self, policy: &ConflictPolicy) -> TimeWindow {
        policy.window_around(self.time)
    }

    /// Date + window + exclusion, with no resource narrowing yet.
    pub fn window_query(&self, policy: &ConflictPolicy) -> ScheduleQuery {
        ScheduleQuery::new(self.date, self.window(policy)).excluding(self.exclude_id)
    }

    pub fn to_new_schedule(&self) -> NewSchedule {
        NewSchedule {
            driver_id: self.driver_id,
            shuttle_id: self.shuttle_id,
            date: self.date,
            time: self.time,
        }
    }
}
