//! Data Transfer Objects for the HTTP API.
//!
//! Dates travel as `YYYY-MM-DD` strings and times as `HH:MM`; they are
//! parsed here rather than by serde so malformed values come back as a 400
//! naming the offending field.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Driver, DriverId, Schedule, ScheduleId, ShuttleId};
use crate::services::{CandidateAssignment, ConflictDetail, ConflictError};

/// Body of the conflict endpoints and of schedule create/update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRequest {
    pub driver_id: DriverId,
    pub shuttle_id: ShuttleId,
    pub date: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_id: Option<ScheduleId>,
}

impl AssignmentRequest {
    pub fn to_candidate(&self) -> Result<CandidateAssignment, ConflictError> {
        CandidateAssignment::parse(
            self.driver_id,
            self.shuttle_id,
            &self.date,
            &self.time,
            self.exclude_id,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictCheckResponse {
    pub has_conflict: bool,
}

/// A reporter detail plus its operator-facing sentence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictDetailDto {
    #[serde(flatten)]
    pub detail: ConflictDetail,
    pub message: String,
}

impl From<ConflictDetail> for ConflictDetailDto {
    fn from(detail: ConflictDetail) -> Self {
        Self {
            message: detail.message(),
            detail,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictDetailsResponse {
    pub has_conflict: bool,
    pub conflicts: Vec<ConflictDetailDto>,
}

/// Query string of `GET /v1/schedules`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleListQuery {
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleListResponse {
    pub date: NaiveDate,
    pub schedules: Vec<Schedule>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverDto {
    pub id: DriverId,
    pub name: String,
}

impl From<Driver> for DriverDto {
    fn from(driver: Driver) -> Self {
        Self {
            name: driver.display_name(),
            id: driver.id,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// API version
    pub version: String,
    /// Database connection status
    pub database: String,
}
