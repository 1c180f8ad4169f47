use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;

use super::schema::{schedules, shuttles};
use crate::models::{
    Driver, DriverId, NewSchedule, Schedule, ScheduleId, Shuttle, ShuttleId, UserProfile,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ScheduleRow {
    pub id: i64,
    pub driver_id: i64,
    pub shuttle_id: i64,
    pub service_date: NaiveDate,
    pub start_time: NaiveTime,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<ScheduleRow> for Schedule {
    fn from(row: ScheduleRow) -> Self {
        Schedule {
            id: ScheduleId(row.id),
            driver_id: DriverId(row.driver_id),
            shuttle_id: ShuttleId(row.shuttle_id),
            date: row.service_date,
            time: row.start_time,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = schedules)]
pub struct ScheduleFieldsRow {
    pub driver_id: i64,
    pub shuttle_id: i64,
    pub service_date: NaiveDate,
    pub start_time: NaiveTime,
}

impl From<&NewSchedule> for ScheduleFieldsRow {
    fn from(schedule: &NewSchedule) -> Self {
        ScheduleFieldsRow {
            driver_id: schedule.driver_id.value(),
            shuttle_id: schedule.shuttle_id.value(),
            service_date: schedule.date,
            start_time: schedule.time,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = shuttles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ShuttleRow {
    pub id: i64,
    pub model: String,
    pub plate_number: String,
}

impl From<ShuttleRow> for Shuttle {
    fn from(row: ShuttleRow) -> Self {
        Shuttle {
            id: ShuttleId(row.id),
            model: row.model,
            plate_number: row.plate_number,
        }
    }
}

/// Driver id with the (first, last) name of its linked profile, if any.
pub type DriverRow = (i64, Option<(String, String)>);

pub fn driver_from_row((id, names): DriverRow) -> Driver {
    Driver {
        id: DriverId(id),
        profile: names.map(|(first_name, last_name)| UserProfile {
            first_name,
            last_name,
        }),
    }
}
