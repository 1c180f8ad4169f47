//! Shared fixtures for the service tests.

use chrono::{NaiveDate, NaiveTime};

use super::candidate::CandidateAssignment;
use crate::db::repositories::LocalRepository;
use crate::models::{
    Driver, DriverId, NewSchedule, Schedule, Shuttle, ShuttleId, UserProfile,
};

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
}

pub fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// Shuttles 5, 6, 7 and drivers 1, 2, 3 with no schedules. Driver 2 has no
/// linked profile.
pub fn fleet() -> LocalRepository {
    let repo = LocalRepository::new();
    for (id, model, plate) in [
        (5, "Sprinter", "ABC-123"),
        (6, "Transit", "DEF-456"),
        (7, "Coaster", "GHI-789"),
    ] {
        repo.insert_shuttle(Shuttle {
            id: ShuttleId::new(id),
            model: model.to_string(),
            plate_number: plate.to_string(),
        });
    }
    repo.insert_driver(Driver {
        id: DriverId::new(1),
        profile: Some(UserProfile {
            first_name: "Ana".to_string(),
            last_name: "Reyes".to_string(),
        }),
    });
    repo.insert_driver(Driver {
        id: DriverId::new(2),
        profile: None,
    });
    repo.insert_driver(Driver {
        id: DriverId::new(3),
        profile: Some(UserProfile {
            first_name: "Tomas".to_string(),
            last_name: "Lind".to_string(),
        }),
    });
    repo
}

pub fn book(
    repo: &LocalRepository,
    driver: i64,
    shuttle: i64,
    date: NaiveDate,
    time: NaiveTime,
) -> Schedule {
    repo.insert_schedule(&NewSchedule {
        driver_id: DriverId::new(driver),
        shuttle_id: ShuttleId::new(shuttle),
        date,
        time,
    })
}

pub fn candidate(driver: i64, shuttle: i64, time: NaiveTime) -> CandidateAssignment {
    CandidateAssignment::new(DriverId::new(driver), ShuttleId::new(shuttle), day(), time)
}
