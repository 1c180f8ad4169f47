#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveTime};
use fleet_dispatch::db::repositories::LocalRepository;
use fleet_dispatch::models::{
    Driver, DriverId, NewSchedule, Schedule, Shuttle, ShuttleId, UserProfile,
};
use fleet_dispatch::services::CandidateAssignment;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
}

pub fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// Shuttles 5..=8 and drivers 1..=4; driver 4 has no linked profile.
pub fn seeded_fleet() -> LocalRepository {
    let repo = LocalRepository::new();
    let shuttles = [
        (5, "Sprinter", "ABC-123"),
        (6, "Transit", "DEF-456"),
        (7, "Coaster", "GHI-789"),
        (8, "Crafter", "JKL-012"),
    ];
    for (id, model, plate) in shuttles {
        repo.insert_shuttle(Shuttle {
            id: ShuttleId::new(id),
            model: model.to_string(),
            plate_number: plate.to_string(),
        });
    }

    let drivers = [
        (1, Some(("Ana", "Reyes"))),
        (2, Some(("Bo", "Kim"))),
        (3, Some(("Chidi", "Okafor"))),
        (4, None),
    ];
    for (id, name) in drivers {
        repo.insert_driver(Driver {
            id: DriverId::new(id),
            profile: name.map(|(first, last)| UserProfile {
                first_name: first.to_string(),
                last_name: last.to_string(),
            }),
        });
    }
    repo
}

pub fn book(repo: &LocalRepository, driver: i64, shuttle: i64, time: NaiveTime) -> Schedule {
    repo.insert_schedule(&NewSchedule {
        driver_id: DriverId::new(driver),
        shuttle_id: ShuttleId::new(shuttle),
        date: day(),
        time,
    })
}

pub fn candidate(driver: i64, shuttle: i64, time: NaiveTime) -> CandidateAssignment {
    CandidateAssignment::new(DriverId::new(driver), ShuttleId::new(shuttle), day(), time)
}
