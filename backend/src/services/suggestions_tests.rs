use super::*;
use crate::db::repositories::LocalRepository;
use crate::models::ResourceDimension;
use crate::services::describe_conflicts;
use crate::services::test_fixtures::{at, book, candidate, day, fleet};
use proptest::prelude::*;

#[tokio::test]
async fn test_no_conflict_means_no_suggestions() {
    let repo = fleet();
    book(&repo, 1, 5, day(), at(9, 0));

    let report = suggest_alternatives(&repo, &ConflictPolicy::default(), &candidate(2, 6, at(9, 0)))
        .await
        .unwrap();
    assert_eq!(report, SuggestionReport::no_conflict());
}

#[tokio::test]
async fn test_sole_schedule_scenario() {
    let repo = fleet();
    book(&repo, 1, 5, day(), at(9, 0));

    let report = suggest_alternatives(&repo, &ConflictPolicy::default(), &candidate(1, 5, at(9, 0)))
        .await
        .unwrap();

    assert!(report.has_conflict);
    assert_eq!(report.shuttle_ids(), vec![ShuttleId::new(6), ShuttleId::new(7)]);
    assert_eq!(report.driver_ids(), vec![DriverId::new(2), DriverId::new(3)]);
    assert_eq!(report.times(), vec![at(8, 0), at(10, 0)]);
}

#[tokio::test]
async fn test_categories_are_ordered() {
    let repo = fleet();
    book(&repo, 1, 5, day(), at(9, 0));

    let report = suggest_alternatives(&repo, &ConflictPolicy::default(), &candidate(1, 5, at(9, 0)))
        .await
        .unwrap();

    let rank = |s: &Suggestion| match s {
        Suggestion::ShuttleAlternative { .. } => 0,
        Suggestion::DriverAlternative { .. } => 1,
        Suggestion::TimeAlternative { .. } => 2,
    };
    let ranks: Vec<_> = report.suggestions.iter().map(rank).collect();
    let mut sorted = ranks.clone();
    sorted.sort();
    assert_eq!(ranks, sorted);
}

#[tokio::test]
async fn test_driver_names_fall_back_to_placeholder() {
    let repo = fleet();
    book(&repo, 1, 5, day(), at(9, 0));

    let report = suggest_alternatives(&repo, &ConflictPolicy::default(), &candidate(1, 5, at(9, 0)))
        .await
        .unwrap();

    let names: Vec<_> = report
        .suggestions
        .iter()
        .filter_map(|s| match s {
            Suggestion::DriverAlternative { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["Driver #2", "Tomas Lind"]);
}

#[tokio::test]
async fn test_busy_time_shifts_are_omitted() {
    let repo = fleet();
    book(&repo, 1, 5, day(), at(9, 0));
    book(&repo, 1, 6, day(), at(10, 0));

    let report = suggest_alternatives(&repo, &ConflictPolicy::default(), &candidate(1, 5, at(9, 0)))
        .await
        .unwrap();

    assert_eq!(report.times(), vec![at(8, 0)]);
}

#[tokio::test]
async fn test_time_shift_leaving_the_day_is_skipped() {
    let repo = fleet();
    book(&repo, 1, 5, day(), at(0, 20));

    let report = suggest_alternatives(
        &repo,
        &ConflictPolicy::default(),
        &candidate(1, 5, at(0, 30)),
    )
    .await
    .unwrap();

    assert!(report.has_conflict);
    assert_eq!(report.times(), vec![at(1, 30)]);
}

#[tokio::test]
async fn test_out_of_range_time_shift_offers_no_times() {
    let repo = fleet();
    book(&repo, 1, 5, day(), at(9, 0));

    let policy = ConflictPolicy {
        time_shift_minutes: i64::MAX,
        ..ConflictPolicy::default()
    };
    let report = suggest_alternatives(&repo, &policy, &candidate(1, 5, at(9, 0)))
        .await
        .unwrap();

    assert!(report.has_conflict);
    assert!(report.times().is_empty());
}

#[tokio::test]
async fn test_fully_booked_window_yields_empty_resource_categories() {
    let repo = fleet();
    book(&repo, 1, 5, day(), at(9, 0));
    book(&repo, 2, 6, day(), at(9, 10));
    book(&repo, 3, 7, day(), at(8, 50));

    let report = suggest_alternatives(&repo, &ConflictPolicy::default(), &candidate(1, 5, at(9, 0)))
        .await
        .unwrap();

    assert!(report.has_conflict);
    assert!(report.shuttle_ids().is_empty());
    assert!(report.driver_ids().is_empty());
}

#[tokio::test]
async fn test_exclusion_frees_own_resources() {
    let repo = fleet();
    let own = book(&repo, 1, 5, day(), at(9, 0));
    book(&repo, 2, 6, day(), at(9, 15));

    // Reassigning the edited schedule to shuttle 6 collides with driver 2;
    // its own driver and shuttle are free again.
    let edit = candidate(1, 6, at(9, 0)).excluding(Some(own.id));
    let report = suggest_alternatives(&repo, &ConflictPolicy::default(), &edit)
        .await
        .unwrap();

    assert!(report.has_conflict);
    assert_eq!(report.shuttle_ids(), vec![ShuttleId::new(5), ShuttleId::new(7)]);
    assert_eq!(report.driver_ids(), vec![DriverId::new(1), DriverId::new(3)]);
}

#[tokio::test]
async fn test_suggestion_json_shape() {
    let repo = fleet();
    book(&repo, 1, 5, day(), at(9, 0));

    let report = suggest_alternatives(&repo, &ConflictPolicy::default(), &candidate(1, 5, at(9, 0)))
        .await
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["has_conflict"], true);
    assert_eq!(json["suggestions"][0]["type"], "shuttle_alternative");
    assert_eq!(json["suggestions"][0]["shuttle_id"], 6);
    assert_eq!(json["suggestions"][0]["plate_number"], "DEF-456");
    assert_eq!(json["suggestions"][2]["type"], "driver_alternative");
    assert_eq!(json["suggestions"][4]["type"], "time_alternative");
    assert_eq!(json["suggestions"][4]["time"], "08:00");
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let repo = fleet();
    repo.set_healthy(false);

    let err = suggest_alternatives(&repo, &ConflictPolicy::default(), &candidate(1, 5, at(9, 0)))
        .await
        .unwrap_err();
    assert!(err.is_retryable());
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

fn random_fleet(bookings: &[(i64, i64, u32)]) -> LocalRepository {
    let repo = fleet();
    for &(driver, shuttle, minute) in bookings {
        book(&repo, driver, shuttle, day(), at(minute / 60, minute % 60));
    }
    repo
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_resource_alternatives_clear_their_dimension(
        bookings in prop::collection::vec((1i64..=3, 5i64..=7, 0u32..1440), 0..8),
        driver in 1i64..=3,
        shuttle in 5i64..=7,
        minute in 0u32..1440,
    ) {
        let repo = random_fleet(&bookings);
        let policy = ConflictPolicy::default();
        let request = candidate(driver, shuttle, at(minute / 60, minute % 60));

        block_on(async {
            let report = suggest_alternatives(&repo, &policy, &request).await.unwrap();
            let conflicting = has_conflict(&repo, &policy, &request).await.unwrap();
            prop_assert_eq!(report.has_conflict, conflicting);
            if !conflicting {
                prop_assert!(report.suggestions.is_empty());
            }

            for shuttle_id in report.shuttle_ids() {
                let details = describe_conflicts(&repo, &policy, &request.with_shuttle(shuttle_id))
                    .await
                    .unwrap();
                prop_assert!(details.iter().all(|d| d.dimension != ResourceDimension::Shuttle));
            }
            for driver_id in report.driver_ids() {
                let details = describe_conflicts(&repo, &policy, &request.with_driver(driver_id))
                    .await
                    .unwrap();
                prop_assert!(details.iter().all(|d| d.dimension != ResourceDimension::Driver));
            }
            for time in report.times() {
                prop_assert!(!has_conflict(&repo, &policy, &request.at_time(time)).await.unwrap());
            }
            Ok(())
        })?;
    }

    #[test]
    fn prop_window_symmetry(
        existing in 0u32..1440,
        requested in 0u32..1440,
        same_driver in any::<bool>(),
    ) {
        let repo = fleet();
        book(&repo, 1, 5, day(), at(existing / 60, existing % 60));
        let policy = ConflictPolicy::default();

        let request = if same_driver {
            candidate(1, 6, at(requested / 60, requested % 60))
        } else {
            candidate(2, 5, at(requested / 60, requested % 60))
        };
        let expected = (existing as i64 - requested as i64).abs() <= 30;

        let found = block_on(has_conflict(&repo, &policy, &request)).unwrap();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn prop_disjoint_resources_never_conflict(existing in 0u32..1440, requested in 0u32..1440) {
        let repo = fleet();
        book(&repo, 1, 5, day(), at(existing / 60, existing % 60));

        let request = candidate(2, 6, at(requested / 60, requested % 60));
        let found = block_on(has_conflict(&repo, &ConflictPolicy::default(), &request)).unwrap();
        prop_assert!(!found);
    }
}
