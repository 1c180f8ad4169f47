//! Integration tests for the in-memory LocalRepository.

mod support;

use std::sync::Arc;

use fleet_dispatch::db::repositories::LocalRepository;
use fleet_dispatch::db::repository::{FleetRepository, FullRepository, ScheduleRepository};
use fleet_dispatch::models::{
    DriverId, NewSchedule, ResourceFilter, ScheduleId, ScheduleQuery, ShuttleId, TimeWindow,
};
use support::{at, book, day, seeded_fleet};

fn window_query(center: chrono::NaiveTime) -> ScheduleQuery {
    ScheduleQuery::new(day(), TimeWindow::around(center, 30))
}

#[tokio::test]
async fn test_create_get_update_delete_cycle() {
    let repo = seeded_fleet();
    let created = repo
        .create_schedule(&NewSchedule {
            driver_id: DriverId::new(1),
            shuttle_id: ShuttleId::new(5),
            date: day(),
            time: at(9, 0),
        })
        .await
        .unwrap();
    assert_eq!(created.id, ScheduleId::new(1));

    let updated = repo
        .update_schedule(
            created.id,
            &NewSchedule {
                driver_id: DriverId::new(2),
                shuttle_id: ShuttleId::new(6),
                date: day(),
                time: at(11, 0),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.driver_id, DriverId::new(2));
    assert_eq!(repo.get_schedule(created.id).await.unwrap(), updated);

    repo.soft_delete_schedule(created.id).await.unwrap();
    assert!(repo.get_schedule(created.id).await.unwrap_err().is_not_found());
    assert!(repo
        .soft_delete_schedule(created.id)
        .await
        .unwrap_err()
        .is_not_found());
    assert!(repo
        .update_schedule(
            created.id,
            &NewSchedule {
                driver_id: DriverId::new(1),
                shuttle_id: ShuttleId::new(5),
                date: day(),
                time: at(9, 0),
            },
        )
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_window_queries_filter_by_resource() {
    let repo = seeded_fleet();
    let driver_hit = book(&repo, 1, 6, at(9, 10));
    let shuttle_hit = book(&repo, 2, 5, at(8, 40));
    book(&repo, 3, 7, at(9, 0));

    let by_driver = window_query(at(9, 0)).with_resource(ResourceFilter::Driver(DriverId::new(1)));
    assert_eq!(repo.first_in_window(&by_driver).await.unwrap(), Some(driver_hit));

    let either = window_query(at(9, 0)).with_resource(ResourceFilter::DriverOrShuttle {
        driver_id: DriverId::new(1),
        shuttle_id: ShuttleId::new(5),
    });
    let found = repo.find_in_window(&either).await.unwrap();
    assert_eq!(found.len(), 2);
    // Ordered by time: 08:40 before 09:10.
    assert_eq!(found[0].id, shuttle_hit.id);

    let all = repo.find_in_window(&window_query(at(9, 0))).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_anti_joins_ignore_resource_filter_and_honour_exclusion() {
    let repo = seeded_fleet();
    let own = book(&repo, 1, 5, at(9, 0));
    book(&repo, 2, 6, at(9, 20));
    book(&repo, 3, 7, at(12, 0));

    let query = window_query(at(9, 0)).with_resource(ResourceFilter::Driver(DriverId::new(1)));
    let shuttles: Vec<_> = repo
        .shuttles_free_in(&query)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id.value())
        .collect();
    assert_eq!(shuttles, vec![7, 8]);

    let excluding = query.excluding(Some(own.id));
    let drivers: Vec<_> = repo
        .drivers_free_in(&excluding)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.id.value())
        .collect();
    assert_eq!(drivers, vec![1, 3, 4]);
}

#[tokio::test]
async fn test_list_for_date_is_ordered_and_skips_deleted() {
    let repo = seeded_fleet();
    let late = book(&repo, 1, 5, at(17, 0));
    let early = book(&repo, 2, 6, at(6, 30));
    let gone = book(&repo, 3, 7, at(12, 0));
    repo.soft_delete_schedule(gone.id).await.unwrap();

    let listed = repo.list_schedules_for_date(day()).await.unwrap();
    assert_eq!(listed.iter().map(|s| s.id).collect::<Vec<_>>(), vec![early.id, late.id]);
}

#[tokio::test]
async fn test_unhealthy_repository_fails_every_call() {
    let repo = seeded_fleet();
    repo.set_healthy(false);

    assert!(repo.list_shuttles().await.unwrap_err().is_retryable());
    assert!(repo
        .exists_in_window(&window_query(at(9, 0)))
        .await
        .unwrap_err()
        .is_retryable());

    repo.set_healthy(true);
    assert!(repo.health_check().await.unwrap());
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    let repo: Arc<dyn FullRepository> = Arc::new(LocalRepository::new());

    let mut handles = Vec::new();
    for i in 0..16 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo.create_schedule(&NewSchedule {
                driver_id: DriverId::new(i),
                shuttle_id: ShuttleId::new(100 + i),
                date: day(),
                time: at(8, 0),
            })
            .await
            .unwrap()
            .id
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 16);
}
