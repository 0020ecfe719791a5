mod common;

use std::sync::Arc;

use common::Fixture;
use trip_management::models::trip::{RoutePointStatus, Trip, TripStatus};
use trip_management::repositories::{DriverRepository, TripRepository};
use trip_management::utils::errors::AppError;
use uuid::Uuid;

fn assert_completion_invariant(trip: &Trip) {
    assert_eq!(trip.status == TripStatus::Completed, trip.all_visited());
}

fn positions(trip: &Trip) -> Vec<i32> {
    trip.route_points.iter().map(|p| p.position).collect()
}

#[tokio::test]
async fn test_visit_out_of_order_until_completed() {
    let fx = Fixture::new();
    fx.driver("d@example.com", "Diego").await;
    let a = fx.place("A").await;
    let b = fx.place("B").await;
    let c = fx.place("C").await;

    let trip = fx
        .lifecycle
        .create_trip_for_self("d@example.com", Some("Reparto"), &[a.id, b.id, c.id])
        .await
        .unwrap();

    assert_eq!(trip.status, TripStatus::Planned);
    assert_eq!(positions(&trip), vec![1, 2, 3]);
    assert!(trip
        .route_points
        .iter()
        .all(|p| p.status == RoutePointStatus::Pending));
    assert_eq!(trip.route_points[1].place_id, b.id);
    assert_completion_invariant(&trip);

    let point_a = trip.route_points[0].id;
    let point_b = trip.route_points[1].id;
    let point_c = trip.route_points[2].id;

    let trip = fx
        .route_points
        .mark_visited_as_driver(trip.id, point_b, "d@example.com")
        .await
        .unwrap();
    assert_eq!(trip.status, TripStatus::InProgress);
    assert!(trip.started_at.is_some());
    assert_eq!(trip.route_points[0].status, RoutePointStatus::Pending);
    assert_eq!(trip.route_points[1].status, RoutePointStatus::Visited);
    assert_eq!(trip.route_points[2].status, RoutePointStatus::Pending);
    assert_eq!(positions(&trip), vec![1, 2, 3]);
    assert_completion_invariant(&trip);
    let started_at = trip.started_at;

    let trip = fx
        .route_points
        .mark_visited_as_driver(trip.id, point_a, "d@example.com")
        .await
        .unwrap();
    assert_eq!(trip.status, TripStatus::InProgress);
    assert_eq!(trip.started_at, started_at);
    assert_completion_invariant(&trip);

    let trip = fx
        .route_points
        .mark_visited_as_driver(trip.id, point_c, "d@example.com")
        .await
        .unwrap();
    assert_eq!(trip.status, TripStatus::Completed);
    assert!(trip.completed_at.is_some());
    assert_eq!(trip.started_at, started_at);
    assert!(trip
        .route_points
        .iter()
        .all(|p| p.status == RoutePointStatus::Visited));
    assert_eq!(positions(&trip), vec![1, 2, 3]);
    assert_completion_invariant(&trip);
}

#[tokio::test]
async fn test_marking_visited_point_again_changes_nothing() {
    let fx = Fixture::new();
    fx.driver("d@example.com", "Diego").await;
    let a = fx.place("A").await;
    let b = fx.place("B").await;

    let trip = fx
        .lifecycle
        .create_trip_for_self("d@example.com", None, &[a.id, b.id])
        .await
        .unwrap();
    let point = trip.route_points[0].id;

    let first = fx
        .route_points
        .mark_visited_as_admin(trip.id, point)
        .await
        .unwrap();
    let second = fx
        .route_points
        .mark_visited_as_admin(trip.id, point)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(second.visited_count(), 1);
}

#[tokio::test]
async fn test_other_driver_cannot_mark_point() {
    let fx = Fixture::new();
    fx.driver("d1@example.com", "Uno").await;
    fx.driver("d2@example.com", "Dos").await;
    let a = fx.place("A").await;
    let b = fx.place("B").await;

    let trip = fx
        .lifecycle
        .create_trip_for_self("d1@example.com", None, &[a.id, b.id])
        .await
        .unwrap();

    let result = fx
        .route_points
        .mark_visited_as_driver(trip.id, trip.route_points[0].id, "d2@example.com")
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let unchanged = fx.lifecycle.get_trip(trip.id).await.unwrap();
    assert_eq!(unchanged, trip);
}

#[tokio::test]
async fn test_other_driver_cannot_read_trip() {
    let fx = Fixture::new();
    fx.driver("d1@example.com", "Uno").await;
    fx.driver("d2@example.com", "Dos").await;
    let a = fx.place("A").await;
    let b = fx.place("B").await;

    let trip = fx
        .lifecycle
        .create_trip_for_self("d1@example.com", None, &[a.id, b.id])
        .await
        .unwrap();

    assert!(fx
        .lifecycle
        .get_trip_for_driver(trip.id, "d1@example.com")
        .await
        .is_ok());
    assert!(matches!(
        fx.lifecycle.get_trip_for_driver(trip.id, "d2@example.com").await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_fewer_than_two_places_persists_nothing() {
    let fx = Fixture::new();
    let driver = fx.driver("d@example.com", "Diego").await;
    let a = fx.place("A").await;

    let result = fx
        .lifecycle
        .create_trip_as_admin(driver.id, Some("Corto"), &[a.id])
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(TripRepository::list_all(&fx.store).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_place_persists_nothing() {
    let fx = Fixture::new();
    let driver = fx.driver("d@example.com", "Diego").await;
    let a = fx.place("A").await;

    let result = fx
        .lifecycle
        .create_trip_as_admin(driver.id, None, &[a.id, Uuid::new_v4()])
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(TripRepository::list_all(&fx.store).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_inactive_driver_cannot_get_trips() {
    let fx = Fixture::new();
    let driver = fx.driver("d@example.com", "Diego").await;
    let a = fx.place("A").await;
    let b = fx.place("B").await;
    DriverRepository::set_active(&fx.store, driver.id, false)
        .await
        .unwrap();

    let as_admin = fx
        .lifecycle
        .create_trip_as_admin(driver.id, None, &[a.id, b.id])
        .await;
    assert!(matches!(as_admin, Err(AppError::Precondition(_))));

    let for_self = fx
        .lifecycle
        .create_trip_for_self("d@example.com", None, &[a.id, b.id])
        .await;
    assert!(matches!(for_self, Err(AppError::Precondition(_))));
}

#[tokio::test]
async fn test_unknown_driver_is_not_found() {
    let fx = Fixture::new();
    let a = fx.place("A").await;
    let b = fx.place("B").await;

    let result = fx
        .lifecycle
        .create_trip_as_admin(Uuid::new_v4(), None, &[a.id, b.id])
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let result = fx.lifecycle.list_trips_for_driver("nadie@example.com").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_point_from_another_trip_is_rejected() {
    let fx = Fixture::new();
    let driver = fx.driver("d@example.com", "Diego").await;
    let a = fx.place("A").await;
    let b = fx.place("B").await;

    let first = fx
        .lifecycle
        .create_trip_as_admin(driver.id, None, &[a.id, b.id])
        .await
        .unwrap();
    let second = fx
        .lifecycle
        .create_trip_as_admin(driver.id, None, &[b.id, a.id])
        .await
        .unwrap();

    let result = fx
        .route_points
        .mark_visited_as_admin(first.id, second.route_points[0].id)
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let untouched = fx.lifecycle.get_trip(second.id).await.unwrap();
    assert_eq!(untouched.visited_count(), 0);
}

#[tokio::test]
async fn test_missing_trip_or_point_is_not_found() {
    let fx = Fixture::new();
    let driver = fx.driver("d@example.com", "Diego").await;
    let a = fx.place("A").await;
    let b = fx.place("B").await;
    let trip = fx
        .lifecycle
        .create_trip_as_admin(driver.id, None, &[a.id, b.id])
        .await
        .unwrap();

    assert!(matches!(
        fx.route_points
            .mark_visited_as_admin(Uuid::new_v4(), trip.route_points[0].id)
            .await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        fx.route_points
            .mark_visited_as_admin(trip.id, Uuid::new_v4())
            .await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        fx.lifecycle.start_trip(Uuid::new_v4()).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_start_trip_forces_in_progress() {
    let fx = Fixture::new();
    let driver = fx.driver("d@example.com", "Diego").await;
    let a = fx.place("A").await;
    let b = fx.place("B").await;
    let trip = fx
        .lifecycle
        .create_trip_as_admin(driver.id, None, &[a.id, b.id])
        .await
        .unwrap();

    let started = fx.lifecycle.start_trip(trip.id).await.unwrap();
    assert_eq!(started.status, TripStatus::InProgress);
    let first_start = started.started_at.unwrap();

    let restarted = fx.lifecycle.start_trip(trip.id).await.unwrap();
    assert_eq!(restarted.status, TripStatus::InProgress);
    assert!(restarted.started_at.unwrap() >= first_start);

    // La primera visita ya no toca la fecha de inicio
    let visited = fx
        .route_points
        .mark_visited_as_admin(trip.id, trip.route_points[0].id)
        .await
        .unwrap();
    assert_eq!(visited.started_at, restarted.started_at);
}

#[tokio::test]
async fn test_start_trip_keeps_completed_trip_instead_of_overwriting() {
    let fx = Fixture::new();
    let driver = fx.driver("d@example.com", "Diego").await;
    let a = fx.place("A").await;
    let b = fx.place("B").await;
    let trip = fx
        .lifecycle
        .create_trip_as_admin(driver.id, None, &[a.id, b.id])
        .await
        .unwrap();

    for point in &trip.route_points {
        fx.route_points
            .mark_visited_as_admin(trip.id, point.id)
            .await
            .unwrap();
    }
    let completed = fx.lifecycle.get_trip(trip.id).await.unwrap();
    assert_eq!(completed.status, TripStatus::Completed);

    let after = fx.lifecycle.start_trip(trip.id).await.unwrap();
    assert_eq!(after, completed);
    assert_completion_invariant(&after);
}

#[tokio::test]
async fn test_driver_lists_only_own_trips_newest_first() {
    let fx = Fixture::new();
    let d1 = fx.driver("d1@example.com", "Uno").await;
    let d2 = fx.driver("d2@example.com", "Dos").await;
    let a = fx.place("A").await;
    let b = fx.place("B").await;

    let older = fx
        .lifecycle
        .create_trip_as_admin(d1.id, Some("Primero"), &[a.id, b.id])
        .await
        .unwrap();
    fx.lifecycle
        .create_trip_as_admin(d2.id, Some("Ajeno"), &[a.id, b.id])
        .await
        .unwrap();
    let newer = fx
        .lifecycle
        .create_trip_as_admin(d1.id, Some("Segundo"), &[b.id, a.id])
        .await
        .unwrap();

    let mine = fx
        .lifecycle
        .list_trips_for_driver("d1@example.com")
        .await
        .unwrap();
    let ids: Vec<Uuid> = mine.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);

    assert_eq!(fx.lifecycle.list_all_trips().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_deactivated_place_keeps_existing_route() {
    use trip_management::repositories::PlaceRepository;

    let fx = Fixture::new();
    let driver = fx.driver("d@example.com", "Diego").await;
    let a = fx.place("A").await;
    let b = fx.place("B").await;
    let trip = fx
        .lifecycle
        .create_trip_as_admin(driver.id, None, &[a.id, b.id])
        .await
        .unwrap();

    PlaceRepository::set_active(&fx.store, a.id, false)
        .await
        .unwrap();

    let reloaded = fx.lifecycle.get_trip(trip.id).await.unwrap();
    assert_eq!(reloaded.route_points[0].place_id, a.id);
    assert_eq!(reloaded.route_points[0].place_name, "A");
    assert!(PlaceRepository::list_active(&fx.store)
        .await
        .unwrap()
        .iter()
        .all(|p| p.id != a.id));
}

#[tokio::test]
async fn test_dashboard_over_mixed_trips() {
    let fx = Fixture::new();
    let d1 = fx.driver("d1@example.com", "Uno").await;
    let d2 = fx.driver("d2@example.com", "Dos").await;
    let a = fx.place("A").await;
    let b = fx.place("B").await;

    let mut trips = Vec::new();
    for i in 0..10 {
        let driver = if i < 6 { d1.id } else { d2.id };
        trips.push(
            fx.lifecycle
                .create_trip_as_admin(driver, None, &[a.id, b.id])
                .await
                .unwrap(),
        );
    }

    // 4 PLANNED, 3 IN_PROGRESS, 3 COMPLETED
    for trip in &trips[4..7] {
        fx.route_points
            .mark_visited_as_admin(trip.id, trip.route_points[0].id)
            .await
            .unwrap();
    }
    for trip in &trips[7..10] {
        for point in &trip.route_points {
            fx.route_points
                .mark_visited_as_admin(trip.id, point.id)
                .await
                .unwrap();
        }
    }

    let summary = fx.dashboard.build_summary().await.unwrap();

    assert_eq!(summary.total_trips, 10);
    assert_eq!(summary.total_planned, 4);
    assert_eq!(summary.total_in_progress, 3);
    assert_eq!(summary.total_completed, 3);
    assert_eq!(summary.in_progress_trips.len(), 3);
    assert_eq!(summary.recent_completed_trips.len(), 3);
    assert!(summary
        .recent_completed_trips
        .iter()
        .all(|t| t.visited_points == t.total_points));

    let per_driver = &summary.trips_per_driver_last_30_days;
    assert_eq!(per_driver.len(), 2);
    assert_eq!(per_driver.iter().map(|d| d.trip_count).sum::<u64>(), 10);
    assert_eq!(per_driver[0].driver_name, "Uno");
    assert_eq!(per_driver[0].trip_count, 6);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_visits_complete_trip_once() {
    let fx = Arc::new(Fixture::new());
    let driver = fx.driver("d@example.com", "Diego").await;
    let a = fx.place("A").await;
    let b = fx.place("B").await;

    for _ in 0..20 {
        let trip = fx
            .lifecycle
            .create_trip_as_admin(driver.id, None, &[a.id, b.id])
            .await
            .unwrap();
        let trip_id = trip.id;
        let first = trip.route_points[0].id;
        let second = trip.route_points[1].id;

        // El segundo punto llega dos veces a la vez
        let handles: Vec<_> = [first, second, second]
            .into_iter()
            .map(|point_id| {
                let fx = Arc::clone(&fx);
                tokio::spawn(async move {
                    fx.route_points.mark_visited_as_admin(trip_id, point_id).await
                })
            })
            .collect();

        for handle in handles {
            let visited = handle.await.unwrap().unwrap();
            assert_completion_invariant(&visited);
        }

        let done = fx.lifecycle.get_trip(trip_id).await.unwrap();
        assert_eq!(done.status, TripStatus::Completed);
        assert!(done.started_at.is_some());
        assert!(done.completed_at.is_some());
        assert!(done.started_at <= done.completed_at);
        assert_eq!(done.visited_count(), 2);
    }
}
