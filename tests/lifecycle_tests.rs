mod common;

use common::{route_request, Fleet};
use fleet_routing::dto::route_dto::CreateRouteRequest;
use fleet_routing::dto::ListQuery;
use fleet_routing::models::{DriverStatus, RouteStatus, VehicleStatus};
use fleet_routing::repositories::Repository;
use fleet_routing::services::{LifecycleOutcome, RouteAction};
use fleet_routing::utils::errors::AppError;

#[tokio::test]
async fn test_cancel_releases_vehicle_and_driver() {
    let fleet = Fleet::new();
    let (route, vehicle, driver) = fleet.assigned_route().await;
    fleet.service.start_route(route.id).await.unwrap();

    let outcome = fleet.service.cancel_route(route.id).await.unwrap();

    assert!(outcome.is_applied());
    assert_eq!(outcome.route().status, RouteStatus::Cancelled);
    assert_eq!(
        fleet.vehicles.find_by_id(vehicle.id).await.unwrap().status,
        VehicleStatus::Available
    );
    assert_eq!(
        fleet.drivers.find_by_id(driver.id).await.unwrap().status,
        DriverStatus::Available
    );
}

#[tokio::test]
async fn test_cancel_completed_route_is_rejected() {
    let fleet = Fleet::new();
    let (route, vehicle, _) = fleet.assigned_route().await;
    fleet.service.start_route(route.id).await.unwrap();
    fleet.service.complete_route(route.id).await.unwrap();

    let outcome = fleet.service.cancel_route(route.id).await.unwrap();

    match outcome {
        LifecycleOutcome::Rejected { route, transition } => {
            assert_eq!(route.status, RouteStatus::Completed);
            assert_eq!(transition.from, RouteStatus::Completed);
            assert_eq!(transition.action, RouteAction::Cancel);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(fleet.vehicles.saves(), 0);
    assert_eq!(
        fleet.vehicles.find_by_id(vehicle.id).await.unwrap().status,
        VehicleStatus::Unavailable
    );
}

#[tokio::test]
async fn test_start_on_completed_route_keeps_status() {
    let fleet = Fleet::new();
    let route = fleet.service.create_route(route_request(None, None)).await.unwrap();
    fleet.service.start_route(route.id).await.unwrap();
    fleet.service.complete_route(route.id).await.unwrap();

    let outcome = fleet.service.start_route(route.id).await.unwrap();

    assert!(!outcome.is_applied());
    assert_eq!(
        fleet.routes.find_by_id(route.id).await.unwrap().status,
        RouteStatus::Completed
    );
}

#[tokio::test]
async fn test_create_with_empty_start_location_cites_field() {
    let fleet = Fleet::new();
    let request = CreateRouteRequest {
        start_location: Some(String::new()),
        ..route_request(None, None)
    };

    match fleet.service.create_route(request).await {
        Err(AppError::Validation(errors)) => {
            assert!(errors.field_errors().contains_key("startLocation"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(fleet.routes.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cancel_without_associations_writes_no_resources() {
    let fleet = Fleet::new();
    fleet.vehicle(VehicleStatus::Unavailable).await;
    let route = fleet.service.create_route(route_request(None, None)).await.unwrap();

    fleet.service.cancel_route(route.id).await.unwrap();
    fleet.service.create_route(route_request(None, None)).await.unwrap();

    assert_eq!(fleet.vehicles.saves(), 0);
    assert_eq!(fleet.drivers.saves(), 0);
}

#[tokio::test]
async fn test_already_available_resources_are_not_rewritten() {
    let fleet = Fleet::new();
    let vehicle = fleet.vehicle(VehicleStatus::Available).await;
    let driver = fleet.driver(DriverStatus::Available).await;
    let route = fleet
        .service
        .create_route(route_request(Some(vehicle.id), Some(driver.id)))
        .await
        .unwrap();

    fleet.service.cancel_route(route.id).await.unwrap();

    assert_eq!(fleet.vehicles.saves(), 0);
    assert_eq!(fleet.drivers.saves(), 0);
}

#[tokio::test]
async fn test_vehicle_failure_leaves_route_unchanged() {
    let fleet = Fleet::new();
    let (route, _, driver) = fleet.assigned_route().await;
    fleet.vehicles.fail_saves(true);

    let err = fleet.service.cancel_route(route.id).await.unwrap_err();

    match err {
        AppError::DependencyUpdateFailed { entity, .. } => assert_eq!(entity, "Vehicle"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fleet.routes.find_by_id(route.id).await.unwrap(), route);
    assert_eq!(
        fleet.drivers.find_by_id(driver.id).await.unwrap().status,
        DriverStatus::Unavailable
    );
}

#[tokio::test]
async fn test_vehicle_failure_during_delete_keeps_route() {
    let fleet = Fleet::new();
    let (route, _, _) = fleet.assigned_route().await;
    fleet.vehicles.fail_saves(true);

    assert!(fleet.service.delete_route(route.id).await.is_err());
    assert_eq!(fleet.routes.find_by_id(route.id).await.unwrap(), route);
}

#[tokio::test]
async fn test_driver_failure_restores_vehicle() {
    let fleet = Fleet::new();
    let (route, vehicle, _) = fleet.assigned_route().await;
    fleet.drivers.fail_saves(true);

    let err = fleet.service.cancel_route(route.id).await.unwrap_err();

    assert!(matches!(err, AppError::DependencyUpdateFailed { entity: "Driver", .. }));
    assert_eq!(
        fleet.vehicles.find_by_id(vehicle.id).await.unwrap().status,
        VehicleStatus::Unavailable
    );
    assert_eq!(fleet.routes.find_by_id(route.id).await.unwrap().status, RouteStatus::Pending);
}

#[tokio::test]
async fn test_route_save_failure_restores_both_resources() {
    let fleet = Fleet::new();
    let (route, vehicle, driver) = fleet.assigned_route().await;
    fleet.routes.fail_saves(true);

    assert!(fleet.service.cancel_route(route.id).await.is_err());

    assert_eq!(
        fleet.vehicles.find_by_id(vehicle.id).await.unwrap().status,
        VehicleStatus::Unavailable
    );
    assert_eq!(
        fleet.drivers.find_by_id(driver.id).await.unwrap().status,
        DriverStatus::Unavailable
    );
}

#[tokio::test]
async fn test_delete_releases_resources_and_removes_route() {
    let fleet = Fleet::new();
    let (route, vehicle, driver) = fleet.assigned_route().await;

    let deleted = fleet.service.delete_route(route.id).await.unwrap();

    assert_eq!(deleted.id, route.id);
    assert!(matches!(
        fleet.routes.find_by_id(route.id).await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(
        fleet.vehicles.find_by_id(vehicle.id).await.unwrap().status,
        VehicleStatus::Available
    );
    assert_eq!(
        fleet.drivers.find_by_id(driver.id).await.unwrap().status,
        DriverStatus::Available
    );
}

#[tokio::test]
async fn test_failed_route_delete_restores_resources() {
    let fleet = Fleet::new();
    let (route, vehicle, _) = fleet.assigned_route().await;
    fleet.routes.fail_deletes(true);

    assert!(fleet.service.delete_route(route.id).await.is_err());

    assert!(fleet.routes.find_by_id(route.id).await.is_ok());
    assert_eq!(
        fleet.vehicles.find_by_id(vehicle.id).await.unwrap().status,
        VehicleStatus::Unavailable
    );
}

#[tokio::test]
async fn test_concurrent_cancels_release_once() {
    let fleet = Fleet::new();
    let (route, _, _) = fleet.assigned_route().await;
    let first = fleet.service.clone();
    let second = fleet.service.clone();

    let (a, b) = tokio::join!(first.cancel_route(route.id), second.cancel_route(route.id));
    let applied = [a.unwrap(), b.unwrap()]
        .iter()
        .filter(|outcome| outcome.is_applied())
        .count();

    assert_eq!(applied, 1);
    assert_eq!(fleet.vehicles.saves(), 1);
    assert_eq!(fleet.drivers.saves(), 1);
}

#[tokio::test]
async fn test_concurrent_deletes_remove_once() {
    let fleet = Fleet::new();
    let (route, _, _) = fleet.assigned_route().await;
    let first = fleet.service.clone();
    let second = fleet.service.clone();

    let (a, b) = tokio::join!(first.delete_route(route.id), second.delete_route(route.id));

    assert_eq!([&a, &b].iter().filter(|r| r.is_ok()).count(), 1);
    assert!([a, b].into_iter().any(|r| matches!(r, Err(AppError::NotFound(_)))));
    assert_eq!(fleet.vehicles.saves(), 1);
}

#[tokio::test]
async fn test_status_filter_keeps_creation_order() {
    let fleet = Fleet::new();
    let first = fleet.service.create_route(route_request(None, None)).await.unwrap();
    let middle = fleet.service.create_route(route_request(None, None)).await.unwrap();
    let last = fleet.service.create_route(route_request(None, None)).await.unwrap();
    fleet.service.start_route(first.id).await.unwrap();
    fleet.service.start_route(last.id).await.unwrap();

    let query = ListQuery {
        status: Some("InProgress".to_string()),
        ..Default::default()
    };
    let in_progress = fleet.service.list_routes(&query).await.unwrap();

    let ids: Vec<_> = in_progress.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![first.id, last.id]);
    assert!(!ids.contains(&middle.id));
}

#[tokio::test]
async fn test_search_matches_locations_case_insensitively() {
    let fleet = Fleet::new();
    fleet.service.create_route(route_request(None, None)).await.unwrap();

    let query = ListQuery {
        search: Some("PAULISTA".to_string()),
        ..Default::default()
    };
    assert_eq!(fleet.service.list_routes(&query).await.unwrap().len(), 1);

    let query = ListQuery {
        search: Some("Copacabana".to_string()),
        ..Default::default()
    };
    assert!(fleet.service.list_routes(&query).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cancel_pending_route_frees_vehicle_and_driver() {
    let fleet = Fleet::new();
    let (route, vehicle, driver) = fleet.assigned_route().await;

    let outcome = fleet.service.cancel_route(route.id).await.unwrap();

    assert_eq!(outcome.route().status, RouteStatus::Cancelled);
    assert_eq!(
        fleet.routes.find_by_id(route.id).await.unwrap().status,
        RouteStatus::Cancelled
    );
    assert_eq!(
        fleet.vehicles.find_by_id(vehicle.id).await.unwrap().status,
        VehicleStatus::Available
    );
    assert_eq!(
        fleet.drivers.find_by_id(driver.id).await.unwrap().status,
        DriverStatus::Available
    );
}

#[tokio::test]
async fn test_delete_without_associations_writes_no_resources() {
    let fleet = Fleet::new();
    let route = fleet.service.create_route(route_request(None, None)).await.unwrap();

    fleet.service.delete_route(route.id).await.unwrap();

    assert_eq!(fleet.vehicles.saves(), 0);
    assert_eq!(fleet.drivers.saves(), 0);
    assert!(fleet.routes.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_busy_vehicle_cannot_join_second_active_route() {
    let fleet = Fleet::new();
    let vehicle = fleet.vehicle(VehicleStatus::Unavailable).await;
    let first = fleet
        .service
        .create_route(route_request(Some(vehicle.id), None))
        .await
        .unwrap();
    fleet.service.start_route(first.id).await.unwrap();

    let second = fleet
        .service
        .create_route(route_request(Some(vehicle.id), None))
        .await;

    assert!(matches!(second, Err(AppError::Conflict(_))));
    assert_eq!(fleet.routes.find_all().await.unwrap().len(), 1);
    assert_eq!(
        fleet.vehicles.find_by_id(vehicle.id).await.unwrap().status,
        VehicleStatus::Unavailable
    );
}

#[tokio::test]
async fn test_busy_driver_cannot_join_second_active_route() {
    let fleet = Fleet::new();
    let (_, _, driver) = fleet.assigned_route().await;

    let second = fleet
        .service
        .create_route(route_request(None, Some(driver.id)))
        .await;

    assert!(matches!(second, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_busy_vehicle_is_reusable_after_route_finishes() {
    let fleet = Fleet::new();
    let (route, vehicle, _) = fleet.assigned_route().await;
    fleet.service.start_route(route.id).await.unwrap();
    fleet.service.complete_route(route.id).await.unwrap();

    let next = fleet
        .service
        .create_route(route_request(Some(vehicle.id), None))
        .await
        .unwrap();

    assert_eq!(next.status, RouteStatus::Pending);
}

#[tokio::test]
async fn test_deleting_finished_route_keeps_vehicle_of_newer_route() {
    let fleet = Fleet::new();
    let (old, vehicle, _) = fleet.assigned_route().await;
    fleet.service.start_route(old.id).await.unwrap();
    fleet.service.complete_route(old.id).await.unwrap();
    let newer = fleet
        .service
        .create_route(route_request(Some(vehicle.id), None))
        .await
        .unwrap();
    fleet.service.start_route(newer.id).await.unwrap();

    fleet.service.delete_route(old.id).await.unwrap();

    assert_eq!(fleet.vehicles.saves(), 0);
    assert_eq!(
        fleet.vehicles.find_by_id(vehicle.id).await.unwrap().status,
        VehicleStatus::Unavailable
    );
}

#[tokio::test]
async fn test_cancel_keeps_vehicle_shared_with_another_active_route() {
    let fleet = Fleet::new();
    // ambas rutas se crean con el vehículo libre, que después se ocupa
    let vehicle = fleet.vehicle(VehicleStatus::Available).await;
    let first = fleet
        .service
        .create_route(route_request(Some(vehicle.id), None))
        .await
        .unwrap();
    let second = fleet
        .service
        .create_route(route_request(Some(vehicle.id), None))
        .await
        .unwrap();
    fleet
        .vehicles
        .save(vehicle.clone().with_status(VehicleStatus::Unavailable))
        .await
        .unwrap();
    fleet.service.start_route(first.id).await.unwrap();

    let outcome = fleet.service.cancel_route(second.id).await.unwrap();

    assert_eq!(outcome.route().status, RouteStatus::Cancelled);
    assert_eq!(
        fleet.vehicles.find_by_id(vehicle.id).await.unwrap().status,
        VehicleStatus::Unavailable
    );
}
