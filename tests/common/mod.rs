#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use fleet_routing::dto::route_dto::CreateRouteRequest;
use fleet_routing::models::{Driver, DriverStatus, Entity, Route, Vehicle, VehicleStatus};
use fleet_routing::repositories::{InMemoryRepository, Repository};
use fleet_routing::services::RouteLifecycleService;
use fleet_routing::utils::errors::{AppError, AppResult};

/// Repositorio en memoria que cuenta escrituras y puede fallar a pedido
pub struct FlakyRepository<E> {
    inner: InMemoryRepository<E>,
    fail_saves: AtomicBool,
    fail_deletes: AtomicBool,
    saves: AtomicUsize,
}

impl<E: Entity> FlakyRepository<E> {
    pub fn new(inner: InMemoryRepository<E>) -> Self {
        Self {
            inner,
            fail_saves: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Escrituras que llegaron a guardarse
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for FlakyRepository<E> {
    async fn create(&self, entity: E) -> AppResult<E> {
        self.inner.create(entity).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<E> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> AppResult<Vec<E>> {
        self.inner.find_all().await
    }

    async fn save(&self, entity: E) -> AppResult<E> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(AppError::Internal(format!("{} store unavailable", E::KIND)));
        }
        let saved = self.inner.save(entity).await?;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::Internal(format!("{} store unavailable", E::KIND)));
        }
        self.inner.delete(id).await
    }
}

pub struct Fleet {
    pub service: RouteLifecycleService,
    pub routes: Arc<FlakyRepository<Route>>,
    pub vehicles: Arc<FlakyRepository<Vehicle>>,
    pub drivers: Arc<FlakyRepository<Driver>>,
    // placas y licencias distintas en cada alta
    seq: AtomicUsize,
}

impl Fleet {
    pub fn new() -> Self {
        let routes = Arc::new(FlakyRepository::new(InMemoryRepository::new()));
        let vehicles = Arc::new(FlakyRepository::new(InMemoryRepository::new()));
        let drivers = Arc::new(FlakyRepository::new(InMemoryRepository::new()));
        let service = RouteLifecycleService::new(routes.clone(), vehicles.clone(), drivers.clone());
        Self {
            service,
            routes,
            vehicles,
            drivers,
            seq: AtomicUsize::new(0),
        }
    }

    fn next_seq(&self) -> usize {
        self.seq.fetch_add(1, Ordering::SeqCst)
    }

    pub async fn vehicle(&self, status: VehicleStatus) -> Vehicle {
        self.vehicles
            .create(Vehicle::new(
                format!("ABC{:04}", self.next_seq()),
                "Sprinter".into(),
                "Mercedes".into(),
                2021,
                status,
            ))
            .await
            .unwrap()
    }

    pub async fn driver(&self, status: DriverStatus) -> Driver {
        self.drivers
            .create(Driver::new(
                "Maria Silva".into(),
                format!("{:011}", self.next_seq()),
                status,
            ))
            .await
            .unwrap()
    }

    /// Ruta con vehículo y conductor ocupados
    pub async fn assigned_route(&self) -> (Route, Vehicle, Driver) {
        let vehicle = self.vehicle(VehicleStatus::Unavailable).await;
        let driver = self.driver(DriverStatus::Unavailable).await;
        let route = self
            .service
            .create_route(route_request(Some(vehicle.id), Some(driver.id)))
            .await
            .unwrap();
        (route, vehicle, driver)
    }
}

pub fn route_request(vehicle_id: Option<Uuid>, driver_id: Option<Uuid>) -> CreateRouteRequest {
    CreateRouteRequest {
        start_location: Some("Rua A, 100".to_string()),
        end_location: Some("Av. Paulista, 1578".to_string()),
        distance: Some(12.5),
        estimated_duration: Some(35.0),
        vehicle_id,
        driver_id,
    }
}
