//! Estado compartido de la aplicación
//!
//! Este módulo define el estado que se pasa a través del router de Axum:
//! la configuración y los servicios construidos sobre los repositorios.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::controllers::{DriverController, VehicleController};
use crate::models::{Driver, Route, Vehicle};
use crate::repositories::{
    InMemoryRepository, PgCascadeWriter, PgDriverRepository, PgRouteRepository, PgVehicleRepository,
    Repository,
};
use crate::services::RouteLifecycleService;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub lifecycle: RouteLifecycleService,
    pub vehicles: VehicleController,
    pub drivers: DriverController,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        routes: Arc<dyn Repository<Route>>,
        vehicles: Arc<dyn Repository<Vehicle>>,
        drivers: Arc<dyn Repository<Driver>>,
    ) -> Self {
        Self {
            config,
            lifecycle: RouteLifecycleService::new(routes, vehicles.clone(), drivers.clone()),
            vehicles: VehicleController::new(vehicles),
            drivers: DriverController::new(drivers),
        }
    }

    /// Almacenamiento volátil, para desarrollo y tests
    pub fn in_memory(config: EnvironmentConfig) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryRepository::<Route>::new()),
            Arc::new(InMemoryRepository::<Vehicle>::new()),
            Arc::new(InMemoryRepository::<Driver>::new()),
        )
    }

    /// Cancel/delete se escriben en una sola transacción
    pub fn postgres(config: EnvironmentConfig, pool: PgPool) -> Self {
        let mut state = Self::new(
            config,
            Arc::new(PgRouteRepository::new(pool.clone())),
            Arc::new(PgVehicleRepository::new(pool.clone())),
            Arc::new(PgDriverRepository::new(pool.clone())),
        );
        state.lifecycle = state
            .lifecycle
            .with_cascade(Arc::new(PgCascadeWriter::new(pool)));
        state
    }
}
