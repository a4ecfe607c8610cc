//! Escritura en cascada de cancel/delete
//!
//! Una cascada libera el vehículo, después el conductor y por último
//! guarda o borra la ruta. Cada backend decide cómo hacerla atómica: en
//! PostgreSQL una transacción, en memoria acciones compensatorias.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::Repository;
use crate::models::{Driver, Entity, Route, Vehicle};
use crate::utils::errors::{dependency_error, AppResult};

/// Recurso a liberar: valor leído y valor liberado todavía sin guardar
#[derive(Debug, Clone)]
pub struct Released<E> {
    pub before: E,
    pub after: E,
}

#[derive(Debug, Clone)]
pub enum RouteMutation {
    Save(Route),
    Delete(Route),
}

impl RouteMutation {
    pub fn route(&self) -> &Route {
        match self {
            RouteMutation::Save(route) | RouteMutation::Delete(route) => route,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReleaseCascade {
    pub vehicle: Option<Released<Vehicle>>,
    pub driver: Option<Released<Driver>>,
    pub route: RouteMutation,
}

#[async_trait]
pub trait CascadeWriter: Send + Sync {
    /// Todo o nada: si falla, ni la ruta ni sus recursos quedan modificados
    async fn apply(&self, cascade: ReleaseCascade) -> AppResult<Route>;
}

/// Escritura paso a paso sobre repositorios sin transacciones
pub struct CompensatingWriter {
    routes: Arc<dyn Repository<Route>>,
    vehicles: Arc<dyn Repository<Vehicle>>,
    drivers: Arc<dyn Repository<Driver>>,
}

impl CompensatingWriter {
    pub fn new(
        routes: Arc<dyn Repository<Route>>,
        vehicles: Arc<dyn Repository<Vehicle>>,
        drivers: Arc<dyn Repository<Driver>>,
    ) -> Self {
        Self {
            routes,
            vehicles,
            drivers,
        }
    }
}

// (valor previo, valor guardado)
type Written<E> = Option<(E, E)>;

async fn write_released<E: Entity>(
    repo: &dyn Repository<E>,
    released: Option<Released<E>>,
) -> AppResult<Written<E>> {
    let Some(Released { before, after }) = released else {
        return Ok(None);
    };

    let id = after.id();
    let saved = repo
        .save(after)
        .await
        .map_err(|e| dependency_error(E::KIND, id, &e))?;

    info!("{} {} released", E::KIND, id);
    Ok(Some((before, saved)))
}

async fn compensate<E: Entity>(repo: &dyn Repository<E>, written: Written<E>) {
    let Some((before, saved)) = written else {
        return;
    };

    let id = saved.id();
    match repo.save(before.with_audit(saved.audit().clone())).await {
        Ok(_) => warn!("{} {} restored after failed route update", E::KIND, id),
        Err(e) => error!("❌ Could not restore {} {}: {}", E::KIND, id, e),
    }
}

#[async_trait]
impl CascadeWriter for CompensatingWriter {
    async fn apply(&self, cascade: ReleaseCascade) -> AppResult<Route> {
        let ReleaseCascade {
            vehicle,
            driver,
            route,
        } = cascade;

        let vehicle = write_released(self.vehicles.as_ref(), vehicle).await?;

        let driver = match write_released(self.drivers.as_ref(), driver).await {
            Ok(driver) => driver,
            Err(e) => {
                compensate(self.vehicles.as_ref(), vehicle).await;
                return Err(e);
            }
        };

        let result = match route {
            RouteMutation::Save(updated) => self.routes.save(updated).await,
            RouteMutation::Delete(existing) => {
                self.routes.delete(existing.id).await.map(|_| existing)
            }
        };

        if result.is_err() {
            compensate(self.drivers.as_ref(), driver).await;
            compensate(self.vehicles.as_ref(), vehicle).await;
        }
        result
    }
}
