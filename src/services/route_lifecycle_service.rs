//! Orquestador del ciclo de vida de rutas
//!
//! Coordina los cambios de estado de una ruta con la disponibilidad del
//! vehículo y del conductor asociados. Es el único que escribe efectos
//! cruzados entre entidades.
//!
//! Orden de escritura en cancel/delete: vehículo, conductor, ruta, todo a
//! través de un `CascadeWriter`. Si un paso falla la ruta no se modifica y
//! los recursos vuelven a su estado previo.
//!
//! Un vehículo o conductor no disponible pertenece como mucho a una ruta
//! `Pending`/`InProgress`.

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::dto::list_query::ListQuery;
use crate::dto::route_dto::{CreateRouteRequest, UpdateRouteRequest};
use crate::models::{Driver, DriverStatus, Entity, Route, RouteStatus, Vehicle, VehicleStatus};
use crate::repositories::{
    CascadeWriter, CompensatingWriter, ReleaseCascade, Released, Repository, RouteMutation,
};
use crate::services::route_locks::RouteLocks;
use crate::services::route_status::{InvalidTransition, RouteAction};
use crate::utils::errors::{dependency_error, AppError, AppResult};

/// Resultado de una acción de ciclo de vida
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleOutcome {
    Applied(Route),
    /// Transición no permitida: la ruta queda igual
    Rejected {
        route: Route,
        transition: InvalidTransition,
    },
}

impl LifecycleOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LifecycleOutcome::Applied(_))
    }

    pub fn route(&self) -> &Route {
        match self {
            LifecycleOutcome::Applied(route) => route,
            LifecycleOutcome::Rejected { route, .. } => route,
        }
    }

    pub fn into_route(self) -> Route {
        match self {
            LifecycleOutcome::Applied(route) => route,
            LifecycleOutcome::Rejected { route, .. } => route,
        }
    }
}

/// Recursos que una ruta ocupa y que se liberan al cancelarla o borrarla
pub trait Releasable: Entity {
    fn is_available(&self) -> bool;

    fn released(self) -> Self;
}

impl Releasable for Vehicle {
    fn is_available(&self) -> bool {
        self.status == VehicleStatus::Available
    }

    fn released(self) -> Self {
        self.with_status(VehicleStatus::Available)
    }
}

impl Releasable for Driver {
    fn is_available(&self) -> bool {
        self.status == DriverStatus::Available
    }

    fn released(self) -> Self {
        self.with_status(DriverStatus::Available)
    }
}

/// Rutas que todavía ocupan recursos (`Pending` o `InProgress`)
struct ActiveRoutes(Vec<Route>);

impl ActiveRoutes {
    /// Otra ruta activa que referencia el recurso
    fn claiming(&self, resource: Uuid, pick: fn(&Route) -> Option<Uuid>) -> Option<Uuid> {
        self.0
            .iter()
            .find(|route| pick(route) == Some(resource))
            .map(|route| route.id)
    }
}

fn vehicle_of(route: &Route) -> Option<Uuid> {
    route.vehicle_id
}

fn driver_of(route: &Route) -> Option<Uuid> {
    route.driver_id
}

/// Un recurso ocupado solo puede pertenecer a una ruta activa
fn ensure_unclaimed<E: Releasable>(
    resource: &E,
    active: &ActiveRoutes,
    pick: fn(&Route) -> Option<Uuid>,
) -> AppResult<()> {
    if resource.is_available() {
        return Ok(());
    }
    match active.claiming(resource.id(), pick) {
        Some(other) => Err(AppError::Conflict(format!(
            "{} '{}' is already in use by route '{}'",
            E::KIND,
            resource.id(),
            other
        ))),
        None => Ok(()),
    }
}

/// Leer el recurso y calcular su versión liberada, sin escribir
async fn prepare_release<E: Releasable>(
    repo: &dyn Repository<E>,
    id: Option<Uuid>,
    active: &ActiveRoutes,
    pick: fn(&Route) -> Option<Uuid>,
) -> AppResult<Option<Released<E>>> {
    let Some(id) = id else {
        return Ok(None);
    };

    let current = match repo.find_by_id(id).await {
        Ok(entity) => entity,
        Err(AppError::NotFound(_)) => {
            warn!("{} {} referenced by route no longer exists, nothing to release", E::KIND, id);
            return Ok(None);
        }
        Err(e) => return Err(dependency_error(E::KIND, id, &e)),
    };

    if current.is_available() {
        debug!("{} {} already available", E::KIND, id);
        return Ok(None);
    }

    if let Some(other) = active.claiming(id, pick) {
        info!("{} {} still in use by route {}, not released", E::KIND, id, other);
        return Ok(None);
    }

    let after = current.clone().released();
    Ok(Some(Released { before: current, after }))
}

#[derive(Clone)]
pub struct RouteLifecycleService {
    routes: Arc<dyn Repository<Route>>,
    vehicles: Arc<dyn Repository<Vehicle>>,
    drivers: Arc<dyn Repository<Driver>>,
    cascade: Arc<dyn CascadeWriter>,
    locks: RouteLocks,
}

impl RouteLifecycleService {
    pub fn new(
        routes: Arc<dyn Repository<Route>>,
        vehicles: Arc<dyn Repository<Vehicle>>,
        drivers: Arc<dyn Repository<Driver>>,
    ) -> Self {
        let cascade = Arc::new(CompensatingWriter::new(
            routes.clone(),
            vehicles.clone(),
            drivers.clone(),
        ));
        Self {
            routes,
            vehicles,
            drivers,
            cascade,
            locks: RouteLocks::new(),
        }
    }

    /// Reemplazar la escritura de cancel/delete (p. ej. transaccional)
    pub fn with_cascade(mut self, cascade: Arc<dyn CascadeWriter>) -> Self {
        self.cascade = cascade;
        self
    }

    /// Crear una ruta en `Pending`. No toca la disponibilidad de vehículo
    /// ni conductor; rechaza con `Conflict` un recurso ocupado que ya
    /// pertenece a otra ruta activa.
    #[tracing::instrument(skip(self, request))]
    pub async fn create_route(&self, request: CreateRouteRequest) -> AppResult<Route> {
        let new_route = request.into_new_route()?;

        let vehicle = match new_route.vehicle_id {
            Some(id) => Some(self.vehicles.find_by_id(id).await?),
            None => None,
        };
        let driver = match new_route.driver_id {
            Some(id) => Some(self.drivers.find_by_id(id).await?),
            None => None,
        };

        let occupied = vehicle.as_ref().is_some_and(|v| !v.is_available())
            || driver.as_ref().is_some_and(|d| !d.is_available());
        if occupied {
            let active = self.active_routes_except(None).await?;
            if let Some(vehicle) = &vehicle {
                ensure_unclaimed(vehicle, &active, vehicle_of)?;
            }
            if let Some(driver) = &driver {
                ensure_unclaimed(driver, &active, driver_of)?;
            }
        }

        let route = self.routes.create(Route::new(new_route)).await?;
        info!("Route {} created", route.id);
        Ok(route)
    }

    pub async fn get_route(&self, id: Uuid) -> AppResult<Route> {
        self.routes.find_by_id(id).await
    }

    pub async fn list_routes(&self, query: &ListQuery) -> AppResult<Vec<Route>> {
        let status = query.status_filter::<RouteStatus>()?;
        let routes = self.routes.find_all().await?;
        Ok(query.apply(routes, &status))
    }

    #[tracing::instrument(skip(self))]
    pub async fn start_route(&self, id: Uuid) -> AppResult<LifecycleOutcome> {
        self.transition(id, RouteAction::Start).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn complete_route(&self, id: Uuid) -> AppResult<LifecycleOutcome> {
        self.transition(id, RouteAction::Complete).await
    }

    /// Cancelar: libera vehículo y conductor y luego marca la ruta
    /// `Cancelled`. Desde un estado terminal no hace nada.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_route(&self, id: Uuid) -> AppResult<LifecycleOutcome> {
        let _guard = self.locks.acquire(id).await;
        let route = self.routes.find_by_id(id).await?;

        let next = match route.status.apply(RouteAction::Cancel) {
            Ok(next) => next,
            Err(transition) => {
                info!("Route {} not cancelled: {}", id, transition);
                return Ok(LifecycleOutcome::Rejected { route, transition });
            }
        };

        let cancelled = route.clone().with_status(next);
        let saved = self
            .release_then(&route, RouteMutation::Save(cancelled))
            .await?;
        info!("Route {} cancelled", id);
        Ok(LifecycleOutcome::Applied(saved))
    }

    /// Borrado físico: libera vehículo y conductor y luego elimina el
    /// registro. Devuelve la ruta eliminada.
    #[tracing::instrument(skip(self))]
    pub async fn delete_route(&self, id: Uuid) -> AppResult<Route> {
        let _guard = self.locks.acquire(id).await;
        let route = self.routes.find_by_id(id).await?;

        let deleted = self
            .release_then(&route, RouteMutation::Delete(route.clone()))
            .await?;
        info!("Route {} deleted", id);
        Ok(deleted)
    }

    /// Editar el trayecto de una ruta que todavía no terminó
    #[tracing::instrument(skip(self, request))]
    pub async fn edit_route(&self, id: Uuid, request: UpdateRouteRequest) -> AppResult<Route> {
        let patch = request.into_patch()?;
        let _guard = self.locks.acquire(id).await;
        let route = self.routes.find_by_id(id).await?;

        if route.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Route '{}' is {} and can no longer be edited",
                id, route.status
            )));
        }

        self.routes.save(route.merged(patch)).await
    }

    /// Soft-delete / reactivación. No libera recursos.
    pub async fn set_route_active(&self, id: Uuid, active: bool) -> AppResult<Route> {
        let _guard = self.locks.acquire(id).await;
        crate::services::activation_service::set_active(self.routes.as_ref(), id, active).await
    }

    async fn transition(&self, id: Uuid, action: RouteAction) -> AppResult<LifecycleOutcome> {
        let _guard = self.locks.acquire(id).await;
        let route = self.routes.find_by_id(id).await?;

        match route.status.apply(action) {
            Ok(next) => {
                let saved = self.routes.save(route.with_status(next)).await?;
                info!("Route {} is now {}", id, saved.status);
                Ok(LifecycleOutcome::Applied(saved))
            }
            Err(transition) => {
                info!("Route {} unchanged: {}", id, transition);
                Ok(LifecycleOutcome::Rejected { route, transition })
            }
        }
    }

    async fn active_routes_except(&self, exclude: Option<Uuid>) -> AppResult<ActiveRoutes> {
        let routes = self.routes.find_all().await?;
        Ok(ActiveRoutes(
            routes
                .into_iter()
                .filter(|route| Some(route.id) != exclude && route.status.is_active())
                .collect(),
        ))
    }

    /// Liberar vehículo, después conductor, después aplicar la mutación de
    /// la ruta. Un recurso que otra ruta activa sigue usando no se libera.
    async fn release_then(&self, route: &Route, mutation: RouteMutation) -> AppResult<Route> {
        let active = if route.vehicle_id.is_some() || route.driver_id.is_some() {
            self.active_routes_except(Some(route.id)).await?
        } else {
            ActiveRoutes(Vec::new())
        };

        let vehicle =
            prepare_release(self.vehicles.as_ref(), route.vehicle_id, &active, vehicle_of).await?;
        let driver =
            prepare_release(self.drivers.as_ref(), route.driver_id, &active, driver_of).await?;

        self.cascade
            .apply(ReleaseCascade {
                vehicle,
                driver,
                route: mutation,
            })
            .await
    }
}
