//! Cascada de liberación dentro de una transacción PostgreSQL
//!
//! La fila de la ruta se bloquea con `FOR UPDATE` antes de tocar vehículo y
//! conductor; si algo falla la transacción se descarta sin commit.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use super::cascade::{CascadeWriter, ReleaseCascade, Released, RouteMutation};
use super::driver_repository::update_driver_row;
use super::route_repository::{delete_route_row, update_route_row};
use super::vehicle_repository::update_vehicle_row;
use crate::models::{Driver, Entity, Route, Vehicle};
use crate::utils::errors::{dependency_error, not_found_error, stale_version_error, AppResult};

pub struct PgCascadeWriter {
    pool: PgPool,
}

impl PgCascadeWriter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Resultado de un UPDATE versionado de un recurso liberado
fn released_row<E: Entity>(written: AppResult<Option<E>>, after: &E) -> AppResult<E> {
    let id = after.id();
    match written {
        Ok(Some(saved)) => {
            info!("{} {} released", E::KIND, id);
            Ok(saved)
        }
        Ok(None) => Err(dependency_error(
            E::KIND,
            id,
            &stale_version_error(E::KIND, id, after.version()),
        )),
        Err(e) => Err(dependency_error(E::KIND, id, &e)),
    }
}

#[async_trait]
impl CascadeWriter for PgCascadeWriter {
    async fn apply(&self, cascade: ReleaseCascade) -> AppResult<Route> {
        let mut tx = self.pool.begin().await?;

        let route = cascade.route.route();
        let locked = sqlx::query_as::<_, (i64,)>("SELECT version FROM routes WHERE id = $1 FOR UPDATE")
            .bind(route.id)
            .fetch_optional(&mut *tx)
            .await?;

        match locked {
            None => return Err(not_found_error(Route::KIND, route.id)),
            Some((version,)) if version != route.audit.version => {
                return Err(stale_version_error(Route::KIND, route.id, route.audit.version));
            }
            Some(_) => {}
        }

        if let Some(Released { after, .. }) = &cascade.vehicle {
            released_row::<Vehicle>(update_vehicle_row(&mut *tx, after).await, after)?;
        }
        if let Some(Released { after, .. }) = &cascade.driver {
            released_row::<Driver>(update_driver_row(&mut *tx, after).await, after)?;
        }

        let result = match cascade.route {
            RouteMutation::Save(updated) => update_route_row(&mut *tx, &updated)
                .await?
                .ok_or_else(|| stale_version_error(Route::KIND, updated.id, updated.audit.version))?,
            RouteMutation::Delete(existing) => {
                delete_route_row(&mut *tx, existing.id).await?;
                existing
            }
        };

        tx.commit().await?;
        Ok(result)
    }
}
