//! Repositorios
//!
//! Abstracción mínima de persistencia (CRUD por id) para rutas, vehículos
//! y conductores, con una implementación en memoria y otra en PostgreSQL.

pub mod cascade;
pub mod cascade_repository;
pub mod driver_repository;
pub mod memory;
pub mod route_repository;
pub mod vehicle_repository;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Entity;
use crate::utils::errors::{not_found_error, stale_version_error, AppError, AppResult};

pub use cascade::{CascadeWriter, CompensatingWriter, ReleaseCascade, Released, RouteMutation};
pub use cascade_repository::PgCascadeWriter;
pub use driver_repository::PgDriverRepository;
pub use memory::InMemoryRepository;
pub use route_repository::PgRouteRepository;
pub use vehicle_repository::PgVehicleRepository;

#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn create(&self, entity: E) -> AppResult<E>;

    /// `NotFound` si el id no existe
    async fn find_by_id(&self, id: Uuid) -> AppResult<E>;

    /// Todos los registros, en orden de creación
    async fn find_all(&self) -> AppResult<Vec<E>>;

    /// Guardar con control de versión: la versión almacenada debe coincidir
    /// con la de `entity`, si no `Conflict`. Devuelve la entidad con la
    /// versión incrementada.
    async fn save(&self, entity: E) -> AppResult<E>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Merge parcial por id
    async fn update(&self, id: Uuid, patch: E::Patch) -> AppResult<E> {
        let current = self.find_by_id(id).await?;
        self.save(current.merged(patch)).await
    }
}

/// Traducir violaciones de unicidad a `Conflict`
pub(crate) fn map_write_error(kind: &str, err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(format!("{} violates a unique constraint", kind))
        }
        _ => AppError::Database(err),
    }
}

/// Un UPDATE versionado no devolvió filas: o no existe o la versión cambió
pub(crate) async fn missing_update_error(
    pool: &PgPool,
    table: &str,
    kind: &str,
    id: Uuid,
    expected: i64,
) -> AppError {
    let query = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", table);
    match sqlx::query_as::<_, (bool,)>(&query)
        .bind(id)
        .fetch_one(pool)
        .await
    {
        Ok((true,)) => stale_version_error(kind, id, expected),
        Ok((false,)) => not_found_error(kind, id),
        Err(e) => AppError::Database(e),
    }
}
