use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::{map_write_error, missing_update_error, Repository};
use crate::models::{AuditRecord, Entity, Route};
use crate::utils::errors::{not_found_error, AppError, AppResult};

// Fila tal como vive en la tabla routes
#[derive(Debug, sqlx::FromRow)]
struct RouteRow {
    id: Uuid,
    start_location: String,
    end_location: String,
    distance: f64,
    estimated_duration: f64,
    status: String,
    vehicle_id: Option<Uuid>,
    driver_id: Option<Uuid>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

impl TryFrom<RouteRow> for Route {
    type Error = AppError;

    fn try_from(row: RouteRow) -> Result<Self, Self::Error> {
        Ok(Route {
            id: row.id,
            start_location: row.start_location,
            end_location: row.end_location,
            distance: row.distance,
            estimated_duration: row.estimated_duration,
            status: row.status.parse().map_err(AppError::Internal)?,
            vehicle_id: row.vehicle_id,
            driver_id: row.driver_id,
            audit: AuditRecord {
                is_active: row.is_active,
                created_at: row.created_at,
                updated_at: row.updated_at,
                version: row.version,
            },
        })
    }
}

/// UPDATE versionado; `None` si el id no existe o la versión cambió
pub(super) async fn update_route_row<'e, X>(executor: X, route: &Route) -> AppResult<Option<Route>>
where
    X: PgExecutor<'e>,
{
    sqlx::query_as::<_, RouteRow>(
        r#"
        UPDATE routes
        SET start_location = $3, end_location = $4, distance = $5, estimated_duration = $6,
            status = $7, vehicle_id = $8, driver_id = $9, is_active = $10,
            updated_at = NOW(), version = version + 1
        WHERE id = $1 AND version = $2
        RETURNING *
        "#,
    )
    .bind(route.id)
    .bind(route.audit.version)
    .bind(&route.start_location)
    .bind(&route.end_location)
    .bind(route.distance)
    .bind(route.estimated_duration)
    .bind(route.status.as_str())
    .bind(route.vehicle_id)
    .bind(route.driver_id)
    .bind(route.audit.is_active)
    .fetch_optional(executor)
    .await
    .map_err(|e| map_write_error(Route::KIND, e))?
    .map(Route::try_from)
    .transpose()
}

pub(super) async fn delete_route_row<'e, X>(executor: X, id: Uuid) -> AppResult<()>
where
    X: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM routes WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found_error(Route::KIND, id));
    }
    Ok(())
}

pub struct PgRouteRepository {
    pool: PgPool,
}

impl PgRouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Route> for PgRouteRepository {
    async fn create(&self, route: Route) -> AppResult<Route> {
        let row = sqlx::query_as::<_, RouteRow>(
            r#"
            INSERT INTO routes (id, start_location, end_location, distance, estimated_duration,
                                status, vehicle_id, driver_id, is_active, created_at, updated_at, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(route.id)
        .bind(&route.start_location)
        .bind(&route.end_location)
        .bind(route.distance)
        .bind(route.estimated_duration)
        .bind(route.status.as_str())
        .bind(route.vehicle_id)
        .bind(route.driver_id)
        .bind(route.audit.is_active)
        .bind(route.audit.created_at)
        .bind(route.audit.updated_at)
        .bind(route.audit.version)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(Route::KIND, e))?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Route> {
        sqlx::query_as::<_, RouteRow>("SELECT * FROM routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found_error(Route::KIND, id))?
            .try_into()
    }

    async fn find_all(&self) -> AppResult<Vec<Route>> {
        sqlx::query_as::<_, RouteRow>("SELECT * FROM routes ORDER BY created_at ASC, id ASC")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Route::try_from)
            .collect()
    }

    async fn save(&self, route: Route) -> AppResult<Route> {
        match update_route_row(&self.pool, &route).await? {
            Some(saved) => Ok(saved),
            None => Err(missing_update_error(
                &self.pool,
                "routes",
                Route::KIND,
                route.id,
                route.audit.version,
            )
            .await),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        delete_route_row(&self.pool, id).await
    }
}
