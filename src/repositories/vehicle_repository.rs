use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::{map_write_error, missing_update_error, Repository};
use crate::models::{AuditRecord, Entity, Vehicle};
use crate::utils::errors::{not_found_error, AppError, AppResult};

#[derive(Debug, sqlx::FromRow)]
struct VehicleRow {
    id: Uuid,
    plate: String,
    model: String,
    brand: String,
    year: i32,
    status: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

impl TryFrom<VehicleRow> for Vehicle {
    type Error = AppError;

    fn try_from(row: VehicleRow) -> Result<Self, Self::Error> {
        Ok(Vehicle {
            id: row.id,
            plate: row.plate,
            model: row.model,
            brand: row.brand,
            year: row.year,
            status: row.status.parse().map_err(AppError::Internal)?,
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
pub(super) async fn update_vehicle_row<'e, X>(executor: X, vehicle: &Vehicle) -> AppResult<Option<Vehicle>>
where
    X: PgExecutor<'e>,
{
    sqlx::query_as::<_, VehicleRow>(
        r#"
        UPDATE vehicles
        SET plate = $3, model = $4, brand = $5, year = $6, status = $7, is_active = $8,
            updated_at = NOW(), version = version + 1
        WHERE id = $1 AND version = $2
        RETURNING *
        "#,
    )
    .bind(vehicle.id)
    .bind(vehicle.audit.version)
    .bind(&vehicle.plate)
    .bind(&vehicle.model)
    .bind(&vehicle.brand)
    .bind(vehicle.year)
    .bind(vehicle.status.as_str())
    .bind(vehicle.audit.is_active)
    .fetch_optional(executor)
    .await
    .map_err(|e| map_write_error(Vehicle::KIND, e))?
    .map(Vehicle::try_from)
    .transpose()
}

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Vehicle> for PgVehicleRepository {
    async fn create(&self, vehicle: Vehicle) -> AppResult<Vehicle> {
        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            INSERT INTO vehicles (id, plate, model, brand, year, status, is_active, created_at, updated_at, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.plate)
        .bind(&vehicle.model)
        .bind(&vehicle.brand)
        .bind(vehicle.year)
        .bind(vehicle.status.as_str())
        .bind(vehicle.audit.is_active)
        .bind(vehicle.audit.created_at)
        .bind(vehicle.audit.updated_at)
        .bind(vehicle.audit.version)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(Vehicle::KIND, e))?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Vehicle> {
        sqlx::query_as::<_, VehicleRow>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found_error(Vehicle::KIND, id))?
            .try_into()
    }

    async fn find_all(&self) -> AppResult<Vec<Vehicle>> {
        sqlx::query_as::<_, VehicleRow>("SELECT * FROM vehicles ORDER BY created_at ASC, id ASC")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Vehicle::try_from)
            .collect()
    }

    async fn save(&self, vehicle: Vehicle) -> AppResult<Vehicle> {
        match update_vehicle_row(&self.pool, &vehicle).await? {
            Some(saved) => Ok(saved),
            None => Err(missing_update_error(
                &self.pool,
                "vehicles",
                Vehicle::KIND,
                vehicle.id,
                vehicle.audit.version,
            )
            .await),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error(Vehicle::KIND, id));
        }
        Ok(())
    }
}
