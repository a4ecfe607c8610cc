use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::{map_write_error, missing_update_error, Repository};
use crate::models::{AuditRecord, Driver, Entity};
use crate::utils::errors::{not_found_error, AppError, AppResult};

#[derive(Debug, sqlx::FromRow)]
struct DriverRow {
    id: Uuid,
    name: String,
    license_number: String,
    status: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

impl TryFrom<DriverRow> for Driver {
    type Error = AppError;

    fn try_from(row: DriverRow) -> Result<Self, Self::Error> {
        Ok(Driver {
            id: row.id,
            name: row.name,
            license_number: row.license_number,
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
pub(super) async fn update_driver_row<'e, X>(executor: X, driver: &Driver) -> AppResult<Option<Driver>>
where
    X: PgExecutor<'e>,
{
    sqlx::query_as::<_, DriverRow>(
        r#"
        UPDATE drivers
        SET name = $3, license_number = $4, status = $5, is_active = $6,
            updated_at = NOW(), version = version + 1
        WHERE id = $1 AND version = $2
        RETURNING *
        "#,
    )
    .bind(driver.id)
    .bind(driver.audit.version)
    .bind(&driver.name)
    .bind(&driver.license_number)
    .bind(driver.status.as_str())
    .bind(driver.audit.is_active)
    .fetch_optional(executor)
    .await
    .map_err(|e| map_write_error(Driver::KIND, e))?
    .map(Driver::try_from)
    .transpose()
}

pub struct PgDriverRepository {
    pool: PgPool,
}

impl PgDriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Driver> for PgDriverRepository {
    async fn create(&self, driver: Driver) -> AppResult<Driver> {
        let row = sqlx::query_as::<_, DriverRow>(
            r#"
            INSERT INTO drivers (id, name, license_number, status, is_active, created_at, updated_at, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(driver.id)
        .bind(&driver.name)
        .bind(&driver.license_number)
        .bind(driver.status.as_str())
        .bind(driver.audit.is_active)
        .bind(driver.audit.created_at)
        .bind(driver.audit.updated_at)
        .bind(driver.audit.version)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(Driver::KIND, e))?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Driver> {
        sqlx::query_as::<_, DriverRow>("SELECT * FROM drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found_error(Driver::KIND, id))?
            .try_into()
    }

    async fn find_all(&self) -> AppResult<Vec<Driver>> {
        sqlx::query_as::<_, DriverRow>("SELECT * FROM drivers ORDER BY created_at ASC, id ASC")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Driver::try_from)
            .collect()
    }

    async fn save(&self, driver: Driver) -> AppResult<Driver> {
        match update_driver_row(&self.pool, &driver).await? {
            Some(saved) => Ok(saved),
            None => Err(missing_update_error(
                &self.pool,
                "drivers",
                Driver::KIND,
                driver.id,
                driver.audit.version,
            )
            .await),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error(Driver::KIND, id));
        }
        Ok(())
    }
}
