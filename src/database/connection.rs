//! Conexión a PostgreSQL
//!
//! Crea el pool y asegura que las tablas existan antes de servir requests.

use anyhow::Result;
use sqlx::{Executor, PgPool};
use tracing::info;

use crate::config::database::{mask_database_url, DatabaseConfig};

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS vehicles (
        id UUID PRIMARY KEY,
        plate TEXT NOT NULL UNIQUE,
        model TEXT NOT NULL,
        brand TEXT NOT NULL,
        year INTEGER NOT NULL,
        status TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        version BIGINT NOT NULL DEFAULT 1
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS drivers (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        license_number TEXT NOT NULL UNIQUE,
        status TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        version BIGINT NOT NULL DEFAULT 1
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS routes (
        id UUID PRIMARY KEY,
        start_location TEXT NOT NULL,
        end_location TEXT NOT NULL,
        distance DOUBLE PRECISION NOT NULL CHECK (distance >= 0),
        estimated_duration DOUBLE PRECISION NOT NULL CHECK (estimated_duration >= 0),
        status TEXT NOT NULL,
        vehicle_id UUID,
        driver_id UUID,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        version BIGINT NOT NULL DEFAULT 1
    )
    "#,
];

/// Conexión a la base de datos
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("🔌 Conectando a {}", mask_database_url(&config.url));
        let pool = config.create_pool().await?;
        ensure_schema(&pool).await?;
        info!("✅ Base de datos lista");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Crear las tablas si no existen (idempotente)
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        pool.execute(statement).await?;
    }
    Ok(())
}
