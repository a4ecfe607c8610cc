//! Repositorio en memoria
//!
//! Almacenamiento indexado por id (sin grafo de objetos compartidos):
//! cada lectura devuelve una copia y cada escritura reemplaza el valor.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Repository;
use crate::models::audit::{touch, Entity};
use crate::utils::errors::{conflict_error, not_found_error, stale_version_error, AppError, AppResult};

struct Table<E> {
    rows: HashMap<Uuid, E>,
    // orden de inserción para que find_all sea estable
    order: Vec<Uuid>,
}

pub struct InMemoryRepository<E> {
    table: Arc<RwLock<Table<E>>>,
}

impl<E> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(Table {
                rows: HashMap::new(),
                order: Vec::new(),
            })),
        }
    }
}

impl<E> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for InMemoryRepository<E> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

/// Unicidad comprobada bajo el lock de escritura, igual que un UNIQUE en la tabla
fn ensure_unique<E: Entity>(rows: &HashMap<Uuid, E>, entity: &E) -> AppResult<()> {
    for (field, value) in entity.unique_keys() {
        let taken = rows.values().any(|other| {
            other.id() != entity.id()
                && other
                    .unique_keys()
                    .iter()
                    .any(|(other_field, other_value)| *other_field == field && *other_value == value)
        });
        if taken {
            return Err(conflict_error(E::KIND, field, value));
        }
    }
    Ok(())
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn create(&self, entity: E) -> AppResult<E> {
        let mut table = self.table.write().await;
        let id = entity.id();
        if table.rows.contains_key(&id) {
            return Err(AppError::Conflict(format!("{} '{}' already exists", E::KIND, id)));
        }
        ensure_unique(&table.rows, &entity)?;
        table.rows.insert(id, entity.clone());
        table.order.push(id);
        Ok(entity)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<E> {
        self.table
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found_error(E::KIND, id))
    }

    async fn find_all(&self) -> AppResult<Vec<E>> {
        let table = self.table.read().await;
        Ok(table
            .order
            .iter()
            .filter_map(|id| table.rows.get(id).cloned())
            .collect())
    }

    async fn save(&self, entity: E) -> AppResult<E> {
        let mut table = self.table.write().await;
        let id = entity.id();
        let stored = table.rows.get(&id).ok_or_else(|| not_found_error(E::KIND, id))?;

        if stored.version() != entity.version() {
            return Err(stale_version_error(E::KIND, id, entity.version()));
        }
        ensure_unique(&table.rows, &entity)?;

        let audit = touch(entity.audit().clone());
        let saved = entity.with_audit(audit);
        table.rows.insert(id, saved.clone());
        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut table = self.table.write().await;
        if table.rows.remove(&id).is_none() {
            return Err(not_found_error(E::KIND, id));
        }
        table.order.retain(|existing| *existing != id);
        Ok(())
    }
}
