//! Activación / desactivación (soft-delete) genérica

use uuid::Uuid;

use crate::models::audit::{self, Entity};
use crate::repositories::Repository;
use crate::utils::errors::AppResult;

/// Cambiar `isActive`. Si ya tiene el valor pedido no escribe nada.
pub async fn set_active<E: Entity>(repo: &dyn Repository<E>, id: Uuid, active: bool) -> AppResult<E> {
    let entity = repo.find_by_id(id).await?;
    if entity.is_active() == active {
        return Ok(entity);
    }

    tracing::info!("{} {} active = {}", E::KIND, id, active);
    repo.save(audit::set_active(entity, active)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Driver, DriverStatus};
    use crate::repositories::InMemoryRepository;

    #[tokio::test]
    async fn test_deactivate_then_activate() {
        let repo = InMemoryRepository::new();
        let driver = repo
            .create(Driver::new("Ana".into(), "12345678901".into(), DriverStatus::Available))
            .await
            .unwrap();

        let inactive = set_active(&repo, driver.id, false).await.unwrap();
        assert!(!inactive.audit.is_active);
        assert_eq!(inactive.audit.version, 2);

        // sin cambio: no escribe
        let same = set_active(&repo, driver.id, false).await.unwrap();
        assert_eq!(same.audit.version, 2);

        let active = set_active(&repo, driver.id, true).await.unwrap();
        assert!(active.audit.is_active);
    }
}
