use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::dto::driver_dto::{CreateDriverRequest, UpdateDriverRequest};
use crate::dto::{ApiResponse, ListQuery};
use crate::models::{Driver, DriverStatus};
use crate::repositories::Repository;
use crate::services::activation_service;
use crate::utils::errors::{conflict_error, AppResult};

#[derive(Clone)]
pub struct DriverController {
    repository: Arc<dyn Repository<Driver>>,
}

impl DriverController {
    pub fn new(repository: Arc<dyn Repository<Driver>>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, request: CreateDriverRequest) -> AppResult<ApiResponse<Driver>> {
        request.validate()?;

        let license_number = request.license_number.trim().to_string();
        self.ensure_license_free(&license_number, None).await?;

        let driver = self
            .repository
            .create(Driver::new(
                request.name.trim().to_string(),
                license_number,
                request.status.unwrap_or(DriverStatus::Available),
            ))
            .await?;

        tracing::info!("Driver {} registered", driver.id);
        Ok(ApiResponse::success_with_message(
            driver,
            "Driver created successfully".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Driver> {
        self.repository.find_by_id(id).await
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<Vec<Driver>> {
        let status = query.status_filter::<DriverStatus>()?;
        let drivers = self.repository.find_all().await?;
        Ok(query.apply(drivers, &status))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateDriverRequest,
    ) -> AppResult<ApiResponse<Driver>> {
        request.validate()?;
        if let Some(license_number) = request.license_number.as_deref() {
            self.ensure_license_free(license_number.trim(), Some(id)).await?;
        }

        let driver = self.repository.update(id, request.into()).await?;

        Ok(ApiResponse::success_with_message(
            driver,
            "Driver updated successfully".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.delete(id).await?;
        tracing::info!("Driver {} deleted", id);
        Ok(())
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Driver> {
        activation_service::set_active(self.repository.as_ref(), id, active).await
    }

    async fn ensure_license_free(&self, license_number: &str, except: Option<Uuid>) -> AppResult<()> {
        let taken = self
            .repository
            .find_all()
            .await?
            .iter()
            .any(|d| d.license_number == license_number && Some(d.id) != except);

        if taken {
            return Err(conflict_error("Driver", "license number", license_number));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryRepository;
    use crate::utils::errors::AppError;

    fn request(name: &str, license: &str) -> CreateDriverRequest {
        CreateDriverRequest {
            name: name.to_string(),
            license_number: license.to_string(),
            status: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_duplicate_license() {
        let controller = DriverController::new(Arc::new(InMemoryRepository::new()));
        let driver = controller
            .create(request(" Maria Silva ", "12345678901"))
            .await
            .unwrap()
            .data
            .unwrap();
        assert_eq!(driver.name, "Maria Silva");
        assert_eq!(driver.status, DriverStatus::Available);

        let err = controller
            .create(request("João", "12345678901"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_invalid_license_is_validation_error() {
        let controller = DriverController::new(Arc::new(InMemoryRepository::new()));
        let err = controller
            .create(request("Maria", "123"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_deactivated_driver_hidden_from_list() {
        let controller = DriverController::new(Arc::new(InMemoryRepository::new()));
        let driver = controller
            .create(request("Maria", "12345678901"))
            .await
            .unwrap()
            .data
            .unwrap();
        controller.set_active(driver.id, false).await.unwrap();

        assert!(controller.list(&ListQuery::default()).await.unwrap().is_empty());
        let all = ListQuery {
            include_inactive: true,
            ..Default::default()
        };
        assert_eq!(controller.list(&all).await.unwrap().len(), 1);
    }
}
