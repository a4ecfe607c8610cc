use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::dto::{ApiResponse, ListQuery};
use crate::models::{Vehicle, VehicleStatus};
use crate::repositories::Repository;
use crate::services::activation_service;
use crate::utils::errors::{conflict_error, field_error, AppResult};
use crate::utils::validation::{normalize_plate, validate_vehicle_year};

#[derive(Clone)]
pub struct VehicleController {
    repository: Arc<dyn Repository<Vehicle>>,
}

impl VehicleController {
    pub fn new(repository: Arc<dyn Repository<Vehicle>>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> AppResult<ApiResponse<Vehicle>> {
        request.validate()?;
        validate_vehicle_year(request.year).map_err(|e| field_error("year", e))?;

        // La matrícula es única entre todos los vehículos, activos o no
        let plate = normalize_plate(&request.plate);
        self.ensure_plate_free(&plate, None).await?;

        let vehicle = self
            .repository
            .create(Vehicle::new(
                plate,
                request.model.trim().to_string(),
                request.brand.trim().to_string(),
                request.year,
                request.status.unwrap_or(VehicleStatus::Available),
            ))
            .await?;

        tracing::info!("Vehicle {} created ({})", vehicle.id, vehicle.plate);
        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehicle created successfully".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Vehicle> {
        self.repository.find_by_id(id).await
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<Vec<Vehicle>> {
        let status = query.status_filter::<VehicleStatus>()?;
        let vehicles = self.repository.find_all().await?;
        Ok(query.apply(vehicles, &status))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> AppResult<ApiResponse<Vehicle>> {
        request.validate()?;
        if let Some(year) = request.year {
            validate_vehicle_year(year).map_err(|e| field_error("year", e))?;
        }
        if let Some(plate) = request.plate.as_deref() {
            self.ensure_plate_free(&normalize_plate(plate), Some(id)).await?;
        }

        let vehicle = self.repository.update(id, request.into()).await?;

        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehicle updated successfully".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.delete(id).await?;
        tracing::info!("Vehicle {} deleted", id);
        Ok(())
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Vehicle> {
        activation_service::set_active(self.repository.as_ref(), id, active).await
    }

    async fn ensure_plate_free(&self, plate: &str, except: Option<Uuid>) -> AppResult<()> {
        let taken = self
            .repository
            .find_all()
            .await?
            .iter()
            .any(|v| v.plate == plate && Some(v.id) != except);

        if taken {
            return Err(conflict_error("Vehicle", "plate", plate));
        }
        Ok(())
    }
}
