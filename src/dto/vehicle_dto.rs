use serde::Deserialize;
use validator::Validate;

use crate::models::{VehiclePatch, VehicleStatus};
use crate::utils::validation::{normalize_plate, validate_license_plate};

// Request para crear un vehículo
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[validate(custom = "validate_license_plate")]
    pub plate: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(length(min = 1, max = 100))]
    pub brand: String,

    pub year: i32,

    pub status: Option<VehicleStatus>,
}

// Request para actualizar un vehículo (PATCH)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    #[validate(custom = "validate_license_plate")]
    pub plate: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub brand: Option<String>,

    pub year: Option<i32>,

    pub status: Option<VehicleStatus>,
}

impl From<UpdateVehicleRequest> for VehiclePatch {
    fn from(request: UpdateVehicleRequest) -> Self {
        Self {
            plate: request.plate.as_deref().map(normalize_plate),
            model: request.model.map(|m| m.trim().to_string()),
            brand: request.brand.map(|b| b.trim().to_string()),
            year: request.year,
            status: request.status,
        }
    }
}
