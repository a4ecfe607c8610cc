use serde::Deserialize;
use validator::Validate;

use crate::models::{DriverPatch, DriverStatus};
use crate::utils::validation::validate_license_number;

// Request para registrar un conductor
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriverRequest {
    #[validate(length(min = 2, max = 120))]
    pub name: String,

    #[validate(custom = "validate_license_number")]
    pub license_number: String,

    pub status: Option<DriverStatus>,
}

// Request para actualizar un conductor (PATCH)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDriverRequest {
    #[validate(length(min = 2, max = 120))]
    pub name: Option<String>,

    #[validate(custom = "validate_license_number")]
    pub license_number: Option<String>,

    pub status: Option<DriverStatus>,
}

impl From<UpdateDriverRequest> for DriverPatch {
    fn from(request: UpdateDriverRequest) -> Self {
        Self {
            name: request.name.map(|n| n.trim().to_string()),
            license_number: request.license_number.map(|l| l.trim().to_string()),
            status: request.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_driver_validation() {
        let request = CreateDriverRequest {
            name: "Maria Silva".to_string(),
            license_number: "12345678901".to_string(),
            status: None,
        };
        assert!(request.validate().is_ok());

        let invalid = CreateDriverRequest {
            license_number: "123".to_string(),
            ..request
        };
        assert!(invalid.validate().is_err());
    }
}
