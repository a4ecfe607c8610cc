use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{NewRoute, RoutePatch};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{validate_measure, validate_not_empty};

// Request para crear una ruta. Los campos son opcionales para poder
// reportar todos los faltantes juntos en vez de fallar al deserializar.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRouteRequest {
    pub start_location: Option<String>,
    pub end_location: Option<String>,
    pub distance: Option<f64>,
    pub estimated_duration: Option<f64>,
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
}

// Request para editar el trayecto de una ruta
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRouteRequest {
    pub start_location: Option<String>,
    pub end_location: Option<String>,
    pub distance: Option<f64>,
    pub estimated_duration: Option<f64>,
}

fn required(errors: &mut ValidationErrors, field: &'static str) {
    errors.add(field, ValidationError::new("required"));
}

fn check_text(errors: &mut ValidationErrors, field: &'static str, value: Option<&String>, mandatory: bool) {
    match value {
        Some(text) => {
            if let Err(error) = validate_not_empty(text) {
                errors.add(field, error);
            }
        }
        None if mandatory => required(errors, field),
        None => {}
    }
}

fn check_measure(errors: &mut ValidationErrors, field: &'static str, value: Option<f64>, mandatory: bool) {
    match value {
        Some(measure) => {
            if let Err(error) = validate_measure(measure) {
                errors.add(field, error);
            }
        }
        None if mandatory => required(errors, field),
        None => {}
    }
}

impl Validate for CreateRouteRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_text(&mut errors, "startLocation", self.start_location.as_ref(), true);
        check_text(&mut errors, "endLocation", self.end_location.as_ref(), true);
        check_measure(&mut errors, "distance", self.distance, true);
        check_measure(&mut errors, "estimatedDuration", self.estimated_duration, true);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Validate for UpdateRouteRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_text(&mut errors, "startLocation", self.start_location.as_ref(), false);
        check_text(&mut errors, "endLocation", self.end_location.as_ref(), false);
        check_measure(&mut errors, "distance", self.distance, false);
        check_measure(&mut errors, "estimatedDuration", self.estimated_duration, false);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl CreateRouteRequest {
    /// Validar y convertir en los datos de una ruta nueva
    pub fn into_new_route(self) -> AppResult<NewRoute> {
        self.validate()?;

        match (self.start_location, self.end_location, self.distance, self.estimated_duration) {
            (Some(start), Some(end), Some(distance), Some(estimated_duration)) => Ok(NewRoute {
                start_location: start.trim().to_string(),
                end_location: end.trim().to_string(),
                distance,
                estimated_duration,
                vehicle_id: self.vehicle_id,
                driver_id: self.driver_id,
            }),
            _ => Err(AppError::Internal("validated route request is incomplete".to_string())),
        }
    }
}

impl UpdateRouteRequest {
    pub fn into_patch(self) -> AppResult<RoutePatch> {
        self.validate()?;

        Ok(RoutePatch {
            start_location: self.start_location.map(|s| s.trim().to_string()),
            end_location: self.end_location.map(|s| s.trim().to_string()),
            distance: self.distance,
            estimated_duration: self.estimated_duration,
        })
    }
}
