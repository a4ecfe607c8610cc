//! Modelo de Route
//!
//! Este módulo contiene el struct Route, su estado y el patch de edición.
//! Las transiciones de estado viven en `services::route_status`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::audit::{AuditRecord, Entity};

/// Estado de la ruta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl RouteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStatus::Pending => "Pending",
            RouteStatus::InProgress => "InProgress",
            RouteStatus::Completed => "Completed",
            RouteStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(RouteStatus::Pending),
            "InProgress" => Ok(RouteStatus::InProgress),
            "Completed" => Ok(RouteStatus::Completed),
            "Cancelled" => Ok(RouteStatus::Cancelled),
            other => Err(format!("unknown route status '{}'", other)),
        }
    }
}

/// Route principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: Uuid,
    pub start_location: String,
    pub end_location: String,
    /// Kilómetros
    pub distance: f64,
    /// Minutos
    pub estimated_duration: f64,
    pub status: RouteStatus,
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    #[serde(flatten)]
    pub audit: AuditRecord,
}

/// Datos ya validados para crear una ruta
#[derive(Debug, Clone)]
pub struct NewRoute {
    pub start_location: String,
    pub end_location: String,
    pub distance: f64,
    pub estimated_duration: f64,
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
}

impl Route {
    /// Toda ruta nace en `Pending`
    pub fn new(input: NewRoute) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_location: input.start_location,
            end_location: input.end_location,
            distance: input.distance,
            estimated_duration: input.estimated_duration,
            status: RouteStatus::Pending,
            vehicle_id: input.vehicle_id,
            driver_id: input.driver_id,
            audit: AuditRecord::new(),
        }
    }

    pub fn with_status(self, status: RouteStatus) -> Self {
        Self { status, ..self }
    }
}

/// Edición parcial de los datos de trayecto (el estado no se edita aquí)
#[derive(Debug, Clone, Default)]
pub struct RoutePatch {
    pub start_location: Option<String>,
    pub end_location: Option<String>,
    pub distance: Option<f64>,
    pub estimated_duration: Option<f64>,
}

impl Entity for Route {
    const KIND: &'static str = "Route";
    type Patch = RoutePatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn audit(&self) -> &AuditRecord {
        &self.audit
    }

    fn with_audit(self, audit: AuditRecord) -> Self {
        Self { audit, ..self }
    }

    fn merged(self, patch: RoutePatch) -> Self {
        Self {
            start_location: patch.start_location.unwrap_or(self.start_location),
            end_location: patch.end_location.unwrap_or(self.end_location),
            distance: patch.distance.unwrap_or(self.distance),
            estimated_duration: patch.estimated_duration.unwrap_or(self.estimated_duration),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Route {
        Route::new(NewRoute {
            start_location: "Rua A, 100".to_string(),
            end_location: "Av. B, 200".to_string(),
            distance: 12.5,
            estimated_duration: 30.0,
            vehicle_id: None,
            driver_id: None,
        })
    }

    #[test]
    fn test_new_route_is_pending() {
        let route = sample();
        assert_eq!(route.status, RouteStatus::Pending);
        assert!(route.audit.is_active);
    }

    #[test]
    fn test_route_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["startLocation"], "Rua A, 100");
        assert_eq!(json["estimatedDuration"], 30.0);
        assert_eq!(json["status"], "Pending");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["version"], 1);
    }

    #[test]
    fn test_merge_only_present_fields() {
        let route = sample().merged(RoutePatch {
            distance: Some(20.0),
            ..Default::default()
        });
        assert_eq!(route.distance, 20.0);
        assert_eq!(route.start_location, "Rua A, 100");
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            RouteStatus::Pending,
            RouteStatus::InProgress,
            RouteStatus::Completed,
            RouteStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<RouteStatus>().unwrap(), status);
        }
        assert!("Paused".parse::<RouteStatus>().is_err());
    }
}
