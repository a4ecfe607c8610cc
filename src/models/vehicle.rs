//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle, su disponibilidad y el patch
//! para actualizaciones parciales.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::audit::{AuditRecord, Entity};

/// Disponibilidad del vehículo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleStatus {
    Available,
    Unavailable,
    InMaintenance,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "Available",
            VehicleStatus::Unavailable => "Unavailable",
            VehicleStatus::InMaintenance => "InMaintenance",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(VehicleStatus::Available),
            "Unavailable" => Ok(VehicleStatus::Unavailable),
            "InMaintenance" => Ok(VehicleStatus::InMaintenance),
            other => Err(format!("unknown vehicle status '{}'", other)),
        }
    }
}

/// Vehicle principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    /// Normalizada: mayúsculas, sin guion
    pub plate: String,
    pub model: String,
    pub brand: String,
    pub year: i32,
    pub status: VehicleStatus,
    #[serde(flatten)]
    pub audit: AuditRecord,
}

impl Vehicle {
    pub fn new(plate: String, model: String, brand: String, year: i32, status: VehicleStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            plate,
            model,
            brand,
            year,
            status,
            audit: AuditRecord::new(),
        }
    }

    pub fn with_status(self, status: VehicleStatus) -> Self {
        Self { status, ..self }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VehiclePatch {
    pub plate: Option<String>,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub year: Option<i32>,
    pub status: Option<VehicleStatus>,
}

impl Entity for Vehicle {
    const KIND: &'static str = "Vehicle";
    type Patch = VehiclePatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn audit(&self) -> &AuditRecord {
        &self.audit
    }

    fn with_audit(self, audit: AuditRecord) -> Self {
        Self { audit, ..self }
    }

    fn merged(self, patch: VehiclePatch) -> Self {
        Self {
            plate: patch.plate.unwrap_or(self.plate),
            model: patch.model.unwrap_or(self.model),
            brand: patch.brand.unwrap_or(self.brand),
            year: patch.year.unwrap_or(self.year),
            status: patch.status.unwrap_or(self.status),
            ..self
        }
    }

    fn unique_keys(&self) -> Vec<(&'static str, &str)> {
        vec![("plate", self.plate.as_str())]
    }
}
