//! Modelo de Driver

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::audit::{AuditRecord, Entity};

/// Disponibilidad del conductor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriverStatus {
    Available,
    Unavailable,
}

impl DriverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverStatus::Available => "Available",
            DriverStatus::Unavailable => "Unavailable",
        }
    }
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriverStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(DriverStatus::Available),
            "Unavailable" => Ok(DriverStatus::Unavailable),
            other => Err(format!("unknown driver status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub license_number: String,
    pub status: DriverStatus,
    #[serde(flatten)]
    pub audit: AuditRecord,
}

impl Driver {
    pub fn new(name: String, license_number: String, status: DriverStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            license_number,
            status,
            audit: AuditRecord::new(),
        }
    }

    pub fn with_status(self, status: DriverStatus) -> Self {
        Self { status, ..self }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DriverPatch {
    pub name: Option<String>,
    pub license_number: Option<String>,
    pub status: Option<DriverStatus>,
}

impl Entity for Driver {
    const KIND: &'static str = "Driver";
    type Patch = DriverPatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn audit(&self) -> &AuditRecord {
        &self.audit
    }

    fn with_audit(self, audit: AuditRecord) -> Self {
        Self { audit, ..self }
    }

    fn merged(self, patch: DriverPatch) -> Self {
        Self {
            name: patch.name.unwrap_or(self.name),
            license_number: patch.license_number.unwrap_or(self.license_number),
            status: patch.status.unwrap_or(self.status),
            ..self
        }
    }

    fn unique_keys(&self) -> Vec<(&'static str, &str)> {
        vec![("license number", self.license_number.as_str())]
    }
}
