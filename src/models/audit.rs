//! Registro de auditoría compartido
//!
//! Cada entidad embebe un `AuditRecord` (timestamps, bandera de activación
//! y versión para control de concurrencia optimista) en lugar de heredar
//! de una clase base.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Se incrementa en cada escritura exitosa
    pub version: i64,
}

impl AuditRecord {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            is_active: true,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }
}

impl Default for AuditRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Marcar el registro como activo
pub fn activate(record: AuditRecord) -> AuditRecord {
    AuditRecord {
        is_active: true,
        ..record
    }
}

/// Soft-delete: el registro queda inactivo pero no se borra
pub fn deactivate(record: AuditRecord) -> AuditRecord {
    AuditRecord {
        is_active: false,
        ..record
    }
}

/// Registro tal como queda después de guardarse
pub fn touch(record: AuditRecord) -> AuditRecord {
    AuditRecord {
        updated_at: Utc::now(),
        version: record.version + 1,
        ..record
    }
}

/// Contrato común de Route, Vehicle y Driver para el almacenamiento
pub trait Entity: Clone + Send + Sync + 'static {
    /// Nombre usado en errores y logs
    const KIND: &'static str;

    /// Actualización parcial aceptada por `Repository::update`
    type Patch: Send + 'static;

    fn id(&self) -> Uuid;

    fn audit(&self) -> &AuditRecord;

    fn with_audit(self, audit: AuditRecord) -> Self;

    /// Aplicar sólo los campos presentes en el patch
    fn merged(self, patch: Self::Patch) -> Self;

    fn is_active(&self) -> bool {
        self.audit().is_active
    }

    fn version(&self) -> i64 {
        self.audit().version
    }

    /// Campos únicos entre todos los registros del tipo: (nombre, valor)
    fn unique_keys(&self) -> Vec<(&'static str, &str)> {
        Vec::new()
    }
}

/// Cambiar la bandera de activación de cualquier entidad
pub fn set_active<E: Entity>(entity: E, active: bool) -> E {
    let audit = entity.audit().clone();
    let audit = if active { activate(audit) } else { deactivate(audit) };
    entity.with_audit(audit)
}
