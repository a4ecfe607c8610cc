//! Locks por ruta
//!
//! Serializa las operaciones de ciclo de vida sobre un mismo id dentro del
//! proceso: un segundo `cancel` concurrente espera y luego observa la ruta
//! ya cancelada. Entre procesos la protección es el control de versión.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

type LockMap = HashMap<Uuid, Arc<AsyncMutex<()>>>;

#[derive(Clone, Default)]
pub struct RouteLocks {
    entries: Arc<Mutex<LockMap>>,
}

pub struct RouteLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    entries: Arc<Mutex<LockMap>>,
}

impl RouteLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, id: Uuid) -> RouteLockGuard {
        let entry = {
            let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            sweep_idle(&mut entries);
            Arc::clone(entries.entry(id).or_default())
        };

        let guard = entry.lock_owned().await;
        RouteLockGuard {
            guard: Some(guard),
            entries: Arc::clone(&self.entries),
        }
    }

    /// Cantidad de ids con lock registrado
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Quitar los ids que sólo el mapa referencia: nadie los tiene ni los espera.
/// También cubre esperas abandonadas (futuro de `acquire` descartado).
fn sweep_idle(entries: &mut LockMap) {
    entries.retain(|_, entry| Arc::strong_count(entry) > 1);
}

impl Drop for RouteLockGuard {
    fn drop(&mut self) {
        self.guard.take();

        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        sweep_idle(&mut entries);
    }
}
