//! Services module
//!
//! Este módulo contiene la lógica de negocio: la máquina de estados de las
//! rutas, el orquestador del ciclo de vida y los filtros de listados.

pub mod activation_service;
pub mod filter_service;
pub mod route_lifecycle_service;
pub mod route_locks;
pub mod route_status;

pub use route_lifecycle_service::{LifecycleOutcome, RouteLifecycleService};
pub use route_status::{InvalidTransition, RouteAction};
