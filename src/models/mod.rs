//! Modelos del sistema
//!
//! Este módulo contiene los modelos de dominio: rutas, vehículos,
//! conductores y el registro de auditoría que comparten.

pub mod audit;
pub mod auth;
pub mod driver;
pub mod route;
pub mod vehicle;

pub use audit::{AuditRecord, Entity};
pub use driver::{Driver, DriverPatch, DriverStatus};
pub use route::{NewRoute, Route, RoutePatch, RouteStatus};
pub use vehicle::{Vehicle, VehiclePatch, VehicleStatus};
