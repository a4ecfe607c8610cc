//! DTOs de la API
//!
//! Requests de entrada (con validación) y el envoltorio de respuesta.

pub mod api_response;
pub mod driver_dto;
pub mod list_query;
pub mod route_dto;
pub mod vehicle_dto;

pub use api_response::ApiResponse;
pub use list_query::ListQuery;
