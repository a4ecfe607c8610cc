use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::dto::driver_dto::{CreateDriverRequest, UpdateDriverRequest};
use crate::dto::{ApiResponse, ListQuery};
use crate::middleware::require_admin;
use crate::models::auth::AuthenticatedUser;
use crate::models::Driver;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_driver).get(list_drivers))
        .route(
            "/:id",
            get(get_driver).patch(update_driver).delete(delete_driver),
        )
        .route("/:id/activate", post(activate_driver))
        .route("/:id/deactivate", post(deactivate_driver))
}

async fn create_driver(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateDriverRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Driver>>), AppError> {
    require_admin(&user)?;
    let response = state.drivers.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_drivers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Driver>>>, AppError> {
    let drivers = state.drivers.list(&query).await?;
    Ok(Json(ApiResponse::success(drivers)))
}

async fn get_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    let driver = state.drivers.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(driver)))
}

async fn update_driver(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDriverRequest>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    require_admin(&user)?;
    let response = state.drivers.update(id, request).await?;
    Ok(Json(response))
}

async fn activate_driver(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    require_admin(&user)?;
    let driver = state.drivers.set_active(id, true).await?;
    Ok(Json(ApiResponse::success(driver)))
}

async fn deactivate_driver(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    require_admin(&user)?;
    let driver = state.drivers.set_active(id, false).await?;
    Ok(Json(ApiResponse::success(driver)))
}

async fn delete_driver(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&user)?;
    state.drivers.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Driver deleted successfully"
    })))
}
