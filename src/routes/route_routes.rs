use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::dto::route_dto::{CreateRouteRequest, UpdateRouteRequest};
use crate::dto::{ApiResponse, ListQuery};
use crate::middleware::require_admin;
use crate::models::auth::AuthenticatedUser;
use crate::models::Route;
use crate::services::LifecycleOutcome;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_route).get(list_routes))
        .route(
            "/:id",
            get(get_route).patch(update_route).delete(delete_route),
        )
        .route("/:id/start", post(start_route))
        .route("/:id/complete", post(complete_route))
        .route("/:id/cancel", post(cancel_route))
        .route("/:id/activate", post(activate_route))
        .route("/:id/deactivate", post(deactivate_route))
}

/// Transición aplicada: 200. Rechazada: 409 con la ruta sin cambios.
fn outcome_response(outcome: LifecycleOutcome, message: &str) -> Response {
    match outcome {
        LifecycleOutcome::Applied(route) => {
            Json(ApiResponse::success_with_message(route, message.to_string())).into_response()
        }
        LifecycleOutcome::Rejected { route, transition } => (
            StatusCode::CONFLICT,
            Json(ApiResponse::rejected(route, transition.to_string())),
        )
            .into_response(),
    }
}

async fn create_route(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateRouteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Route>>), AppError> {
    require_admin(&user)?;
    let route = state.lifecycle.create_route(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            route,
            "Route created successfully".to_string(),
        )),
    ))
}

async fn list_routes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Route>>>, AppError> {
    let routes = state.lifecycle.list_routes(&query).await?;
    Ok(Json(ApiResponse::success(routes)))
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    let route = state.lifecycle.get_route(id).await?;
    Ok(Json(ApiResponse::success(route)))
}

async fn update_route(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRouteRequest>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    require_admin(&user)?;
    let route = state.lifecycle.edit_route(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        route,
        "Route updated successfully".to_string(),
    )))
}

async fn start_route(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    require_admin(&user)?;
    let outcome = state.lifecycle.start_route(id).await?;
    Ok(outcome_response(outcome, "Route started"))
}

async fn complete_route(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    require_admin(&user)?;
    let outcome = state.lifecycle.complete_route(id).await?;
    Ok(outcome_response(outcome, "Route completed"))
}

async fn cancel_route(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    require_admin(&user)?;
    let outcome = state.lifecycle.cancel_route(id).await?;
    Ok(outcome_response(outcome, "Route cancelled"))
}

async fn activate_route(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    require_admin(&user)?;
    let route = state.lifecycle.set_route_active(id, true).await?;
    Ok(Json(ApiResponse::success(route)))
}

async fn deactivate_route(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    require_admin(&user)?;
    let route = state.lifecycle.set_route_active(id, false).await?;
    Ok(Json(ApiResponse::success(route)))
}

async fn delete_route(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    require_admin(&user)?;
    let route = state.lifecycle.delete_route(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        route,
        "Route deleted successfully".to_string(),
    )))
}
