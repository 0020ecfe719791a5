use axum::{
    extract::State,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::driver_controller::DriverController;
use crate::dto::api_response::ApiResponse;
use crate::dto::driver_dto::{DriverRequest, DriverResponse};
use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extractors::{ApiJson, ApiPath};

pub fn create_admin_driver_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_drivers).post(create_driver))
        .route("/active", get(list_active_drivers))
        .route("/:id", put(update_driver).delete(deactivate_driver))
        .route("/:id/activate", post(activate_driver))
        .route_layer(from_fn(admin_only_middleware))
        .route_layer(from_fn_with_state(state, auth_middleware))
}

async fn list_drivers(State(state): State<AppState>) -> Result<Json<Vec<DriverResponse>>, AppError> {
    let controller = DriverController::new(&state);
    Ok(Json(controller.list_all().await?))
}

async fn list_active_drivers(
    State(state): State<AppState>,
) -> Result<Json<Vec<DriverResponse>>, AppError> {
    let controller = DriverController::new(&state);
    Ok(Json(controller.list_active().await?))
}

async fn create_driver(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DriverRequest>,
) -> Result<Json<ApiResponse<DriverResponse>>, AppError> {
    let controller = DriverController::new(&state);
    Ok(Json(controller.create(request).await?))
}

async fn update_driver(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<DriverRequest>,
) -> Result<Json<ApiResponse<DriverResponse>>, AppError> {
    let controller = DriverController::new(&state);
    Ok(Json(controller.update(id, request).await?))
}

async fn deactivate_driver(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<DriverResponse>>, AppError> {
    let controller = DriverController::new(&state);
    Ok(Json(controller.set_active(id, false).await?))
}

async fn activate_driver(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<DriverResponse>>, AppError> {
    let controller = DriverController::new(&state);
    Ok(Json(controller.set_active(id, true).await?))
}
