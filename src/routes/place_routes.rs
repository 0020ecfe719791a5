use axum::{
    extract::State,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::place_controller::PlaceController;
use crate::dto::api_response::ApiResponse;
use crate::dto::place_dto::{PlaceRequest, PlaceResponse};
use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extractors::{ApiJson, ApiPath};

pub fn create_admin_place_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_active_places).post(create_place))
        .route("/all", get(list_all_places))
        .route("/:id", put(update_place).delete(deactivate_place))
        .route("/:id/activate", post(activate_place))
        .route_layer(from_fn(admin_only_middleware))
        .route_layer(from_fn_with_state(state, auth_middleware))
}

/// Lista de selección para cualquier usuario autenticado
pub fn create_place_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_active_places))
        .route_layer(from_fn_with_state(state, auth_middleware))
}

async fn list_active_places(State(state): State<AppState>) -> Result<Json<Vec<PlaceResponse>>, AppError> {
    let controller = PlaceController::new(&state);
    Ok(Json(controller.list_active().await?))
}

async fn list_all_places(State(state): State<AppState>) -> Result<Json<Vec<PlaceResponse>>, AppError> {
    let controller = PlaceController::new(&state);
    Ok(Json(controller.list_all().await?))
}

async fn create_place(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PlaceRequest>,
) -> Result<Json<ApiResponse<PlaceResponse>>, AppError> {
    let controller = PlaceController::new(&state);
    Ok(Json(controller.create(request).await?))
}

async fn update_place(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<PlaceRequest>,
) -> Result<Json<ApiResponse<PlaceResponse>>, AppError> {
    let controller = PlaceController::new(&state);
    Ok(Json(controller.update(id, request).await?))
}

async fn deactivate_place(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<PlaceResponse>>, AppError> {
    let controller = PlaceController::new(&state);
    Ok(Json(controller.set_active(id, false).await?))
}

async fn activate_place(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<PlaceResponse>>, AppError> {
    let controller = PlaceController::new(&state);
    Ok(Json(controller.set_active(id, true).await?))
}
