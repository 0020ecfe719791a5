use axum::{
    extract::State,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::dashboard_controller::DashboardController;
use crate::controllers::trip_controller::TripController;
use crate::dto::api_response::ApiResponse;
use crate::dto::trip_dto::{AdminCreateTripRequest, CreateTripRequest, TripResponse};
use crate::middleware::auth::{admin_only_middleware, auth_middleware, AuthenticatedUser};
use crate::models::dashboard::DashboardSummary;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extractors::{ApiJson, ApiPath};

/// Rutas administrativas: sin comprobación de propietario
pub fn create_admin_trip_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_all_trips).post(create_trip_as_admin))
        .route("/dashboard", get(dashboard_summary))
        .route("/:id", get(get_trip))
        .route("/:id/start", post(start_trip))
        .route("/:id/points/:point_id/visit", post(mark_visited_as_admin))
        .route_layer(from_fn(admin_only_middleware))
        .route_layer(from_fn_with_state(state, auth_middleware))
}

/// Rutas del conductor: todo se resuelve contra el llamador
pub fn create_driver_trip_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_my_trips).post(create_my_trip))
        .route("/:id", get(get_my_trip))
        .route("/:id/start", post(start_trip))
        .route("/:id/points/:point_id/visit", post(mark_visited_as_driver))
        .route_layer(from_fn_with_state(state, auth_middleware))
}

async fn list_all_trips(State(state): State<AppState>) -> Result<Json<Vec<TripResponse>>, AppError> {
    let controller = TripController::new(&state);
    Ok(Json(controller.list_all().await?))
}

async fn create_trip_as_admin(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AdminCreateTripRequest>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let controller = TripController::new(&state);
    Ok(Json(controller.create_as_admin(request).await?))
}

async fn get_trip(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<TripResponse>, AppError> {
    let controller = TripController::new(&state);
    Ok(Json(controller.get_by_id(id).await?))
}

// Compartido por ambos routers; no comprueba propietario
async fn start_trip(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let controller = TripController::new(&state);
    Ok(Json(controller.start(id).await?))
}

async fn mark_visited_as_admin(
    State(state): State<AppState>,
    ApiPath((id, point_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let controller = TripController::new(&state);
    Ok(Json(controller.mark_visited(id, point_id, None).await?))
}

async fn dashboard_summary(State(state): State<AppState>) -> Result<Json<DashboardSummary>, AppError> {
    let controller = DashboardController::new(&state);
    Ok(Json(controller.summary().await?))
}

async fn list_my_trips(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<TripResponse>>, AppError> {
    let controller = TripController::new(&state);
    Ok(Json(controller.list_for_driver(&user.email).await?))
}

async fn create_my_trip(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateTripRequest>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let controller = TripController::new(&state);
    Ok(Json(controller.create_for_self(&user.email, request).await?))
}

async fn get_my_trip(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<TripResponse>, AppError> {
    let controller = TripController::new(&state);
    Ok(Json(controller.get_for_driver(id, &user.email).await?))
}

async fn mark_visited_as_driver(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath((id, point_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let controller = TripController::new(&state);
    Ok(Json(
        controller
            .mark_visited(id, point_id, Some(&user.email))
            .await?,
    ))
}
