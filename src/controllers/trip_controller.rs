use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::trip_dto::{AdminCreateTripRequest, CreateTripRequest, TripResponse};
use crate::models::trip::Trip;
use crate::services::{RoutePointService, TripLifecycleService};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct TripController {
    lifecycle: TripLifecycleService,
    route_points: RoutePointService,
}

impl TripController {
    pub fn new(state: &AppState) -> Self {
        Self {
            lifecycle: TripLifecycleService::new(
                state.drivers.clone(),
                state.places.clone(),
                state.trips.clone(),
            ),
            route_points: RoutePointService::new(state.drivers.clone(), state.trips.clone()),
        }
    }

    pub async fn create_for_self(
        &self,
        caller_email: &str,
        request: CreateTripRequest,
    ) -> Result<ApiResponse<TripResponse>, AppError> {
        request.validate()?;

        let trip = self
            .lifecycle
            .create_trip_for_self(caller_email, request.name.as_deref(), &request.place_ids)
            .await?;

        Ok(ApiResponse::success_with_message(
            trip.into(),
            "Viaje creado exitosamente".to_string(),
        ))
    }

    pub async fn create_as_admin(
        &self,
        request: AdminCreateTripRequest,
    ) -> Result<ApiResponse<TripResponse>, AppError> {
        request.validate()?;

        let trip = self
            .lifecycle
            .create_trip_as_admin(request.driver_id, request.name.as_deref(), &request.place_ids)
            .await?;

        Ok(ApiResponse::success_with_message(
            trip.into(),
            "Viaje creado exitosamente".to_string(),
        ))
    }

    pub async fn list_all(&self) -> Result<Vec<TripResponse>, AppError> {
        Ok(to_responses(self.lifecycle.list_all_trips().await?))
    }

    pub async fn list_for_driver(&self, caller_email: &str) -> Result<Vec<TripResponse>, AppError> {
        Ok(to_responses(
            self.lifecycle.list_trips_for_driver(caller_email).await?,
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<TripResponse, AppError> {
        Ok(self.lifecycle.get_trip(id).await?.into())
    }

    pub async fn get_for_driver(&self, id: Uuid, caller_email: &str) -> Result<TripResponse, AppError> {
        Ok(self.lifecycle.get_trip_for_driver(id, caller_email).await?.into())
    }

    pub async fn start(&self, id: Uuid) -> Result<ApiResponse<TripResponse>, AppError> {
        let trip = self.lifecycle.start_trip(id).await?;
        Ok(ApiResponse::success_with_message(
            trip.into(),
            "Viaje iniciado".to_string(),
        ))
    }

    pub async fn mark_visited(
        &self,
        trip_id: Uuid,
        point_id: Uuid,
        caller_email: Option<&str>,
    ) -> Result<ApiResponse<TripResponse>, AppError> {
        let trip = match caller_email {
            Some(email) => {
                self.route_points
                    .mark_visited_as_driver(trip_id, point_id, email)
                    .await?
            }
            None => {
                self.route_points
                    .mark_visited_as_admin(trip_id, point_id)
                    .await?
            }
        };

        Ok(ApiResponse::success(trip.into()))
    }
}

fn to_responses(trips: Vec<Trip>) -> Vec<TripResponse> {
    trips.into_iter().map(TripResponse::from).collect()
}
