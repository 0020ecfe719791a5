use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::trip::{RoutePoint, RoutePointStatus, Trip, TripStatus};

/// Request de autoservicio: el conductor sale del token
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTripRequest {
    #[validate(length(max = 200))]
    pub name: Option<String>,

    pub place_ids: Vec<Uuid>,
}

/// Request administrativo: el conductor se indica explícitamente
#[derive(Debug, Deserialize, Validate)]
pub struct AdminCreateTripRequest {
    #[validate(length(max = 200))]
    pub name: Option<String>,

    pub driver_id: Uuid,

    pub place_ids: Vec<Uuid>,
}

// Response de punto de ruta
#[derive(Debug, Serialize, Deserialize)]
pub struct RoutePointResponse {
    pub id: Uuid,
    pub position: i32,
    pub status: RoutePointStatus,
    pub place_id: Uuid,
    pub place_name: String,
    pub place_address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

// Response de viaje, con los puntos ordenados por posición
#[derive(Debug, Serialize, Deserialize)]
pub struct TripResponse {
    pub id: Uuid,
    pub name: String,
    pub status: TripStatus,
    pub driver_id: Uuid,
    pub driver_name: String,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub total_points: usize,
    pub visited_points: usize,
    pub route_points: Vec<RoutePointResponse>,
}

impl From<RoutePoint> for RoutePointResponse {
    fn from(point: RoutePoint) -> Self {
        Self {
            id: point.id,
            position: point.position,
            status: point.status,
            place_id: point.place_id,
            place_name: point.place_name,
            place_address: point.place_address,
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }
}

impl From<Trip> for TripResponse {
    fn from(mut trip: Trip) -> Self {
        trip.sort_route_points();
        let total_points = trip.route_points.len();
        let visited_points = trip.visited_count();

        Self {
            id: trip.id,
            name: trip.name,
            status: trip.status,
            driver_id: trip.driver_id,
            driver_name: trip.driver_name,
            created_at: trip.created_at,
            started_at: trip.started_at,
            completed_at: trip.completed_at,
            total_points,
            visited_points,
            route_points: trip.route_points.into_iter().map(Into::into).collect(),
        }
    }
}
