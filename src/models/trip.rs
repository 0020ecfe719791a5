//! Modelo de Trip y RoutePoint
//!
//! Un viaje es dueño de su secuencia ordenada de puntos de ruta. Cada
//! punto guarda el id de su viaje solo para validar pertenencia; no hay
//! referencia de vuelta al viaje.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del viaje - mapea al ENUM trip_status
///
/// El orden de las variantes es el orden del ciclo de vida.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[sqlx(type_name = "trip_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    Planned,
    InProgress,
    Completed,
}

/// Estado del punto de ruta - mapea al ENUM route_point_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "route_point_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoutePointStatus {
    Pending,
    Visited,
}

/// Punto de ruta con los datos del lugar referenciado ya resueltos
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct RoutePoint {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub position: i32,
    pub status: RoutePointStatus,
    pub place_id: Uuid,
    pub place_name: String,
    pub place_address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Trip principal con sus puntos ordenados por posición ascendente
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trip {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub driver_name: String,
    pub name: String,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub route_points: Vec<RoutePoint>,
}

impl Trip {
    pub fn visited_count(&self) -> usize {
        self.route_points
            .iter()
            .filter(|p| p.status == RoutePointStatus::Visited)
            .count()
    }

    pub fn all_visited(&self) -> bool {
        !self.route_points.is_empty() && self.visited_count() == self.route_points.len()
    }

    /// Reordena los puntos por posición; el orden de visita nunca afecta la presentación
    pub fn sort_route_points(&mut self) {
        self.route_points.sort_by_key(|p| p.position);
    }
}

/// Estado derivado de un viaje: status y marcas de tiempo asociadas
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct TripProgress {
    pub status: TripStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Fila de un viaje recién planificado, antes de persistirse
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub driver_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub stops: Vec<NewRoutePoint>,
}

#[derive(Debug, Clone)]
pub struct NewRoutePoint {
    pub place_id: Uuid,
    pub position: i32,
}
