//! Modelos del dashboard
//!
//! Resumen calculado en cada llamada sobre toda la población de viajes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::trip::TripStatus;

/// Resumen para dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSummary {
    pub total_trips: u64,
    pub total_planned: u64,
    pub total_in_progress: u64,
    pub total_completed: u64,

    // Últimos viajes por estado (más recientes primero)
    pub in_progress_trips: Vec<DashboardTripItem>,
    pub recent_completed_trips: Vec<DashboardTripItem>,

    // Viajes creados en los últimos 30 días por conductor
    pub trips_per_driver_last_30_days: Vec<DriverTripCount>,
}

/// Viaje reducido para las listas del dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardTripItem {
    pub id: Uuid,
    pub name: String,
    pub driver_name: String,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub total_points: usize,
    pub visited_points: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriverTripCount {
    pub driver_id: Uuid,
    pub driver_name: String,
    pub trip_count: u64,
}
