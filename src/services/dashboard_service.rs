//! Panel de administración
//!
//! `summarize` es pura: recibe los viajes más recientes primero y el
//! instante de referencia, y produce el resumen completo.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::models::dashboard::{DashboardSummary, DashboardTripItem, DriverTripCount};
use crate::models::trip::{Trip, TripStatus};
use crate::repositories::TripRepository;
use crate::utils::errors::AppResult;

/// Máximo de viajes en cada lista del panel
pub const DASHBOARD_LIST_LIMIT: usize = 5;
/// Máximo de conductores en el ranking
pub const DRIVER_RANKING_LIMIT: usize = 8;
/// Ventana del ranking de conductores, en días
pub const DRIVER_RANKING_WINDOW_DAYS: i64 = 30;

pub struct DashboardService {
    trips: Arc<dyn TripRepository>,
}

impl DashboardService {
    pub fn new(trips: Arc<dyn TripRepository>) -> Self {
        Self { trips }
    }

    pub async fn build_summary(&self) -> AppResult<DashboardSummary> {
        let trips = self.trips.list_all().await?;
        debug!("📊 Resumen del panel sobre {} viajes", trips.len());
        Ok(summarize(&trips, Utc::now()))
    }
}

/// Construye el resumen a partir de viajes ordenados del más reciente al más antiguo
pub fn summarize(trips: &[Trip], now: DateTime<Utc>) -> DashboardSummary {
    let count = |status: TripStatus| trips.iter().filter(|t| t.status == status).count() as u64;

    let recent = |status: TripStatus| -> Vec<DashboardTripItem> {
        trips
            .iter()
            .filter(|t| t.status == status)
            .take(DASHBOARD_LIST_LIMIT)
            .map(DashboardTripItem::from)
            .collect()
    };

    DashboardSummary {
        total_trips: trips.len() as u64,
        total_planned: count(TripStatus::Planned),
        total_in_progress: count(TripStatus::InProgress),
        total_completed: count(TripStatus::Completed),
        in_progress_trips: recent(TripStatus::InProgress),
        recent_completed_trips: recent(TripStatus::Completed),
        trips_per_driver_last_30_days: rank_drivers(trips, now),
    }
}

/// Viajes por conductor en la ventana; empates en orden de aparición
fn rank_drivers(trips: &[Trip], now: DateTime<Utc>) -> Vec<DriverTripCount> {
    let since = now - Duration::days(DRIVER_RANKING_WINDOW_DAYS);

    let mut ranking: Vec<DriverTripCount> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for trip in trips.iter().filter(|t| t.created_at >= since) {
        match index.get(&trip.driver_id) {
            Some(&i) => ranking[i].trip_count += 1,
            None => {
                index.insert(trip.driver_id, ranking.len());
                ranking.push(DriverTripCount {
                    driver_id: trip.driver_id,
                    driver_name: trip.driver_name.clone(),
                    trip_count: 1,
                });
            }
        }
    }

    // sort_by es estable
    ranking.sort_by(|a, b| b.trip_count.cmp(&a.trip_count));
    ranking.truncate(DRIVER_RANKING_LIMIT);
    ranking
}

impl From<&Trip> for DashboardTripItem {
    fn from(trip: &Trip) -> Self {
        Self {
            id: trip.id,
            name: trip.name.clone(),
            driver_name: trip.driver_name.clone(),
            status: trip.status,
            created_at: trip.created_at,
            started_at: trip.started_at,
            completed_at: trip.completed_at,
            total_points: trip.route_points.len(),
            visited_points: trip.visited_count(),
        }
    }
}
