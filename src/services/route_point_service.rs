//! Seguimiento de puntos de ruta
//!
//! Registrar una visita y recalcular el estado del viaje ocurren en una sola
//! operación atómica del repositorio.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::driver::{Driver, DriverRef};
use crate::models::trip::{RoutePointStatus, Trip, TripProgress, TripStatus};
use crate::repositories::{DriverRepository, TripRepository};
use crate::services::trip_lifecycle_service::{derive_status, resolve_active_driver};
use crate::utils::errors::{forbidden_error, not_found_error, validation_error, AppResult};

pub struct RoutePointService {
    drivers: Arc<dyn DriverRepository>,
    trips: Arc<dyn TripRepository>,
}

impl RoutePointService {
    pub fn new(drivers: Arc<dyn DriverRepository>, trips: Arc<dyn TripRepository>) -> Self {
        Self { drivers, trips }
    }

    /// Visita registrada por un administrador, sin comprobar propietario
    pub async fn mark_visited_as_admin(&self, trip_id: Uuid, point_id: Uuid) -> AppResult<Trip> {
        self.mark_visited(trip_id, point_id, None).await
    }

    /// Visita registrada por el propio conductor del viaje
    pub async fn mark_visited_as_driver(
        &self,
        trip_id: Uuid,
        point_id: Uuid,
        caller_email: &str,
    ) -> AppResult<Trip> {
        let driver =
            resolve_active_driver(self.drivers.as_ref(), &DriverRef::Email(caller_email.to_string()))
                .await?;
        self.mark_visited(trip_id, point_id, Some(&driver)).await
    }

    async fn mark_visited(
        &self,
        trip_id: Uuid,
        point_id: Uuid,
        caller: Option<&Driver>,
    ) -> AppResult<Trip> {
        let trip = self
            .trips
            .find_by_id(trip_id)
            .await?
            .ok_or_else(|| not_found_error("Trip", &trip_id.to_string()))?;

        if let Some(driver) = caller {
            if trip.driver_id != driver.id {
                return Err(forbidden_error(
                    "marcar punto de ruta",
                    "el viaje pertenece a otro conductor",
                ));
            }
        }

        let point = self
            .trips
            .find_route_point(point_id)
            .await?
            .ok_or_else(|| not_found_error("RoutePoint", &point_id.to_string()))?;

        if point.trip_id != trip.id {
            return Err(validation_error("El punto de ruta no pertenece a este viaje"));
        }

        if point.status == RoutePointStatus::Visited {
            debug!("Punto {} ya visitado; sin cambios", point_id);
            return Ok(trip);
        }

        let now = Utc::now();
        let advance =
            move |progress: &TripProgress, points: &[RoutePointStatus]| derive_status(progress, points, now);
        let updated = self.trips.record_visit(trip_id, point_id, &advance).await?;

        info!(
            "📍 Punto {} visitado ({}/{}) en viaje {}",
            point.position,
            updated.visited_count(),
            updated.route_points.len(),
            updated.id
        );
        if updated.status == TripStatus::Completed && trip.status != TripStatus::Completed {
            info!("🏁 Viaje {} completado", updated.id);
        }

        Ok(updated)
    }
}
