//! Ciclo de vida de los viajes
//!
//! Alta, inicio forzado y consultas de viajes, además de la función pura
//! que deriva el estado del viaje a partir de sus puntos.
//!
//! El estado solo avanza: PLANNED → IN_PROGRESS → COMPLETED.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::driver::{Driver, DriverRef};
use crate::models::trip::{NewRoutePoint, NewTrip, RoutePointStatus, Trip, TripProgress, TripStatus};
use crate::repositories::{DriverRepository, PlaceRepository, TripRepository};
use crate::utils::errors::{
    forbidden_error, not_found_error, precondition_error, validation_error, AppResult,
};

/// Mínimo de lugares para planificar un viaje
pub const MIN_STOPS: usize = 2;

/// Calcula el estado del viaje después de registrar una visita.
///
/// El primer punto visitado pone el viaje en curso; cuando todos los puntos
/// están visitados el viaje se completa. Nunca retrocede: un viaje en curso
/// o completado conserva su estado aunque queden puntos anteriores pendientes.
pub fn derive_status(
    current: &TripProgress,
    points: &[RoutePointStatus],
    now: DateTime<Utc>,
) -> TripProgress {
    let mut next = *current;

    if next.status == TripStatus::Planned {
        next.status = TripStatus::InProgress;
        next.started_at = Some(now);
    }

    let all_visited = !points.is_empty() && points.iter().all(|s| *s == RoutePointStatus::Visited);
    if all_visited && next.status != TripStatus::Completed {
        next.status = TripStatus::Completed;
        next.completed_at = Some(now);
    }

    next
}

/// Inicio administrativo: fuerza IN_PROGRESS y sobreescribe la fecha de inicio.
///
/// Un viaje completado se devuelve sin cambios. Es una desviación deliberada
/// del inicio incondicional (que sobreescribiría también un viaje COMPLETED),
/// pendiente de confirmación de producto; ver DESIGN.md, decisión 1.
pub fn force_start(current: &TripProgress, now: DateTime<Utc>) -> TripProgress {
    if current.status == TripStatus::Completed {
        return *current;
    }

    TripProgress {
        status: TripStatus::InProgress,
        started_at: Some(now),
        completed_at: None,
    }
}

/// Nombre por defecto para viajes sin nombre
pub fn default_trip_name(name: Option<&str>, now: DateTime<Utc>) -> String {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => format!("Viaje {}", now.format("%Y-%m-%d %H:%M")),
    }
}

/// Resuelve un conductor activo; desconocido → NotFound, inactivo → Precondition
pub async fn resolve_active_driver(
    drivers: &dyn DriverRepository,
    reference: &DriverRef,
) -> AppResult<Driver> {
    let driver = match reference {
        DriverRef::Id(id) => drivers.find_by_id(*id).await?,
        DriverRef::Email(email) => drivers.find_by_email(email).await?,
    }
    .ok_or_else(|| not_found_error("Driver", &reference.to_string()))?;

    if !driver.active {
        return Err(precondition_error("Driver", "el conductor está inactivo"));
    }

    Ok(driver)
}

pub struct TripLifecycleService {
    drivers: Arc<dyn DriverRepository>,
    places: Arc<dyn PlaceRepository>,
    trips: Arc<dyn TripRepository>,
}

impl TripLifecycleService {
    pub fn new(
        drivers: Arc<dyn DriverRepository>,
        places: Arc<dyn PlaceRepository>,
        trips: Arc<dyn TripRepository>,
    ) -> Self {
        Self {
            drivers,
            places,
            trips,
        }
    }

    /// Alta de autoservicio: el conductor se crea un viaje a sí mismo
    pub async fn create_trip_for_self(
        &self,
        caller_email: &str,
        name: Option<&str>,
        place_ids: &[Uuid],
    ) -> AppResult<Trip> {
        ensure_enough_stops(place_ids)?;
        let driver =
            resolve_active_driver(self.drivers.as_ref(), &DriverRef::Email(caller_email.to_string()))
                .await?;
        self.create_trip(&driver, name, place_ids).await
    }

    /// Alta administrativa: el conductor llega como id explícito
    pub async fn create_trip_as_admin(
        &self,
        driver_id: Uuid,
        name: Option<&str>,
        place_ids: &[Uuid],
    ) -> AppResult<Trip> {
        ensure_enough_stops(place_ids)?;
        let driver = resolve_active_driver(self.drivers.as_ref(), &DriverRef::Id(driver_id)).await?;
        self.create_trip(&driver, name, place_ids).await
    }

    async fn create_trip(
        &self,
        driver: &Driver,
        name: Option<&str>,
        place_ids: &[Uuid],
    ) -> AppResult<Trip> {
        // Todos los lugares se resuelven antes de escribir nada
        let mut stops = Vec::with_capacity(place_ids.len());
        for (index, place_id) in place_ids.iter().enumerate() {
            let place = self
                .places
                .find_by_id(*place_id)
                .await?
                .ok_or_else(|| not_found_error("Place", &place_id.to_string()))?;

            stops.push(NewRoutePoint {
                place_id: place.id,
                position: index as i32 + 1,
            });
        }

        let now = Utc::now();
        let trip = self
            .trips
            .create_with_route(NewTrip {
                driver_id: driver.id,
                name: default_trip_name(name, now),
                created_at: now,
                stops,
            })
            .await?;

        info!(
            "🧭 Viaje {} creado para {} con {} puntos",
            trip.id,
            driver.email,
            trip.route_points.len()
        );
        Ok(trip)
    }

    /// Inicio explícito del viaje, sin comprobar propietario.
    ///
    /// Sobre un viaje COMPLETED no escribe nada (desviación del inicio
    /// incondicional, pendiente de confirmación de producto).
    pub async fn start_trip(&self, trip_id: Uuid) -> AppResult<Trip> {
        let current = self
            .trips
            .find_by_id(trip_id)
            .await?
            .ok_or_else(|| not_found_error("Trip", &trip_id.to_string()))?;

        if current.status == TripStatus::Completed {
            warn!("⚠️ Viaje {} ya completado; se ignora el inicio", trip_id);
            return Ok(current);
        }

        let now = Utc::now();
        let advance = move |progress: &TripProgress, _: &[RoutePointStatus]| force_start(progress, now);
        let trip = self.trips.update_progress(trip_id, &advance).await?;

        info!("🚚 Viaje {} iniciado", trip.id);
        Ok(trip)
    }

    pub async fn list_all_trips(&self) -> AppResult<Vec<Trip>> {
        self.trips.list_all().await
    }

    pub async fn list_trips_for_driver(&self, caller_email: &str) -> AppResult<Vec<Trip>> {
        let driver =
            resolve_active_driver(self.drivers.as_ref(), &DriverRef::Email(caller_email.to_string()))
                .await?;
        self.trips.list_by_driver(driver.id).await
    }

    pub async fn get_trip(&self, trip_id: Uuid) -> AppResult<Trip> {
        self.trips
            .find_by_id(trip_id)
            .await?
            .ok_or_else(|| not_found_error("Trip", &trip_id.to_string()))
    }

    pub async fn get_trip_for_driver(&self, trip_id: Uuid, caller_email: &str) -> AppResult<Trip> {
        let driver =
            resolve_active_driver(self.drivers.as_ref(), &DriverRef::Email(caller_email.to_string()))
                .await?;
        let trip = self.get_trip(trip_id).await?;

        if trip.driver_id != driver.id {
            return Err(forbidden_error("consultar viaje", "el viaje pertenece a otro conductor"));
        }

        Ok(trip)
    }
}

fn ensure_enough_stops(place_ids: &[Uuid]) -> AppResult<()> {
    if place_ids.len() < MIN_STOPS {
        return Err(validation_error("Se necesitan al menos dos lugares para crear un viaje"));
    }
    Ok(())
}
