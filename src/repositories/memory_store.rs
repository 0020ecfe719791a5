//! Almacén en memoria
//!
//! Implementa los tres repositorios sobre un único `RwLock`, de modo que
//! cada operación de escritura es atómica igual que una transacción en
//! PostgreSQL. Se usa en tests y cuando no hay `DATABASE_URL`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::driver::{Driver, DriverRole, NewDriver};
use crate::models::place::{Place, PlaceFields};
use crate::models::trip::{NewTrip, RoutePoint, RoutePointStatus, Trip, TripProgress, TripStatus};
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::place_repository::PlaceRepository;
use crate::repositories::trip_repository::{ProgressFn, TripRepository};
use crate::utils::errors::{conflict_error, internal_error, not_found_error, AppResult};

#[derive(Debug, Clone)]
struct TripRecord {
    id: Uuid,
    driver_id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
    progress: TripProgress,
}

#[derive(Debug, Clone)]
struct PointRecord {
    id: Uuid,
    trip_id: Uuid,
    place_id: Uuid,
    position: i32,
    status: RoutePointStatus,
}

#[derive(Debug, Default)]
struct MemoryData {
    drivers: Vec<Driver>,
    places: Vec<Place>,
    // Orden de inserción
    trips: Vec<TripRecord>,
    points: Vec<PointRecord>,
}

impl MemoryData {
    fn driver(&self, id: Uuid) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.id == id)
    }

    fn place(&self, id: Uuid) -> Option<&Place> {
        self.places.iter().find(|p| p.id == id)
    }

    fn materialize_point(&self, record: &PointRecord) -> AppResult<RoutePoint> {
        let place = self.place(record.place_id).ok_or_else(|| {
            internal_error(&format!("Route point {} references a missing place", record.id))
        })?;

        Ok(RoutePoint {
            id: record.id,
            trip_id: record.trip_id,
            position: record.position,
            status: record.status,
            place_id: place.id,
            place_name: place.name.clone(),
            place_address: place.address.clone(),
            latitude: place.latitude,
            longitude: place.longitude,
        })
    }

    fn materialize(&self, record: &TripRecord) -> AppResult<Trip> {
        let driver = self.driver(record.driver_id).ok_or_else(|| {
            internal_error(&format!("Trip {} references a missing driver", record.id))
        })?;

        let route_points = self
            .points
            .iter()
            .filter(|p| p.trip_id == record.id)
            .map(|p| self.materialize_point(p))
            .collect::<AppResult<Vec<_>>>()?;

        let mut trip = Trip {
            id: record.id,
            driver_id: record.driver_id,
            driver_name: driver.name.clone(),
            name: record.name.clone(),
            status: record.progress.status,
            created_at: record.created_at,
            started_at: record.progress.started_at,
            completed_at: record.progress.completed_at,
            route_points,
        };
        trip.sort_route_points();
        Ok(trip)
    }

    /// Más recientes primero; a igual fecha, el último insertado primero
    fn newest_first<'a>(&'a self, records: impl Iterator<Item = &'a TripRecord>) -> AppResult<Vec<Trip>> {
        let mut selected: Vec<&TripRecord> = records.collect();
        selected.reverse();
        selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        selected.into_iter().map(|r| self.materialize(r)).collect()
    }

    fn trip_record_mut(&mut self, id: Uuid) -> AppResult<&mut TripRecord> {
        self.trips
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found_error("Trip", &id.to_string()))
    }

    fn point_statuses(&self, trip_id: Uuid) -> Vec<RoutePointStatus> {
        let mut points: Vec<&PointRecord> =
            self.points.iter().filter(|p| p.trip_id == trip_id).collect();
        points.sort_by_key(|p| p.position);
        points.into_iter().map(|p| p.status).collect()
    }

    fn apply_progress(&mut self, trip_id: Uuid, advance: &ProgressFn) -> AppResult<Trip> {
        let statuses = self.point_statuses(trip_id);
        let record = self.trip_record_mut(trip_id)?;
        record.progress = advance(&record.progress, statuses.as_slice());
        let record = record.clone();
        self.materialize(&record)
    }

    fn email_taken(&self, email: &str, excluding: Option<Uuid>) -> bool {
        self.drivers
            .iter()
            .any(|d| d.email == email && Some(d.id) != excluding)
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<MemoryData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DriverRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Driver>> {
        Ok(self.data.read().await.driver(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Driver>> {
        let data = self.data.read().await;
        Ok(data.drivers.iter().find(|d| d.email == email).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Driver>> {
        let mut drivers = self.data.read().await.drivers.clone();
        drivers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(drivers)
    }

    async fn list_active_by_role(&self, role: DriverRole) -> AppResult<Vec<Driver>> {
        let mut drivers: Vec<Driver> = self
            .data
            .read()
            .await
            .drivers
            .iter()
            .filter(|d| d.role == role && d.active)
            .cloned()
            .collect();
        drivers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(drivers)
    }

    async fn email_exists(&self, email: &str, excluding: Option<Uuid>) -> AppResult<bool> {
        Ok(self.data.read().await.email_taken(email, excluding))
    }

    async fn create(&self, driver: NewDriver) -> AppResult<Driver> {
        let mut data = self.data.write().await;
        if data.email_taken(&driver.email, None) {
            return Err(conflict_error("Driver", "email", &driver.email));
        }

        let created = Driver {
            id: Uuid::new_v4(),
            email: driver.email,
            name: driver.name,
            role: driver.role,
            active: true,
            created_at: Utc::now(),
        };
        data.drivers.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, driver: NewDriver) -> AppResult<Option<Driver>> {
        let mut data = self.data.write().await;
        if data.email_taken(&driver.email, Some(id)) {
            return Err(conflict_error("Driver", "email", &driver.email));
        }

        Ok(data.drivers.iter_mut().find(|d| d.id == id).map(|current| {
            current.email = driver.email;
            current.name = driver.name;
            current.role = driver.role;
            current.clone()
        }))
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Option<Driver>> {
        let mut data = self.data.write().await;
        Ok(data.drivers.iter_mut().find(|d| d.id == id).map(|current| {
            current.active = active;
            current.clone()
        }))
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.data.read().await.drivers.len() as i64)
    }
}

#[async_trait]
impl PlaceRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Place>> {
        Ok(self.data.read().await.place(id).cloned())
    }

    async fn list_active(&self) -> AppResult<Vec<Place>> {
        let mut places: Vec<Place> = self
            .data
            .read()
            .await
            .places
            .iter()
            .filter(|p| p.active)
            .cloned()
            .collect();
        places.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(places)
    }

    async fn list_all(&self) -> AppResult<Vec<Place>> {
        Ok(self.data.read().await.places.clone())
    }

    async fn create(&self, fields: PlaceFields) -> AppResult<Place> {
        let place = Place {
            id: Uuid::new_v4(),
            name: fields.name,
            address: fields.address,
            latitude: fields.latitude,
            longitude: fields.longitude,
            notes: fields.notes,
            active: true,
            created_at: Utc::now(),
        };
        self.data.write().await.places.push(place.clone());
        Ok(place)
    }

    async fn update(&self, id: Uuid, fields: PlaceFields) -> AppResult<Option<Place>> {
        let mut data = self.data.write().await;
        Ok(data.places.iter_mut().find(|p| p.id == id).map(|current| {
            current.name = fields.name;
            current.address = fields.address;
            current.latitude = fields.latitude;
            current.longitude = fields.longitude;
            current.notes = fields.notes;
            current.clone()
        }))
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Option<Place>> {
        let mut data = self.data.write().await;
        Ok(data.places.iter_mut().find(|p| p.id == id).map(|current| {
            current.active = active;
            current.clone()
        }))
    }
}

#[async_trait]
impl TripRepository for MemoryStore {
    async fn create_with_route(&self, trip: NewTrip) -> AppResult<Trip> {
        let mut data = self.data.write().await;

        // Mismas garantías que las claves foráneas: nada se escribe si algo falla
        if data.driver(trip.driver_id).is_none() {
            return Err(not_found_error("Driver", &trip.driver_id.to_string()));
        }
        if let Some(missing) = trip.stops.iter().find(|s| data.place(s.place_id).is_none()) {
            return Err(not_found_error("Place", &missing.place_id.to_string()));
        }

        let record = TripRecord {
            id: Uuid::new_v4(),
            driver_id: trip.driver_id,
            name: trip.name,
            created_at: trip.created_at,
            progress: TripProgress {
                status: TripStatus::Planned,
                started_at: None,
                completed_at: None,
            },
        };

        let points: Vec<PointRecord> = trip
            .stops
            .iter()
            .map(|stop| PointRecord {
                id: Uuid::new_v4(),
                trip_id: record.id,
                place_id: stop.place_id,
                position: stop.position,
                status: RoutePointStatus::Pending,
            })
            .collect();

        data.points.extend(points);
        data.trips.push(record.clone());
        data.materialize(&record)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Trip>> {
        let data = self.data.read().await;
        data.trips
            .iter()
            .find(|t| t.id == id)
            .map(|record| data.materialize(record))
            .transpose()
    }

    async fn find_route_point(&self, id: Uuid) -> AppResult<Option<RoutePoint>> {
        let data = self.data.read().await;
        data.points
            .iter()
            .find(|p| p.id == id)
            .map(|record| data.materialize_point(record))
            .transpose()
    }

    async fn list_all(&self) -> AppResult<Vec<Trip>> {
        let data = self.data.read().await;
        data.newest_first(data.trips.iter())
    }

    async fn list_by_driver(&self, driver_id: Uuid) -> AppResult<Vec<Trip>> {
        let data = self.data.read().await;
        data.newest_first(data.trips.iter().filter(|t| t.driver_id == driver_id))
    }

    async fn update_progress(&self, trip_id: Uuid, advance: &ProgressFn) -> AppResult<Trip> {
        self.data.write().await.apply_progress(trip_id, advance)
    }

    async fn record_visit(
        &self,
        trip_id: Uuid,
        point_id: Uuid,
        advance: &ProgressFn,
    ) -> AppResult<Trip> {
        let mut data = self.data.write().await;
        data.trip_record_mut(trip_id)?;

        let point = data
            .points
            .iter_mut()
            .find(|p| p.id == point_id && p.trip_id == trip_id)
            .ok_or_else(|| not_found_error("Route point", &point_id.to_string()))?;

        if point.status == RoutePointStatus::Visited {
            let record = data.trip_record_mut(trip_id)?.clone();
            return data.materialize(&record);
        }

        point.status = RoutePointStatus::Visited;
        data.apply_progress(trip_id, advance)
    }
}
