//! Repositorio de viajes
//!
//! Cada operación que escribe es una transacción: el alta inserta el viaje
//! y todos sus puntos juntos, y las transiciones bloquean la fila del viaje
//! (`FOR UPDATE`) para serializar visitas concurrentes sobre el mismo viaje.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::trip::{
    NewTrip, RoutePoint, RoutePointStatus, Trip, TripProgress, TripStatus,
};
use crate::utils::errors::{internal_error, not_found_error, AppResult};

/// Función de transición aplicada bajo el bloqueo del viaje. Recibe el
/// estado actual y los estados de los puntos ordenados por posición.
pub type ProgressFn = dyn Fn(&TripProgress, &[RoutePointStatus]) -> TripProgress + Send + Sync;

/// Acceso a viajes y sus puntos de ruta
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Inserta el viaje y todos sus puntos de forma atómica
    async fn create_with_route(&self, trip: NewTrip) -> AppResult<Trip>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Trip>>;

    async fn find_route_point(&self, id: Uuid) -> AppResult<Option<RoutePoint>>;

    /// Todos los viajes, más recientes primero
    async fn list_all(&self) -> AppResult<Vec<Trip>>;

    /// Viajes de un conductor, más recientes primero
    async fn list_by_driver(&self, driver_id: Uuid) -> AppResult<Vec<Trip>>;

    /// Aplica `advance` al estado actual del viaje y lo persiste
    async fn update_progress(&self, trip_id: Uuid, advance: &ProgressFn) -> AppResult<Trip>;

    /// Marca el punto como visitado y aplica `advance` en la misma transacción.
    /// Si el punto ya estaba visitado no escribe nada.
    async fn record_visit(
        &self,
        trip_id: Uuid,
        point_id: Uuid,
        advance: &ProgressFn,
    ) -> AppResult<Trip>;
}

const TRIP_SELECT: &str = r#"
    SELECT t.id, t.driver_id, d.name AS driver_name, t.name, t.status,
           t.created_at, t.started_at, t.completed_at
    FROM trips t
    JOIN drivers d ON d.id = t.driver_id
"#;

const POINT_SELECT: &str = r#"
    SELECT rp.id, rp.trip_id, rp.position, rp.status, rp.place_id,
           p.name AS place_name, p.address AS place_address, p.latitude, p.longitude
    FROM route_points rp
    JOIN places p ON p.id = rp.place_id
"#;

#[derive(Debug, FromRow)]
struct TripRow {
    id: Uuid,
    driver_id: Uuid,
    driver_name: String,
    name: String,
    status: TripStatus,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl TripRow {
    fn into_trip(self, route_points: Vec<RoutePoint>) -> Trip {
        let mut trip = Trip {
            id: self.id,
            driver_id: self.driver_id,
            driver_name: self.driver_name,
            name: self.name,
            status: self.status,
            created_at: self.created_at,
            started_at: self.started_at,
            completed_at: self.completed_at,
            route_points,
        };
        trip.sort_route_points();
        trip
    }
}

pub struct PgTripRepository {
    pool: PgPool,
}

impl PgTripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Carga los puntos de varios viajes en una sola consulta
    async fn attach_points(&self, rows: Vec<TripRow>) -> AppResult<Vec<Trip>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let points = sqlx::query_as::<_, RoutePoint>(&format!(
            "{} WHERE rp.trip_id = ANY($1) ORDER BY rp.trip_id, rp.position ASC",
            POINT_SELECT
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_trip: HashMap<Uuid, Vec<RoutePoint>> = HashMap::new();
        for point in points {
            by_trip.entry(point.trip_id).or_default().push(point);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let points = by_trip.remove(&row.id).unwrap_or_default();
                row.into_trip(points)
            })
            .collect())
    }

    async fn reload(&self, trip_id: Uuid) -> AppResult<Trip> {
        self.find_by_id(trip_id)
            .await?
            .ok_or_else(|| not_found_error("Trip", &trip_id.to_string()))
    }

    async fn lock_progress(
        tx: &mut Transaction<'_, Postgres>,
        trip_id: Uuid,
    ) -> AppResult<TripProgress> {
        sqlx::query_as::<_, TripProgress>(
            "SELECT status, started_at, completed_at FROM trips WHERE id = $1 FOR UPDATE",
        )
        .bind(trip_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| not_found_error("Trip", &trip_id.to_string()))
    }

    /// Lee los estados de los puntos bajo el bloqueo y persiste la transición
    async fn apply_progress(
        tx: &mut Transaction<'_, Postgres>,
        trip_id: Uuid,
        current: TripProgress,
        advance: &ProgressFn,
    ) -> AppResult<()> {
        let statuses = sqlx::query_scalar::<_, RoutePointStatus>(
            "SELECT status FROM route_points WHERE trip_id = $1 ORDER BY position ASC",
        )
        .bind(trip_id)
        .fetch_all(&mut **tx)
        .await?;

        let next = advance(&current, statuses.as_slice());
        if next == current {
            return Ok(());
        }

        sqlx::query(
            "UPDATE trips SET status = $2, started_at = $3, completed_at = $4 WHERE id = $1",
        )
        .bind(trip_id)
        .bind(next.status)
        .bind(next.started_at)
        .bind(next.completed_at)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl TripRepository for PgTripRepository {
    async fn create_with_route(&self, trip: NewTrip) -> AppResult<Trip> {
        let trip_id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO trips (id, driver_id, name, status, created_at, started_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, NULL, NULL)
            "#,
        )
        .bind(trip_id)
        .bind(trip.driver_id)
        .bind(&trip.name)
        .bind(TripStatus::Planned)
        .bind(trip.created_at)
        .execute(&mut *tx)
        .await?;

        for stop in &trip.stops {
            sqlx::query(
                r#"
                INSERT INTO route_points (id, trip_id, place_id, position, status)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(trip_id)
            .bind(stop.place_id)
            .bind(stop.position)
            .bind(RoutePointStatus::Pending)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.find_by_id(trip_id)
            .await?
            .ok_or_else(|| internal_error("Trip disappeared right after being created"))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Trip>> {
        let row = sqlx::query_as::<_, TripRow>(&format!("{} WHERE t.id = $1", TRIP_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.attach_points(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_route_point(&self, id: Uuid) -> AppResult<Option<RoutePoint>> {
        let point = sqlx::query_as::<_, RoutePoint>(&format!("{} WHERE rp.id = $1", POINT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(point)
    }

    async fn list_all(&self) -> AppResult<Vec<Trip>> {
        let rows = sqlx::query_as::<_, TripRow>(&format!(
            "{} ORDER BY t.created_at DESC",
            TRIP_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;

        self.attach_points(rows).await
    }

    async fn list_by_driver(&self, driver_id: Uuid) -> AppResult<Vec<Trip>> {
        let rows = sqlx::query_as::<_, TripRow>(&format!(
            "{} WHERE t.driver_id = $1 ORDER BY t.created_at DESC",
            TRIP_SELECT
        ))
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await?;

        self.attach_points(rows).await
    }

    async fn update_progress(&self, trip_id: Uuid, advance: &ProgressFn) -> AppResult<Trip> {
        let mut tx = self.pool.begin().await?;

        let current = Self::lock_progress(&mut tx, trip_id).await?;
        Self::apply_progress(&mut tx, trip_id, current, advance).await?;

        tx.commit().await?;
        self.reload(trip_id).await
    }

    async fn record_visit(
        &self,
        trip_id: Uuid,
        point_id: Uuid,
        advance: &ProgressFn,
    ) -> AppResult<Trip> {
        let mut tx = self.pool.begin().await?;

        let current = Self::lock_progress(&mut tx, trip_id).await?;

        let marked = sqlx::query(
            r#"
            UPDATE route_points SET status = $3
            WHERE id = $1 AND trip_id = $2 AND status = $4
            "#,
        )
        .bind(point_id)
        .bind(trip_id)
        .bind(RoutePointStatus::Visited)
        .bind(RoutePointStatus::Pending)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        // Otra llamada ganó la carrera: el punto ya estaba visitado
        if marked == 0 {
            tx.rollback().await?;
            return self.reload(trip_id).await;
        }

        Self::apply_progress(&mut tx, trip_id, current, advance).await?;

        tx.commit().await?;
        self.reload(trip_id).await
    }
}
