use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::place::{Place, PlaceFields};
use crate::utils::errors::AppResult;

/// Acceso a lugares
#[async_trait]
pub trait PlaceRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Place>>;

    /// Lugares activos ordenados por nombre (listas de selección)
    async fn list_active(&self) -> AppResult<Vec<Place>>;

    async fn list_all(&self) -> AppResult<Vec<Place>>;

    async fn create(&self, fields: PlaceFields) -> AppResult<Place>;

    async fn update(&self, id: Uuid, fields: PlaceFields) -> AppResult<Option<Place>>;

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Option<Place>>;
}

const PLACE_COLUMNS: &str = "id, name, address, latitude, longitude, notes, active, created_at";

pub struct PgPlaceRepository {
    pool: PgPool,
}

impl PgPlaceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaceRepository for PgPlaceRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Place>> {
        let place = sqlx::query_as::<_, Place>(&format!(
            "SELECT {} FROM places WHERE id = $1",
            PLACE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(place)
    }

    async fn list_active(&self) -> AppResult<Vec<Place>> {
        let places = sqlx::query_as::<_, Place>(&format!(
            "SELECT {} FROM places WHERE active = TRUE ORDER BY name ASC",
            PLACE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(places)
    }

    async fn list_all(&self) -> AppResult<Vec<Place>> {
        let places = sqlx::query_as::<_, Place>(&format!(
            "SELECT {} FROM places ORDER BY created_at ASC",
            PLACE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(places)
    }

    async fn create(&self, fields: PlaceFields) -> AppResult<Place> {
        let place = sqlx::query_as::<_, Place>(&format!(
            r#"
            INSERT INTO places (id, name, address, latitude, longitude, notes, active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7)
            RETURNING {}
            "#,
            PLACE_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(fields.name)
        .bind(fields.address)
        .bind(fields.latitude)
        .bind(fields.longitude)
        .bind(fields.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(place)
    }

    async fn update(&self, id: Uuid, fields: PlaceFields) -> AppResult<Option<Place>> {
        let place = sqlx::query_as::<_, Place>(&format!(
            r#"
            UPDATE places
            SET name = $2, address = $3, latitude = $4, longitude = $5, notes = $6
            WHERE id = $1
            RETURNING {}
            "#,
            PLACE_COLUMNS
        ))
        .bind(id)
        .bind(fields.name)
        .bind(fields.address)
        .bind(fields.latitude)
        .bind(fields.longitude)
        .bind(fields.notes)
        .fetch_optional(&self.pool)
        .await?;

        Ok(place)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Option<Place>> {
        let place = sqlx::query_as::<_, Place>(&format!(
            "UPDATE places SET active = $2 WHERE id = $1 RETURNING {}",
            PLACE_COLUMNS
        ))
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(place)
    }
}
