use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::driver::{Driver, DriverRole, NewDriver};
use crate::utils::errors::{conflict_error, AppError, AppResult};

/// Acceso a conductores
#[async_trait]
pub trait DriverRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Driver>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Driver>>;

    async fn list_all(&self) -> AppResult<Vec<Driver>>;

    async fn list_active_by_role(&self, role: DriverRole) -> AppResult<Vec<Driver>>;

    /// `excluding` permite ignorar al propio conductor al actualizar
    async fn email_exists(&self, email: &str, excluding: Option<Uuid>) -> AppResult<bool>;

    async fn create(&self, driver: NewDriver) -> AppResult<Driver>;

    async fn update(&self, id: Uuid, driver: NewDriver) -> AppResult<Option<Driver>>;

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Option<Driver>>;

    async fn count(&self) -> AppResult<i64>;
}

const DRIVER_COLUMNS: &str = "id, email, name, role, active, created_at";

pub struct PgDriverRepository {
    pool: PgPool,
}

impl PgDriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Traduce violaciones de unicidad del email a un conflicto
fn map_unique_email(e: sqlx::Error, email: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            conflict_error("Driver", "email", email)
        }
        _ => AppError::Database(e),
    }
}

#[async_trait]
impl DriverRepository for PgDriverRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>(&format!(
            "SELECT {} FROM drivers WHERE id = $1",
            DRIVER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>(&format!(
            "SELECT {} FROM drivers WHERE email = $1",
            DRIVER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    async fn list_all(&self) -> AppResult<Vec<Driver>> {
        let drivers = sqlx::query_as::<_, Driver>(&format!(
            "SELECT {} FROM drivers ORDER BY name ASC",
            DRIVER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    async fn list_active_by_role(&self, role: DriverRole) -> AppResult<Vec<Driver>> {
        let drivers = sqlx::query_as::<_, Driver>(&format!(
            "SELECT {} FROM drivers WHERE role = $1 AND active = TRUE ORDER BY name ASC",
            DRIVER_COLUMNS
        ))
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    async fn email_exists(&self, email: &str, excluding: Option<Uuid>) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM drivers WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    async fn create(&self, driver: NewDriver) -> AppResult<Driver> {
        let created = sqlx::query_as::<_, Driver>(&format!(
            r#"
            INSERT INTO drivers (id, email, name, role, active, created_at)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            RETURNING {}
            "#,
            DRIVER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&driver.email)
        .bind(&driver.name)
        .bind(driver.role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_email(e, &driver.email))?;

        Ok(created)
    }

    async fn update(&self, id: Uuid, driver: NewDriver) -> AppResult<Option<Driver>> {
        let updated = sqlx::query_as::<_, Driver>(&format!(
            r#"
            UPDATE drivers
            SET email = $2, name = $3, role = $4
            WHERE id = $1
            RETURNING {}
            "#,
            DRIVER_COLUMNS
        ))
        .bind(id)
        .bind(&driver.email)
        .bind(&driver.name)
        .bind(driver.role)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_email(e, &driver.email))?;

        Ok(updated)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Option<Driver>> {
        let updated = sqlx::query_as::<_, Driver>(&format!(
            "UPDATE drivers SET active = $2 WHERE id = $1 RETURNING {}",
            DRIVER_COLUMNS
        ))
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM drivers")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }
}
