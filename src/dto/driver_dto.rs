use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::driver::{Driver, DriverRole, NewDriver};
use crate::utils::validation::validate_not_empty;

/// Request para registrar o actualizar un conductor
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DriverRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 200), custom = "validate_not_empty")]
    pub name: String,

    pub role: Option<DriverRole>,
}

impl DriverRequest {
    /// Email en minúsculas; el rol por defecto es DRIVER
    pub fn into_new_driver(self) -> NewDriver {
        NewDriver {
            email: self.email.trim().to_lowercase(),
            name: self.name.trim().to_string(),
            role: self.role.unwrap_or(DriverRole::Driver),
        }
    }
}

// Response de conductor
#[derive(Debug, Serialize, Deserialize)]
pub struct DriverResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: DriverRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Driver> for DriverResponse {
    fn from(driver: Driver) -> Self {
        Self {
            id: driver.id,
            email: driver.email,
            name: driver.name,
            role: driver.role,
            active: driver.active,
            created_at: driver.created_at,
        }
    }
}
