//! Conductores iniciales
//!
//! Con la tabla vacía se crea un administrador y un conductor para poder
//! entrar al sistema. Nunca toca una tabla con datos.

use tracing::info;

use crate::models::driver::{DriverRole, NewDriver};
use crate::repositories::DriverRepository;
use crate::utils::errors::AppResult;

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@trips.local";
pub const DEFAULT_DRIVER_EMAIL: &str = "driver@trips.local";

/// Devuelve cuántos conductores se crearon
pub async fn seed_default_drivers(drivers: &dyn DriverRepository) -> AppResult<usize> {
    if drivers.count().await? > 0 {
        return Ok(0);
    }

    let defaults = [
        NewDriver {
            email: DEFAULT_ADMIN_EMAIL.to_string(),
            name: "Administrador".to_string(),
            role: DriverRole::Admin,
        },
        NewDriver {
            email: DEFAULT_DRIVER_EMAIL.to_string(),
            name: "Conductor".to_string(),
            role: DriverRole::Driver,
        },
    ];

    let created = defaults.len();
    for driver in defaults {
        let driver = drivers.create(driver).await?;
        info!("🌱 Conductor inicial {} ({})", driver.email, driver.role.as_str());
    }

    Ok(created)
}
