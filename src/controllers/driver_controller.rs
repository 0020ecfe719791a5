use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::driver_dto::{DriverRequest, DriverResponse};
use crate::models::driver::{Driver, DriverRole};
use crate::repositories::DriverRepository;
use crate::state::AppState;
use crate::utils::errors::{conflict_error, not_found_error, AppError};

pub struct DriverController {
    repository: Arc<dyn DriverRepository>,
}

impl DriverController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.drivers.clone(),
        }
    }

    pub async fn list_all(&self) -> Result<Vec<DriverResponse>, AppError> {
        Ok(to_responses(self.repository.list_all().await?))
    }

    /// Conductores activos con rol DRIVER, para asignar viajes
    pub async fn list_active(&self) -> Result<Vec<DriverResponse>, AppError> {
        Ok(to_responses(
            self.repository.list_active_by_role(DriverRole::Driver).await?,
        ))
    }

    pub async fn create(&self, request: DriverRequest) -> Result<ApiResponse<DriverResponse>, AppError> {
        request.validate()?;
        let new_driver = request.into_new_driver();

        if self.repository.email_exists(&new_driver.email, None).await? {
            return Err(conflict_error("Driver", "email", &new_driver.email));
        }

        let driver = self.repository.create(new_driver).await?;
        info!("👤 Conductor {} creado ({})", driver.email, driver.role.as_str());

        Ok(ApiResponse::success_with_message(
            driver.into(),
            "Conductor creado exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: DriverRequest,
    ) -> Result<ApiResponse<DriverResponse>, AppError> {
        request.validate()?;
        let changes = request.into_new_driver();

        if self.repository.find_by_id(id).await?.is_none() {
            return Err(not_found_error("Driver", &id.to_string()));
        }

        if self.repository.email_exists(&changes.email, Some(id)).await? {
            return Err(conflict_error("Driver", "email", &changes.email));
        }

        let driver = self
            .repository
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found_error("Driver", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(
            driver.into(),
            "Conductor actualizado exitosamente".to_string(),
        ))
    }

    /// Desactivar conserva todo el historial de viajes
    pub async fn set_active(
        &self,
        id: Uuid,
        active: bool,
    ) -> Result<ApiResponse<DriverResponse>, AppError> {
        let driver = self
            .repository
            .set_active(id, active)
            .await?
            .ok_or_else(|| not_found_error("Driver", &id.to_string()))?;

        let message = if active {
            "Conductor activado"
        } else {
            "Conductor desactivado"
        };
        info!("👤 {} {}", message, driver.email);

        Ok(ApiResponse::success_with_message(driver.into(), message.to_string()))
    }
}

fn to_responses(drivers: Vec<Driver>) -> Vec<DriverResponse> {
    drivers.into_iter().map(DriverResponse::from).collect()
}
