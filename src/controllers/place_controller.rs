use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::place_dto::{PlaceRequest, PlaceResponse};
use crate::models::place::Place;
use crate::repositories::PlaceRepository;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::validate_coordinate_pair;

pub struct PlaceController {
    repository: Arc<dyn PlaceRepository>,
}

impl PlaceController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.places.clone(),
        }
    }

    /// Lugares activos, para las listas de selección
    pub async fn list_active(&self) -> Result<Vec<PlaceResponse>, AppError> {
        Ok(to_responses(self.repository.list_active().await?))
    }

    pub async fn list_all(&self) -> Result<Vec<PlaceResponse>, AppError> {
        Ok(to_responses(self.repository.list_all().await?))
    }

    pub async fn create(&self, request: PlaceRequest) -> Result<ApiResponse<PlaceResponse>, AppError> {
        request.validate()?;
        validate_coordinate_pair(request.latitude, request.longitude)?;

        let place = self.repository.create(request.into_fields()).await?;
        info!("📌 Lugar {} creado ({})", place.id, place.name);

        Ok(ApiResponse::success_with_message(
            place.into(),
            "Lugar creado exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: PlaceRequest,
    ) -> Result<ApiResponse<PlaceResponse>, AppError> {
        request.validate()?;
        validate_coordinate_pair(request.latitude, request.longitude)?;

        let place = self
            .repository
            .update(id, request.into_fields())
            .await?
            .ok_or_else(|| not_found_error("Place", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(
            place.into(),
            "Lugar actualizado exitosamente".to_string(),
        ))
    }

    /// Cambia el flag activo; los puntos de ruta existentes no se tocan
    pub async fn set_active(
        &self,
        id: Uuid,
        active: bool,
    ) -> Result<ApiResponse<PlaceResponse>, AppError> {
        let place = self
            .repository
            .set_active(id, active)
            .await?
            .ok_or_else(|| not_found_error("Place", &id.to_string()))?;

        let message = if active {
            "Lugar activado"
        } else {
            "Lugar desactivado"
        };
        info!("📌 {} {}", message, place.id);

        Ok(ApiResponse::success_with_message(place.into(), message.to_string()))
    }
}

fn to_responses(places: Vec<Place>) -> Vec<PlaceResponse> {
    places.into_iter().map(PlaceResponse::from).collect()
}
