use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::place::{Place, PlaceFields};
use crate::utils::validation::validate_not_empty;

/// Request para crear o actualizar un lugar
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PlaceRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_empty")]
    pub name: String,

    #[validate(length(min = 1, max = 500), custom = "validate_not_empty")]
    pub address: String,

    // Rango y pareja se comprueban con validate_coordinate_pair
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl PlaceRequest {
    /// Normaliza espacios y descarta notas vacías
    pub fn into_fields(self) -> PlaceFields {
        PlaceFields {
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
            notes: self
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        }
    }
}

// Response de lugar
#[derive(Debug, Serialize, Deserialize)]
pub struct PlaceResponse {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Place> for PlaceResponse {
    fn from(place: Place) -> Self {
        Self {
            id: place.id,
            name: place.name,
            address: place.address,
            latitude: place.latitude,
            longitude: place.longitude,
            notes: place.notes,
            active: place.active,
            created_at: place.created_at,
        }
    }
}
