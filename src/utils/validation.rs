//! Utilidades de validación
//!
//! Validaciones que el derive de `validator` no cubre por sí solo.

use validator::ValidationError;

use crate::utils::errors::{validation_error, AppError};

/// Validar que un string no esté vacío ni sea solo espacios
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de coordenadas GPS
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&lat) {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &lat);
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }

    if !(-180.0..=180.0).contains(&lng) {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &lng);
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }

    Ok(())
}

/// Las coordenadas van juntas: ambas o ninguna
pub fn validate_coordinate_pair(lat: Option<f64>, lng: Option<f64>) -> Result<(), AppError> {
    match (lat, lng) {
        (None, None) => Ok(()),
        (Some(lat), Some(lng)) => validate_coordinates(lat, lng)
            .map_err(|e| validation_error(&format!("Coordenadas fuera de rango ({})", e.code))),
        _ => Err(validation_error(
            "Latitud y longitud deben indicarse juntas",
        )),
    }
}
