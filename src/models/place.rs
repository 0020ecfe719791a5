//! Modelo de Place
//!
//! Datos de referencia reutilizables. Desactivar un lugar solo lo oculta
//! de las listas de selección; los puntos de ruta existentes lo siguen
//! referenciando.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Place - mapea exactamente a la tabla places
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Place {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Campos editables de un lugar (alta y actualización)
#[derive(Debug, Clone)]
pub struct PlaceFields {
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
}
