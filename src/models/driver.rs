//! Modelo de Driver
//!
//! Conductores del sistema. Un conductor es dueño de cero o más viajes;
//! la desactivación nunca borra su historial.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Rol del conductor - mapea al ENUM driver_role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "driver_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriverRole {
    Admin,
    Driver,
}

impl DriverRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverRole::Admin => "ADMIN",
            DriverRole::Driver => "DRIVER",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ADMIN" => Some(DriverRole::Admin),
            "DRIVER" => Some(DriverRole::Driver),
            _ => None,
        }
    }
}

/// Driver - mapea exactamente a la tabla drivers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Driver {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: DriverRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Datos para registrar un conductor
#[derive(Debug, Clone)]
pub struct NewDriver {
    pub email: String,
    pub name: String,
    pub role: DriverRole,
}

/// Referencia a un conductor tal como llega al núcleo
#[derive(Debug, Clone, PartialEq)]
pub enum DriverRef {
    /// Identidad del llamador resuelta externamente (email del token)
    Email(String),
    /// Id explícito enviado por un administrador
    Id(Uuid),
}

impl std::fmt::Display for DriverRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriverRef::Email(email) => write!(f, "{}", email),
            DriverRef::Id(id) => write!(f, "{}", id),
        }
    }
}
