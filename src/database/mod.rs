//! Módulo de base de datos
//!
//! Maneja la conexión con PostgreSQL, las migraciones y los datos iniciales.

pub mod connection;
pub mod seed;

pub use connection::connect;
pub use seed::seed_default_drivers;
