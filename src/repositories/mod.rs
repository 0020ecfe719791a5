//! Repositorios (Entity Store)
//!
//! Cada repositorio es un trait con una implementación PostgreSQL y otra
//! en memoria. El núcleo solo conoce los traits.

pub mod driver_repository;
pub mod memory_store;
pub mod place_repository;
pub mod trip_repository;

pub use driver_repository::{DriverRepository, PgDriverRepository};
pub use memory_store::MemoryStore;
pub use place_repository::{PgPlaceRepository, PlaceRepository};
pub use trip_repository::{PgTripRepository, ProgressFn, TripRepository};
