//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Los repositorios van detrás de traits para
//! poder servir igual sobre PostgreSQL o sobre el almacén en memoria.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::{
    DriverRepository, MemoryStore, PgDriverRepository, PgPlaceRepository, PgTripRepository,
    PlaceRepository, TripRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub drivers: Arc<dyn DriverRepository>,
    pub places: Arc<dyn PlaceRepository>,
    pub trips: Arc<dyn TripRepository>,
    /// "postgres" o "memory", expuesto en /health
    pub storage: &'static str,
}

impl AppState {
    /// Estado respaldado por PostgreSQL
    pub fn with_postgres(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            config: Arc::new(config),
            drivers: Arc::new(PgDriverRepository::new(pool.clone())),
            places: Arc::new(PgPlaceRepository::new(pool.clone())),
            trips: Arc::new(PgTripRepository::new(pool)),
            storage: "postgres",
        }
    }

    /// Estado en memoria: los tres repositorios comparten el mismo almacén
    pub fn in_memory(config: EnvironmentConfig, store: MemoryStore) -> Self {
        Self {
            config: Arc::new(config),
            drivers: Arc::new(store.clone()),
            places: Arc::new(store.clone()),
            trips: Arc::new(store),
            storage: "memory",
        }
    }
}
