#![allow(dead_code)]

use std::sync::Arc;

use trip_management::models::driver::{Driver, DriverRole, NewDriver};
use trip_management::models::place::{Place, PlaceFields};
use trip_management::repositories::{DriverRepository, MemoryStore, PlaceRepository};
use trip_management::services::{DashboardService, RoutePointService, TripLifecycleService};

pub struct Fixture {
    pub store: MemoryStore,
    pub lifecycle: TripLifecycleService,
    pub route_points: RoutePointService,
    pub dashboard: DashboardService,
}

impl Fixture {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let drivers: Arc<dyn DriverRepository> = Arc::new(store.clone());
        let places: Arc<dyn PlaceRepository> = Arc::new(store.clone());
        let trips = Arc::new(store.clone());

        Self {
            lifecycle: TripLifecycleService::new(drivers.clone(), places, trips.clone()),
            route_points: RoutePointService::new(drivers, trips.clone()),
            dashboard: DashboardService::new(trips),
            store,
        }
    }

    pub async fn driver(&self, email: &str, name: &str) -> Driver {
        DriverRepository::create(
            &self.store,
            NewDriver {
                email: email.to_string(),
                name: name.to_string(),
                role: DriverRole::Driver,
            },
        )
        .await
        .unwrap()
    }

    pub async fn place(&self, name: &str) -> Place {
        PlaceRepository::create(
            &self.store,
            PlaceFields {
                name: name.to_string(),
                address: format!("Avenida {} 100", name),
                latitude: Some(-34.6),
                longitude: Some(-58.4),
                notes: None,
            },
        )
        .await
        .unwrap()
    }
}
