//! Services module
//!
//! Lógica de negocio: ciclo de vida de viajes, seguimiento de puntos de ruta
//! y resumen del panel. Los servicios solo dependen de los traits de repositorio.

pub mod dashboard_service;
pub mod route_point_service;
pub mod trip_lifecycle_service;

pub use dashboard_service::DashboardService;
pub use route_point_service::RoutePointService;
pub use trip_lifecycle_service::TripLifecycleService;
