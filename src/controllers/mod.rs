pub mod dashboard_controller;
pub mod driver_controller;
pub mod place_controller;
pub mod trip_controller;
