pub mod api_response;
pub mod driver_dto;
pub mod place_dto;
pub mod trip_dto;

pub use api_response::ApiResponse;
