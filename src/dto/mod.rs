//! DTOs de requests y responses de la API

pub mod api_response;
pub mod assignment_dto;
pub mod auth_dto;
pub mod bus_dto;
pub mod fitness_dto;
pub mod fuel_efficiency_dto;
pub mod spare_part_dto;
pub mod staff_dto;
pub mod today_route_dto;
pub mod user_dto;

pub use api_response::*;
