//! Controllers
//!
//! Cada controller valida la request, aplica las reglas del recurso y
//! delega la persistencia en sus repositorios.

pub mod assignment_controller;
pub mod auth_controller;
pub mod bus_controller;
pub mod fitness_controller;
pub mod fuel_efficiency_controller;
pub mod spare_part_controller;
pub mod staff_controller;
pub mod today_route_controller;
pub mod user_controller;
