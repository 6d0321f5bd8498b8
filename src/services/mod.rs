//! Servicios de negocio
//!
//! Cálculos puros sobre datos ya consultados, sin acceso a la base de datos.

pub mod assignment_schedule_service;
pub mod fuel_efficiency_service;
pub mod odometer_service;
pub mod spare_part_wear_service;
pub mod staff_number_service;
