//! Acceso a datos con sqlx sobre PostgreSQL

pub mod assignment_repository;
pub mod bus_repository;
pub mod fitness_repository;
pub mod fuel_efficiency_repository;
pub mod fuel_entry_repository;
pub mod odometer_repository;
pub mod spare_part_repository;
pub mod user_repository;
