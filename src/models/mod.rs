//! Modelos de datos del sistema
//!
//! Filas de base de datos (`sqlx::FromRow`) y enums de PostgreSQL.

pub mod assignment;
pub mod bus;
pub mod fitness;
pub mod fuel;
pub mod fuel_efficiency;
pub mod odometer;
pub mod spare_part;
pub mod user;

pub use assignment::*;
pub use bus::*;
pub use fitness::*;
pub use fuel::*;
pub use fuel_efficiency::*;
pub use odometer::*;
pub use spare_part::*;
pub use user::*;
