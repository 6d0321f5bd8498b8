//! Agregados de rendimiento de combustible por bus y por conductor
//!
//! La distancia de cada grupo es la lectura de odómetro más alta menos la más
//! baja dentro de la ventana; el combustible es la suma de litros cargados.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct BusFuelAggregate {
    pub bus_id: i32,
    pub reg_number: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub is_active: bool,
    pub total_km: Decimal,
    pub total_fuel: Decimal,
    pub total_cost: Decimal,
    pub trips: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct DriverFuelAggregate {
    pub driver_id: i32,
    pub name: String,
    pub nic: Option<String>,
    pub phone: Option<String>,
    pub employee_number: Option<String>,
    pub join_date: DateTime<Utc>,
    pub total_km: Decimal,
    pub total_fuel: Decimal,
    pub total_cost: Decimal,
    pub trips: i64,
    pub bus_count: i64,
}

/// Conductor que operó un bus, con sus totales sobre ese bus
#[derive(Debug, Clone, FromRow)]
pub struct DriverOnBus {
    pub driver_id: i32,
    pub name: String,
    pub employee_number: Option<String>,
    pub phone: Option<String>,
    pub nic: Option<String>,
    pub km_driven: Decimal,
    pub fuel_used: Decimal,
    pub fuel_cost: Decimal,
    pub trips: i64,
}

/// Bus operado por un conductor, con sus totales para ese conductor
#[derive(Debug, Clone, FromRow)]
pub struct BusForDriver {
    pub bus_id: i32,
    pub reg_number: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub km_driven: Decimal,
    pub fuel_used: Decimal,
    pub fuel_cost: Decimal,
    pub trips: i64,
}

/// Carga con las lecturas de la mañana y la tarde del mismo día
#[derive(Debug, Clone, FromRow)]
pub struct FuelEntryTrip {
    pub id: i32,
    pub fuel_date: NaiveDate,
    pub driver_id: Option<i32>,
    pub driver_name: Option<String>,
    pub driver_employee_number: Option<String>,
    pub bus_id: Option<i32>,
    pub bus_reg_number: Option<String>,
    pub bus_brand: Option<String>,
    pub bus_model: Option<String>,
    pub route: Option<String>,
    pub odometer_at_fueling: Decimal,
    pub morning_reading: Option<Decimal>,
    pub evening_reading: Option<Decimal>,
    pub liters_filled: Decimal,
    pub total_cost: Decimal,
    pub price_per_liter: Decimal,
    pub fuel_station: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}
