//! Cargas de combustible

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FuelEntry {
    pub id: i32,
    pub assignment_id: i32,
    pub driver_id: i32,
    pub bus_id: i32,
    pub odometer_at_fueling: Decimal,
    pub liters_filled: Decimal,
    pub price_per_liter: Decimal,
    pub total_cost: Decimal,
    pub fuel_station: String,
    pub notes: String,
    pub fuel_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}
