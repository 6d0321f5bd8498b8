//! Modelo de bus

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Bus {
    pub id: i32,
    pub no_plate: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub number_of_seats: Option<i32>,
    pub fuel_type: Option<String>,
    pub fuel_tank_capacity: Option<Decimal>,
    pub wheel_count: Option<i32>,
    pub engine_cc: Option<i32>,
    pub year_of_manufacture: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
