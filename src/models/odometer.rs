//! Lecturas de odómetro (mañana y tarde)

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "odometer_reading_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReadingType {
    Morning,
    Evening,
}

impl ReadingType {
    /// "Morning" / "Evening", para los mensajes de confirmación
    pub fn label(&self) -> &'static str {
        match self {
            ReadingType::Morning => "Morning",
            ReadingType::Evening => "Evening",
        }
    }
}

impl FromStr for ReadingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(ReadingType::Morning),
            "evening" => Ok(ReadingType::Evening),
            _ => Err("Reading type must be \"morning\" or \"evening\"".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OdometerReading {
    pub id: i32,
    pub assignment_id: i32,
    pub driver_id: i32,
    pub bus_id: i32,
    pub reading_type: ReadingType,
    pub reading_km: Decimal,
    pub reading_date: NaiveDate,
    pub submitted_at: DateTime<Utc>,
}

/// Resumen de un día: lectura de la mañana con la de la tarde (si existe)
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyDistance {
    pub assignment_id: i32,
    pub driver_id: i32,
    pub bus_id: i32,
    pub reading_date: NaiveDate,
    pub morning_reading: Decimal,
    pub evening_reading: Option<Decimal>,
    pub distance_traveled: Decimal,
    pub morning_submitted_at: DateTime<Utc>,
    pub evening_submitted_at: Option<DateTime<Utc>>,
}
