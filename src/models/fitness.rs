//! Modelo de revisión diaria del bus (aceite y agua)

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Nivel de fluido, mapea el enum `fluid_level`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "fluid_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FluidLevel {
    #[default]
    Full,
    Adequate,
    Low,
    Critical,
}

impl FluidLevel {
    pub const ALL: [FluidLevel; 4] = [
        FluidLevel::Full,
        FluidLevel::Adequate,
        FluidLevel::Low,
        FluidLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FluidLevel::Full => "full",
            FluidLevel::Adequate => "adequate",
            FluidLevel::Low => "low",
            FluidLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for FluidLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FluidLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FluidLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| "Level must be one of: full, adequate, low, critical".to_string())
    }
}

/// Fila de `bus_fitness`; los campos de los JOIN son opcionales
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BusFitness {
    pub id: i32,
    pub assignment_id: i32,
    pub driver_id: i32,
    pub bus_id: i32,
    pub oil_level: FluidLevel,
    pub oil_checked: bool,
    pub water_level: FluidLevel,
    pub water_checked: bool,
    pub notes: String,
    pub check_date: NaiveDate,
    pub submitted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bus_plate: Option<String>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bus_brand: Option<String>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bus_model: Option<String>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

impl BusFitness {
    pub fn has_critical_level(&self) -> bool {
        self.oil_level == FluidLevel::Critical || self.water_level == FluidLevel::Critical
    }
}

/// Revisión con datos del conductor, del bus y de la asignación
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FitnessHistoryEntry {
    pub id: i32,
    pub assignment_id: i32,
    pub driver_id: i32,
    pub bus_id: i32,
    pub oil_level: FluidLevel,
    pub oil_checked: bool,
    pub water_level: FluidLevel,
    pub water_checked: bool,
    pub notes: String,
    pub check_date: NaiveDate,
    pub submitted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub driver_name: Option<String>,
    pub driver_mobile: Option<String>,
    pub driver_employee_number: Option<String>,
    pub bus_plate: Option<String>,
    pub bus_brand: Option<String>,
    pub bus_model: Option<String>,
    pub assignment_route: Option<String>,
    pub assignment_start: Option<DateTime<Utc>>,
    pub assignment_end: Option<DateTime<Utc>>,
}

/// Estado de revisión de un bus activo en una fecha
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BusCheckStatus {
    pub bus_id: i32,
    pub no_plate: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub is_active: bool,
    pub oil_checked: bool,
    pub water_checked: bool,
    pub oil_level: Option<FluidLevel>,
    pub water_level: Option<FluidLevel>,
    pub driver_name: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Asignación vigente en una fecha y su revisión (si existe)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AssignmentCheckStatus {
    pub id: i32,
    pub bus_id: i32,
    pub driver_id: i32,
    pub route: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub driver_name: Option<String>,
    pub driver_mobile: Option<String>,
    pub bus_plate: Option<String>,
    pub bus_brand: Option<String>,
    pub bus_model: Option<String>,
    pub fitness_id: Option<i32>,
    pub oil_level: Option<FluidLevel>,
    pub oil_checked: Option<bool>,
    pub water_level: Option<FluidLevel>,
    pub water_checked: Option<bool>,
    pub fitness_notes: Option<String>,
    pub check_submitted_at: Option<DateTime<Utc>>,
    pub has_checked: bool,
}

/// Conteos agregados de revisiones en un rango
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FitnessSummary {
    pub total_checks: i64,
    pub oil_checks_done: i64,
    pub water_checks_done: i64,
    pub oil_full_count: i64,
    pub oil_adequate_count: i64,
    pub oil_low_count: i64,
    pub oil_critical_count: i64,
    pub water_full_count: i64,
    pub water_adequate_count: i64,
    pub water_low_count: i64,
    pub water_critical_count: i64,
    pub buses_checked: i64,
    pub drivers_active: i64,
    pub days_with_checks: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fluid_level_parse() {
        assert_eq!("low".parse::<FluidLevel>(), Ok(FluidLevel::Low));
        assert!("empty".parse::<FluidLevel>().is_err());
        assert_eq!(FluidLevel::default(), FluidLevel::Full);
    }
}
