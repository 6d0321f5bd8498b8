//! Modelo de asignación bus-conductor
//!
//! Una asignación liga un bus con un conductor durante un rango de fechas.
//! Todas las revisiones, lecturas y cargas de combustible cuelgan de ella.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Fila de `vehicle_driver_assignment`; la clave primaria se expone como `id`
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Assignment {
    pub id: i32,
    pub vehicle_id: i32,
    pub employee_id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub route: String,
    pub created_at: DateTime<Utc>,
    pub update_at: DateTime<Utc>,
}

impl Assignment {
    /// Verificar si la fecha cae dentro del rango de la asignación (por día)
    pub fn covers(&self, date: chrono::NaiveDate) -> bool {
        let starts = self.start_date.date_naive() <= date;
        let ends = self.end_date.map_or(true, |end| date <= end.date_naive());
        starts && ends
    }
}

/// Asignación con los datos del bus y del conductor
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentDetail {
    pub assignment_id: i32,
    pub vehicle_id: i32,
    pub employee_id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub route: String,
    pub created_at: DateTime<Utc>,
    pub update_at: DateTime<Utc>,
    pub bus_number: String,
    pub bus_brand: Option<String>,
    pub bus_model: Option<String>,
    pub number_of_seats: Option<i32>,
    pub fuel_type: Option<String>,
    pub fuel_tank_capacity: Option<Decimal>,
    pub engine_cc: Option<i32>,
    pub year_of_manufacture: Option<i32>,
    pub driver_name: String,
    pub driver_employee_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn assignment(end: Option<DateTime<Utc>>) -> Assignment {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        Assignment {
            id: 1,
            vehicle_id: 1,
            employee_id: 2,
            start_date: start,
            end_date: end,
            route: "Colombo - Kandy".to_string(),
            created_at: start,
            update_at: start,
        }
    }

    #[test]
    fn test_covers_inclusive_by_day() {
        let a = assignment(Some(Utc.with_ymd_and_hms(2026, 3, 10, 6, 0, 0).unwrap()));
        assert!(a.covers(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()));
        assert!(a.covers(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()));
        assert!(!a.covers(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()));
        assert!(!a.covers(NaiveDate::from_ymd_opt(2026, 3, 11).unwrap()));
    }

    #[test]
    fn test_open_ended_assignment_covers_future() {
        let a = assignment(None);
        assert!(a.covers(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));
    }
}
