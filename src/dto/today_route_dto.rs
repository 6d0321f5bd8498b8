//! Cuerpos del panel diario del conductor (JSON en camelCase)

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::assignment::AssignmentDetail;
use crate::models::fitness::{BusFitness, FluidLevel};
use crate::models::fuel::FuelEntry;
use crate::models::odometer::{DailyDistance, OdometerReading};
use crate::services::assignment_schedule_service::{
    assignment_status, bus_model_full, days_remaining, AssignmentStatus,
};
use crate::services::fuel_efficiency_service::FillUpReport;
use crate::utils::validation::{validate_date_str, validate_fluid_level, validate_not_blank, validate_reading_type};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayQuery {
    pub date: Option<NaiveDate>,
    pub assignment_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusHistoryQuery {
    pub bus_id: Option<i32>,
    pub limit: Option<i64>,
    pub days: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelSummaryQuery {
    pub bus_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// Revisión de aceite y agua enviada desde el panel
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFitnessRequest {
    pub assignment_id: Option<i32>,
    pub bus_id: Option<i32>,
    #[validate(custom = "validate_fluid_level")]
    pub oil_level: String,
    pub oil_checked: bool,
    #[validate(custom = "validate_fluid_level")]
    pub water_level: String,
    pub water_checked: bool,
    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub notes: Option<String>,
    #[validate(custom = "validate_date_str")]
    pub check_date: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOdometerRequest {
    pub assignment_id: Option<i32>,
    pub bus_id: Option<i32>,
    #[validate(custom = "validate_reading_type")]
    pub reading_type: String,
    #[validate(range(min = 0.01, message = "Reading must be greater than 0"))]
    pub reading_km: f64,
    #[validate(custom = "validate_date_str")]
    pub reading_date: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFuelRequest {
    pub assignment_id: Option<i32>,
    pub bus_id: Option<i32>,
    #[validate(range(min = 0.01, message = "Odometer reading must be greater than 0"))]
    pub odometer_at_fueling: f64,
    #[validate(range(min = 0.01, message = "Liters filled must be greater than 0"))]
    pub liters_filled: f64,
    #[validate(range(min = 0.01, message = "Price per liter must be greater than 0"))]
    pub price_per_liter: f64,
    #[validate(range(min = 0.01, message = "Total cost must be greater than 0"))]
    pub total_cost: Option<f64>,
    #[validate(
        custom(function = "validate_not_blank", message = "Fuel station is required"),
        length(max = 160, message = "Fuel station cannot exceed 160 characters")
    )]
    pub fuel_station: String,
    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub notes: Option<String>,
    #[validate(custom = "validate_date_str")]
    pub fuel_date: Option<String>,
}

impl SubmitFuelRequest {
    /// Costo total informado o litros por precio
    pub fn resolved_total_cost(&self) -> f64 {
        self.total_cost
            .unwrap_or(self.liters_filled * self.price_per_liter)
    }
}

/// Asignación del día con los campos derivados
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayAssignment {
    pub assignment_id: i32,
    pub vehicle_id: i32,
    pub employee_id: i32,
    pub bus_id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub route: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
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
    pub bus_model_full: String,
    pub days_remaining: Option<i64>,
    pub status: AssignmentStatus,
}

impl TodayAssignment {
    pub fn from_detail(detail: AssignmentDetail, now: DateTime<Utc>) -> Self {
        Self {
            bus_model_full: bus_model_full(detail.bus_brand.as_deref(), detail.bus_model.as_deref()),
            days_remaining: days_remaining(detail.end_date, now.date_naive()),
            status: assignment_status(detail.start_date, detail.end_date, now),
            assignment_id: detail.assignment_id,
            vehicle_id: detail.vehicle_id,
            employee_id: detail.employee_id,
            bus_id: detail.vehicle_id,
            start_date: detail.start_date,
            end_date: detail.end_date,
            route: detail.route,
            created_at: detail.created_at,
            updated_at: detail.update_at,
            bus_number: detail.bus_number,
            bus_brand: detail.bus_brand,
            bus_model: detail.bus_model,
            number_of_seats: detail.number_of_seats,
            fuel_type: detail.fuel_type,
            fuel_tank_capacity: detail.fuel_tank_capacity,
            engine_cc: detail.engine_cc,
            year_of_manufacture: detail.year_of_manufacture,
            driver_name: detail.driver_name,
            driver_employee_number: detail.driver_employee_number,
        }
    }
}

/// Revisión diaria vista desde el panel del conductor
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessCheckView {
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
}

impl From<BusFitness> for FitnessCheckView {
    fn from(check: BusFitness) -> Self {
        Self {
            id: check.id,
            assignment_id: check.assignment_id,
            driver_id: check.driver_id,
            bus_id: check.bus_id,
            oil_level: check.oil_level,
            oil_checked: check.oil_checked,
            water_level: check.water_level,
            water_checked: check.water_checked,
            notes: check.notes,
            check_date: check.check_date,
            submitted_at: check.submitted_at,
            created_at: check.created_at,
            updated_at: check.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OdometerToday {
    pub morning: Option<OdometerReading>,
    pub evening: Option<OdometerReading>,
    pub morning_submitted: bool,
    pub evening_submitted: bool,
    pub today_distance: f64,
    pub previous_day: Option<DailyDistance>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelOverview {
    pub recent_entries: Vec<FuelEntry>,
    pub efficiency_report: FillUpReport,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub has_assignment: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment: Option<TodayAssignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitness_check: Option<Option<FitnessCheckView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odometer: Option<OdometerToday>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel: Option<FuelOverview>,
}

impl Dashboard {
    pub fn without_assignment() -> Self {
        Self {
            has_assignment: false,
            message: Some("No active assignment for today".to_string()),
            assignment: None,
            fitness_check: None,
            odometer: None,
            fuel: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickStats {
    pub fitness_status: &'static str,
    pub oil_level: String,
    pub water_level: String,
    pub today_distance: f64,
    pub avg_efficiency: Option<f64>,
    pub avg_cost_per_km: Option<f64>,
}

impl QuickStats {
    pub fn new(fitness: Option<&BusFitness>, today_distance: f64, report: &FillUpReport) -> Self {
        Self {
            fitness_status: if fitness.is_some() { "completed" } else { "pending" },
            oil_level: fitness
                .map(|f| f.oil_level.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            water_level: fitness
                .map(|f| f.water_level.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            today_distance,
            avg_efficiency: report.avg_km_per_liter(),
            avg_cost_per_km: report.avg_cost_per_km(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn detail() -> AssignmentDetail {
        let start = Utc.with_ymd_and_hms(2026, 7, 1, 6, 0, 0).unwrap();
        AssignmentDetail {
            assignment_id: 11,
            vehicle_id: 4,
            employee_id: 9,
            start_date: start,
            end_date: Some(Utc.with_ymd_and_hms(2026, 7, 10, 18, 0, 0).unwrap()),
            route: "Kandy - Nuwara Eliya".to_string(),
            created_at: start,
            update_at: start,
            bus_number: "NB-4455".to_string(),
            bus_brand: Some("Ashok Leyland".to_string()),
            bus_model: None,
            number_of_seats: Some(54),
            fuel_type: Some("diesel".to_string()),
            fuel_tank_capacity: None,
            engine_cc: None,
            year_of_manufacture: Some(2019),
            driver_name: "Nimal Perera".to_string(),
            driver_employee_number: Some("EMP-DRV-004".to_string()),
        }
    }

    #[test]
    fn test_today_assignment_derived_fields() {
        let now = Utc.with_ymd_and_hms(2026, 7, 8, 9, 0, 0).unwrap();
        let view = TodayAssignment::from_detail(detail(), now);
        assert_eq!(view.bus_model_full, "Ashok Leyland");
        assert_eq!(view.days_remaining, Some(3));
        assert_eq!(view.status, AssignmentStatus::Active);
        assert_eq!(view.bus_id, 4);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["busModelFull"], "Ashok Leyland");
        assert_eq!(json["status"], "active");
    }

    #[test]
    fn test_quick_stats_without_fitness() {
        let report = FillUpReport::empty("Need at least 2 fuel entries to calculate efficiency");
        let stats = QuickStats::new(None, 0.0, &report);
        assert_eq!(stats.fitness_status, "pending");
        assert_eq!(stats.oil_level, "N/A");
        assert_eq!(stats.avg_efficiency, None);
    }

    #[test]
    fn test_fuel_request_total_cost_default() {
        let request: SubmitFuelRequest = serde_json::from_str(
            r#"{"odometerAtFueling": 45200, "litersFilled": 60, "pricePerLiter": 3.5, "fuelStation": "Ceypetco Kiribathgoda"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.resolved_total_cost(), 210.0);
    }

    #[test]
    fn test_blank_fuel_station_is_rejected() {
        let request: SubmitFuelRequest = serde_json::from_str(
            r#"{"odometerAtFueling": 45200, "litersFilled": 60, "pricePerLiter": 3.5, "fuelStation": "  "}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_dashboard_without_assignment_shape() {
        let json = serde_json::to_value(Dashboard::without_assignment()).unwrap();
        assert_eq!(json["hasAssignment"], false);
        assert_eq!(json["message"], "No active assignment for today");
        assert!(json.get("assignment").is_none());
    }
}
