//! Vistas de rendimiento de combustible (JSON en camelCase)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::fuel_efficiency::{
    BusForDriver, BusFuelAggregate, DriverFuelAggregate, DriverOnBus, FuelEntryTrip,
};
use crate::services::assignment_schedule_service::bus_model_full;
use crate::services::fuel_efficiency_service::{
    alert_severity, efficiency_rating, efficiency_status, km_per_liter, round2, trip_efficiency,
    AlertSeverity, EfficiencyStatus, Ranked, LOW_EFFICIENCY_THRESHOLD,
};
use crate::utils::numeric::{to_f64, to_f64_opt};

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub range: Option<String>,
    pub limit: Option<i64>,
}

fn model_label(brand: Option<&str>, model: Option<&str>) -> String {
    let full = bus_model_full(brand, model);
    if full.is_empty() {
        "N/A".to_string()
    } else {
        full
    }
}

fn or_na(value: Option<String>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or_else(|| "N/A".to_string())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusEfficiency {
    pub bus_id: i32,
    pub reg_number: String,
    pub model: String,
    pub brand: Option<String>,
    pub year: Option<i32>,
    pub is_active: bool,
    pub total_km: f64,
    pub total_fuel: f64,
    pub total_cost: f64,
    pub trips: i64,
    pub avg_km_per_liter: f64,
    pub status: EfficiencyStatus,
    pub rank: Option<usize>,
}

impl From<BusFuelAggregate> for BusEfficiency {
    fn from(row: BusFuelAggregate) -> Self {
        let (total_km, total_fuel) = (to_f64(row.total_km), to_f64(row.total_fuel));
        let avg = km_per_liter(total_km, total_fuel);
        Self {
            bus_id: row.bus_id,
            model: model_label(row.brand.as_deref(), row.model.as_deref()),
            reg_number: row.reg_number,
            brand: row.brand,
            year: row.year,
            is_active: row.is_active,
            total_km: round2(total_km),
            total_fuel: round2(total_fuel),
            total_cost: round2(to_f64(row.total_cost)),
            trips: row.trips,
            avg_km_per_liter: avg,
            status: efficiency_status(avg),
            rank: None,
        }
    }
}

impl Ranked for BusEfficiency {
    fn efficiency(&self) -> f64 {
        self.avg_km_per_liter
    }

    fn set_rank(&mut self, rank: Option<usize>) {
        self.rank = rank;
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusOperated {
    pub bus_id: i32,
    pub reg_number: String,
    pub model: String,
    pub brand: Option<String>,
    pub year: Option<i32>,
    pub km_driven: f64,
    pub fuel_used: f64,
    pub fuel_cost: f64,
    pub trips: i64,
    pub avg_efficiency: f64,
}

impl From<BusForDriver> for BusOperated {
    fn from(row: BusForDriver) -> Self {
        let (km, fuel) = (to_f64(row.km_driven), to_f64(row.fuel_used));
        Self {
            bus_id: row.bus_id,
            model: model_label(row.brand.as_deref(), row.model.as_deref()),
            reg_number: row.reg_number,
            brand: row.brand,
            year: row.year,
            km_driven: round2(km),
            fuel_used: round2(fuel),
            fuel_cost: round2(to_f64(row.fuel_cost)),
            trips: row.trips,
            avg_efficiency: km_per_liter(km, fuel),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverEfficiency {
    pub driver_id: i32,
    pub name: String,
    pub nic: String,
    pub phone: String,
    pub license_no: String,
    pub join_date: DateTime<Utc>,
    pub total_km: f64,
    pub total_fuel: f64,
    pub total_cost: f64,
    pub trips: i64,
    pub bus_count: i64,
    pub avg_km_per_liter: f64,
    pub rating: f64,
    pub status: EfficiencyStatus,
    pub rank: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buses_operated: Option<Vec<BusOperated>>,
}

impl From<DriverFuelAggregate> for DriverEfficiency {
    fn from(row: DriverFuelAggregate) -> Self {
        let (total_km, total_fuel) = (to_f64(row.total_km), to_f64(row.total_fuel));
        let avg = km_per_liter(total_km, total_fuel);
        Self {
            driver_id: row.driver_id,
            name: row.name,
            nic: or_na(row.nic),
            phone: or_na(row.phone),
            license_no: or_na(row.employee_number),
            join_date: row.join_date,
            total_km: round2(total_km),
            total_fuel: round2(total_fuel),
            total_cost: round2(to_f64(row.total_cost)),
            trips: row.trips,
            bus_count: row.bus_count,
            avg_km_per_liter: avg,
            rating: efficiency_rating(avg),
            status: efficiency_status(avg),
            rank: None,
            buses_operated: None,
        }
    }
}

impl Ranked for DriverEfficiency {
    fn efficiency(&self) -> f64 {
        self.avg_km_per_liter
    }

    fn set_rank(&mut self, rank: Option<usize>) {
        self.rank = rank;
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverOperated {
    pub driver_id: i32,
    pub name: String,
    pub employee_no: String,
    pub phone: String,
    pub nic: String,
    pub km_driven: f64,
    pub fuel_used: f64,
    pub fuel_cost: f64,
    pub trips: i64,
    pub avg_efficiency: f64,
}

impl From<DriverOnBus> for DriverOperated {
    fn from(row: DriverOnBus) -> Self {
        let (km, fuel) = (to_f64(row.km_driven), to_f64(row.fuel_used));
        Self {
            driver_id: row.driver_id,
            name: row.name,
            employee_no: or_na(row.employee_number),
            phone: or_na(row.phone),
            nic: or_na(row.nic),
            km_driven: round2(km),
            fuel_used: round2(fuel),
            fuel_cost: round2(to_f64(row.fuel_cost)),
            trips: row.trips,
            avg_efficiency: km_per_liter(km, fuel),
        }
    }
}

/// Carga individual con su distancia y rendimiento del día
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelEntryEfficiency {
    pub id: i32,
    pub date: NaiveDate,
    pub driver_id: Option<i32>,
    pub driver_name: String,
    pub driver_employee_no: Option<String>,
    pub bus_id: Option<i32>,
    pub bus_reg_number: String,
    pub bus_model: Option<String>,
    pub route: Option<String>,
    pub start_odometer: f64,
    pub end_odometer: f64,
    pub km_traveled: f64,
    pub fuel_liters: f64,
    pub fuel_cost: f64,
    pub price_per_liter: f64,
    pub efficiency: f64,
    pub station: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl From<FuelEntryTrip> for FuelEntryEfficiency {
    fn from(row: FuelEntryTrip) -> Self {
        let liters = to_f64(row.liters_filled);
        let trip = trip_efficiency(
            to_f64_opt(row.morning_reading),
            to_f64_opt(row.evening_reading),
            to_f64(row.odometer_at_fueling),
            liters,
        );
        let bus_model = match (&row.bus_brand, &row.bus_model) {
            (None, None) => None,
            (brand, model) => Some(bus_model_full(brand.as_deref(), model.as_deref())),
        };
        Self {
            id: row.id,
            date: row.fuel_date,
            driver_id: row.driver_id,
            driver_name: or_na(row.driver_name),
            driver_employee_no: row.driver_employee_number,
            bus_id: row.bus_id,
            bus_reg_number: or_na(row.bus_reg_number),
            bus_model,
            route: row.route,
            start_odometer: trip.start_odometer,
            end_odometer: trip.end_odometer,
            km_traveled: round2(trip.km_traveled),
            fuel_liters: liters,
            fuel_cost: to_f64(row.total_cost),
            price_per_liter: to_f64(row.price_per_liter),
            efficiency: trip.efficiency,
            station: or_na(Some(row.fuel_station)),
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusFullReport {
    #[serde(flatten)]
    pub bus: BusEfficiency,
    pub drivers_operated: Vec<DriverOperated>,
    pub fuel_entries: Vec<FuelEntryEfficiency>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverFullReport {
    #[serde(flatten)]
    pub driver: DriverEfficiency,
    pub fuel_entries: Vec<FuelEntryEfficiency>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub driver_id: i32,
    pub name: String,
    pub employee_no: String,
    pub phone: String,
    pub total_km: f64,
    pub total_fuel: f64,
    pub total_cost: f64,
    pub trips: i64,
    pub bus_count: i64,
    pub avg_km_per_liter: f64,
    pub rating: f64,
    pub status: EfficiencyStatus,
}

/// Los mejores conductores con combustible cargado, por km/L descendente
pub fn leaderboard(drivers: Vec<DriverEfficiency>, limit: usize) -> Vec<LeaderboardEntry> {
    let mut with_fuel: Vec<DriverEfficiency> =
        drivers.into_iter().filter(|d| d.total_fuel > 0.0).collect();
    with_fuel.sort_by(|a, b| b.avg_km_per_liter.total_cmp(&a.avg_km_per_liter));

    with_fuel
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, d)| LeaderboardEntry {
            rank: index + 1,
            driver_id: d.driver_id,
            name: d.name,
            employee_no: d.license_no,
            phone: d.phone,
            total_km: d.total_km,
            total_fuel: d.total_fuel,
            total_cost: d.total_cost,
            trips: d.trips,
            bus_count: d.bus_count,
            avg_km_per_liter: d.avg_km_per_liter,
            rating: d.rating,
            status: d.status,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Bus,
    Driver,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EfficiencyAlert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub entity_id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_no: Option<String>,
    pub efficiency: f64,
    pub total_km: f64,
    pub total_fuel: f64,
    pub trips: i64,
    pub message: &'static str,
    pub severity: AlertSeverity,
}

fn below_threshold(total_km: f64, total_fuel: f64) -> Option<f64> {
    if total_km <= 0.0 || total_fuel <= 0.0 {
        return None;
    }
    let efficiency = total_km / total_fuel;
    (efficiency < LOW_EFFICIENCY_THRESHOLD).then(|| round2(efficiency))
}

/// Buses y conductores por debajo del umbral, el peor rendimiento primero
pub fn efficiency_alerts(buses: &[BusEfficiency], drivers: &[DriverEfficiency]) -> Vec<EfficiencyAlert> {
    let bus_alerts = buses.iter().filter_map(|bus| {
        let efficiency = below_threshold(bus.total_km, bus.total_fuel)?;
        Some(EfficiencyAlert {
            kind: AlertKind::Bus,
            entity_id: bus.bus_id,
            name: bus.reg_number.clone(),
            model: Some(bus.model.clone()),
            employee_no: None,
            efficiency,
            total_km: bus.total_km,
            total_fuel: bus.total_fuel,
            trips: bus.trips,
            message: "Low fuel efficiency detected",
            severity: alert_severity(efficiency),
        })
    });

    let driver_alerts = drivers.iter().filter_map(|driver| {
        let efficiency = below_threshold(driver.total_km, driver.total_fuel)?;
        Some(EfficiencyAlert {
            kind: AlertKind::Driver,
            entity_id: driver.driver_id,
            name: driver.name.clone(),
            model: None,
            employee_no: Some(driver.license_no.clone()),
            efficiency,
            total_km: driver.total_km,
            total_fuel: driver.total_fuel,
            trips: driver.trips,
            message: "Below average fuel efficiency",
            severity: alert_severity(efficiency),
        })
    });

    let mut alerts: Vec<EfficiencyAlert> = bus_alerts.chain(driver_alerts).collect();
    alerts.sort_by(|a, b| a.efficiency.total_cmp(&b.efficiency));
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal::Decimal;

    fn dec(v: f64) -> Decimal {
        Decimal::from_f64(v).unwrap()
    }

    fn bus(id: i32, km: f64, fuel: f64) -> BusEfficiency {
        BusEfficiency::from(BusFuelAggregate {
            bus_id: id,
            reg_number: format!("NB-{}", 1000 + id),
            brand: Some("Tata".to_string()),
            model: Some("LP 1618".to_string()),
            year: Some(2018),
            is_active: true,
            total_km: dec(km),
            total_fuel: dec(fuel),
            total_cost: dec(fuel * 3.4),
            trips: 4,
        })
    }

    fn driver(id: i32, km: f64, fuel: f64) -> DriverEfficiency {
        DriverEfficiency::from(DriverFuelAggregate {
            driver_id: id,
            name: format!("Driver {}", id),
            nic: None,
            phone: Some("0771234567".to_string()),
            employee_number: Some(format!("EMP-DRV-{:03}", id)),
            join_date: Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap(),
            total_km: dec(km),
            total_fuel: dec(fuel),
            total_cost: dec(fuel * 3.4),
            trips: 3,
            bus_count: 1,
        })
    }

    #[test]
    fn test_bus_efficiency_from_aggregate() {
        let view = bus(1, 1_250.0, 300.0);
        assert_eq!(view.avg_km_per_liter, 4.17);
        assert_eq!(view.status, EfficiencyStatus::Good);
        assert_eq!(view.model, "Tata LP 1618");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["regNumber"], "NB-1001");
        assert_eq!(json["avgKmPerLiter"], 4.17);
    }

    #[test]
    fn test_driver_without_fuel_has_no_data() {
        let view = driver(5, 400.0, 0.0);
        assert_eq!(view.avg_km_per_liter, 0.0);
        assert_eq!(view.rating, 0.0);
        assert_eq!(view.status, EfficiencyStatus::NoData);
        assert_eq!(view.nic, "N/A");
    }

    #[test]
    fn test_leaderboard_skips_drivers_without_fuel() {
        let board = leaderboard(
            vec![driver(1, 900.0, 300.0), driver(2, 500.0, 0.0), driver(3, 1_000.0, 200.0)],
            10,
        );
        let ids: Vec<(usize, i32)> = board.iter().map(|e| (e.rank, e.driver_id)).collect();
        assert_eq!(ids, vec![(1, 3), (2, 1)]);
        assert_eq!(board[0].rating, 5.0);
    }

    #[test]
    fn test_alerts_sorted_by_efficiency() {
        let alerts = efficiency_alerts(
            &[bus(1, 560.0, 200.0), bus(2, 900.0, 200.0), bus(3, 0.0, 80.0)],
            &[driver(7, 480.0, 200.0)],
        );
        let summary: Vec<(AlertKind, i32, f64, AlertSeverity)> = alerts
            .iter()
            .map(|a| (a.kind, a.entity_id, a.efficiency, a.severity))
            .collect();
        assert_eq!(
            summary,
            vec![
                (AlertKind::Driver, 7, 2.4, AlertSeverity::Critical),
                (AlertKind::Bus, 1, 2.8, AlertSeverity::Warning),
            ]
        );
        assert_eq!(serde_json::to_value(&alerts[0]).unwrap()["type"], "driver");
    }

    #[test]
    fn test_fuel_entry_uses_evening_reading() {
        let entry = FuelEntryEfficiency::from(FuelEntryTrip {
            id: 9,
            fuel_date: NaiveDate::from_ymd_opt(2026, 6, 2).unwrap(),
            driver_id: Some(4),
            driver_name: Some("Kamal".to_string()),
            driver_employee_number: None,
            bus_id: Some(2),
            bus_reg_number: Some("NB-2002".to_string()),
            bus_brand: None,
            bus_model: None,
            route: None,
            odometer_at_fueling: dec(50_180.0),
            morning_reading: Some(dec(50_000.0)),
            evening_reading: Some(dec(50_240.0)),
            liters_filled: dec(60.0),
            total_cost: dec(204.0),
            price_per_liter: dec(3.4),
            fuel_station: "Lanka IOC".to_string(),
            notes: String::new(),
            created_at: Utc.with_ymd_and_hms(2026, 6, 2, 18, 0, 0).unwrap(),
        });
        assert_eq!(entry.km_traveled, 240.0);
        assert_eq!(entry.efficiency, 4.0);
        assert_eq!(entry.bus_model, None);
    }

    #[test]
    fn test_inactive_bus_still_raises_alert() {
        let mut retired = bus(8, 400.0, 200.0);
        retired.is_active = false;

        let alerts = efficiency_alerts(&[retired], &[]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].entity_id, 8);
        assert_eq!(alerts[0].efficiency, 2.0);
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
    }
}
