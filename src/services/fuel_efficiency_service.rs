//! Cálculos de rendimiento de combustible
//!
//! Funciones puras sobre agregados ya consultados: km/L, calificación,
//! estado, ranking, eficiencia por carga y reporte de cargas consecutivas.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Umbral (km/L) por debajo del cual se genera una alerta
pub const LOW_EFFICIENCY_THRESHOLD: f64 = 3.0;
/// Umbral (km/L) por debajo del cual la alerta es crítica
pub const CRITICAL_EFFICIENCY_THRESHOLD: f64 = 2.5;

/// Redondear a dos decimales
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// km/L redondeado; 0 si falta distancia o combustible
pub fn km_per_liter(distance: f64, liters: f64) -> f64 {
    if distance > 0.0 && liters > 0.0 {
        round2(distance / liters)
    } else {
        0.0
    }
}

/// Calificación de 1 a 5 a partir del rendimiento (0 sin datos)
pub fn efficiency_rating(efficiency: f64) -> f64 {
    match efficiency {
        e if e >= 5.0 => 5.0,
        e if e >= 4.5 => 4.5,
        e if e >= 4.0 => 4.0,
        e if e >= 3.5 => 3.5,
        e if e >= 3.0 => 3.0,
        e if e > 0.0 => e.max(1.0),
        _ => 0.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EfficiencyStatus {
    Excellent,
    Good,
    Average,
    BelowAverage,
    Poor,
    NoData,
}

pub fn efficiency_status(efficiency: f64) -> EfficiencyStatus {
    match efficiency {
        e if e >= 4.5 => EfficiencyStatus::Excellent,
        e if e >= 4.0 => EfficiencyStatus::Good,
        e if e >= 3.5 => EfficiencyStatus::Average,
        e if e >= 3.0 => EfficiencyStatus::BelowAverage,
        e if e > 0.0 => EfficiencyStatus::Poor,
        _ => EfficiencyStatus::NoData,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    Warning,
}

pub fn alert_severity(efficiency: f64) -> AlertSeverity {
    if efficiency < CRITICAL_EFFICIENCY_THRESHOLD {
        AlertSeverity::Critical
    } else {
        AlertSeverity::Warning
    }
}

/// Elementos que participan en un ranking por rendimiento
pub trait Ranked {
    fn efficiency(&self) -> f64;
    fn set_rank(&mut self, rank: Option<usize>);
}

/// Ordenar por rendimiento descendente y numerar 1..n.
/// Los elementos sin datos (rendimiento <= 0) quedan al final sin rango.
pub fn assign_rankings<T: Ranked>(items: Vec<T>) -> Vec<T> {
    let (mut with_data, mut without_data): (Vec<T>, Vec<T>) =
        items.into_iter().partition(|item| item.efficiency() > 0.0);

    with_data.sort_by(|a, b| b.efficiency().total_cmp(&a.efficiency()));
    for (index, item) in with_data.iter_mut().enumerate() {
        item.set_rank(Some(index + 1));
    }
    for item in without_data.iter_mut() {
        item.set_rank(None);
    }

    with_data.extend(without_data);
    with_data
}

/// Ventana de tiempo para los reportes de rendimiento
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelRange {
    Week,
    Month,
    Quarter,
    Year,
    All,
}

impl FuelRange {
    /// Interpretar el parámetro `range`; valores desconocidos usan `fallback`
    pub fn parse(value: Option<&str>, fallback: FuelRange) -> FuelRange {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("week") => FuelRange::Week,
            Some("month") => FuelRange::Month,
            Some("quarter") => FuelRange::Quarter,
            Some("year") => FuelRange::Year,
            Some("all") => FuelRange::All,
            _ => fallback,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelRange::Week => "week",
            FuelRange::Month => "month",
            FuelRange::Quarter => "quarter",
            FuelRange::Year => "year",
            FuelRange::All => "all",
        }
    }

    /// Primer día incluido en la ventana; `None` para `all`
    pub fn start_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        let days = match self {
            FuelRange::Week => 7,
            FuelRange::Month => 30,
            FuelRange::Quarter => 90,
            FuelRange::Year => 365,
            FuelRange::All => return None,
        };
        today.checked_sub_signed(Duration::days(days))
    }
}

/// Distancia y rendimiento de una carga individual
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripEfficiency {
    pub start_odometer: f64,
    pub end_odometer: f64,
    pub km_traveled: f64,
    pub efficiency: f64,
}

/// El inicio es la lectura de la mañana del día de la carga; el fin es la
/// lectura de la tarde o, si no existe, el odómetro al cargar.
pub fn trip_efficiency(
    morning: Option<f64>,
    evening: Option<f64>,
    odometer_at_fueling: f64,
    liters: f64,
) -> TripEfficiency {
    let start = morning.unwrap_or(0.0);
    let end = evening.filter(|v| *v > 0.0).unwrap_or(odometer_at_fueling);
    let km = if end > start { end - start } else { 0.0 };

    TripEfficiency {
        start_odometer: start,
        end_odometer: end,
        km_traveled: km,
        efficiency: km_per_liter(km, liters),
    }
}

/// Una carga de combustible para el reporte de cargas consecutivas
#[derive(Debug, Clone, PartialEq)]
pub struct FillUp {
    pub id: i32,
    pub fuel_date: NaiveDate,
    pub odometer: f64,
    pub liters: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillUpEfficiency {
    pub id: i32,
    pub fuel_date: NaiveDate,
    pub odometer_at_fueling: f64,
    pub liters_filled: f64,
    pub total_cost: f64,
    pub distance_traveled: f64,
    pub km_per_liter: f64,
    pub cost_per_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillUpSummary {
    pub efficiency_data: Vec<FillUpEfficiency>,
    pub total_distance: f64,
    pub total_liters: f64,
    pub total_cost: f64,
    pub avg_km_per_liter: f64,
    pub avg_cost_per_km: f64,
    pub avg_cost_per_day: f64,
    pub avg_liters_per_day: f64,
    pub avg_distance_per_day: f64,
    pub best_efficiency: f64,
    pub worst_efficiency: f64,
    pub projected_weekly_cost: f64,
    pub projected_monthly_cost: f64,
    pub projected_weekly_liters: f64,
    pub projected_monthly_liters: f64,
    pub number_of_records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillUpReport {
    pub has_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub summary: Option<FillUpSummary>,
}

impl FillUpReport {
    pub fn empty(message: &str) -> Self {
        Self {
            has_data: false,
            message: Some(message.to_string()),
            summary: None,
        }
    }

    pub fn avg_km_per_liter(&self) -> Option<f64> {
        self.summary.as_ref().map(|s| s.avg_km_per_liter)
    }

    pub fn avg_cost_per_km(&self) -> Option<f64> {
        self.summary.as_ref().map(|s| s.avg_cost_per_km)
    }
}

/// Reporte de rendimiento entre cargas consecutivas de un bus.
///
/// Cada carga (salvo la primera por odómetro) se compara con la anterior:
/// la distancia recorrida se divide por los litros de la carga posterior.
/// Los totales excluyen la primera carga, que sólo marca el punto de partida.
pub fn fill_up_report(entries: &[FillUp]) -> FillUpReport {
    if entries.len() < 2 {
        return FillUpReport::empty("Need at least 2 fuel entries to calculate efficiency");
    }

    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| a.odometer.total_cmp(&b.odometer));

    let efficiency_data: Vec<FillUpEfficiency> = sorted
        .windows(2)
        .filter_map(|pair| {
            let (previous, current) = (&pair[0], &pair[1]);
            let distance = current.odometer - previous.odometer;
            if distance <= 0.0 || current.liters <= 0.0 {
                return None;
            }
            Some(FillUpEfficiency {
                id: current.id,
                fuel_date: current.fuel_date,
                odometer_at_fueling: current.odometer,
                liters_filled: current.liters,
                total_cost: current.total_cost,
                distance_traveled: round2(distance),
                km_per_liter: round2(distance / current.liters),
                cost_per_km: round2(current.total_cost / distance),
            })
        })
        .collect();

    if efficiency_data.is_empty() {
        return FillUpReport::empty("Not enough valid data to calculate efficiency");
    }

    let (first, last) = (&sorted[0], &sorted[sorted.len() - 1]);
    let total_distance = last.odometer - first.odometer;
    let total_liters: f64 = sorted[1..].iter().map(|e| e.liters).sum();
    let total_cost: f64 = sorted[1..].iter().map(|e| e.total_cost).sum();

    let records = efficiency_data.len() as f64;
    let avg_cost_per_day = total_cost / records;
    let avg_liters_per_day = total_liters / records;

    let best = efficiency_data
        .iter()
        .map(|e| e.km_per_liter)
        .fold(f64::MIN, f64::max);
    let worst = efficiency_data
        .iter()
        .map(|e| e.km_per_liter)
        .fold(f64::MAX, f64::min);

    let ratio = |num: f64, den: f64| if den > 0.0 { round2(num / den) } else { 0.0 };

    FillUpReport {
        has_data: true,
        message: None,
        summary: Some(FillUpSummary {
            number_of_records: efficiency_data.len(),
            efficiency_data,
            total_distance: round2(total_distance),
            total_liters: round2(total_liters),
            total_cost: round2(total_cost),
            avg_km_per_liter: ratio(total_distance, total_liters),
            avg_cost_per_km: ratio(total_cost, total_distance),
            avg_cost_per_day: round2(avg_cost_per_day),
            avg_liters_per_day: round2(avg_liters_per_day),
            avg_distance_per_day: round2(total_distance / records),
            best_efficiency: round2(best),
            worst_efficiency: round2(worst),
            projected_weekly_cost: round2(avg_cost_per_day * 7.0),
            projected_monthly_cost: round2(avg_cost_per_day * 30.0),
            projected_weekly_liters: round2(avg_liters_per_day * 7.0),
            projected_monthly_liters: round2(avg_liters_per_day * 30.0),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Item {
        name: &'static str,
        eff: f64,
        rank: Option<usize>,
    }

    impl Ranked for Item {
        fn efficiency(&self) -> f64 {
            self.eff
        }
        fn set_rank(&mut self, rank: Option<usize>) {
            self.rank = rank;
        }
    }

    fn item(name: &'static str, eff: f64) -> Item {
        Item { name, eff, rank: Some(99) }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    #[test]
    fn test_km_per_liter_rounds_to_two_decimals() {
        assert_eq!(km_per_liter(100.0, 30.0), 3.33);
        assert_eq!(km_per_liter(250.0, 60.0), 4.17);
        assert_eq!(km_per_liter(0.0, 30.0), 0.0);
        assert_eq!(km_per_liter(100.0, 0.0), 0.0);
    }

    #[test]
    fn test_efficiency_rating_table() {
        assert_eq!(efficiency_rating(6.2), 5.0);
        assert_eq!(efficiency_rating(4.7), 4.5);
        assert_eq!(efficiency_rating(4.0), 4.0);
        assert_eq!(efficiency_rating(3.6), 3.5);
        assert_eq!(efficiency_rating(3.2), 3.0);
        assert_eq!(efficiency_rating(2.4), 2.4);
        assert_eq!(efficiency_rating(0.4), 1.0);
        assert_eq!(efficiency_rating(0.0), 0.0);
    }

    #[test]
    fn test_efficiency_status_labels() {
        assert_eq!(efficiency_status(4.5), EfficiencyStatus::Excellent);
        assert_eq!(efficiency_status(4.2), EfficiencyStatus::Good);
        assert_eq!(efficiency_status(3.5), EfficiencyStatus::Average);
        assert_eq!(efficiency_status(3.0), EfficiencyStatus::BelowAverage);
        assert_eq!(efficiency_status(1.2), EfficiencyStatus::Poor);
        assert_eq!(efficiency_status(0.0), EfficiencyStatus::NoData);
        assert_eq!(
            serde_json::to_value(EfficiencyStatus::BelowAverage).unwrap(),
            "below_average"
        );
    }

    #[test]
    fn test_alert_severity() {
        assert_eq!(alert_severity(2.4), AlertSeverity::Critical);
        assert_eq!(alert_severity(2.5), AlertSeverity::Warning);
    }

    #[test]
    fn test_rankings_skip_items_without_data() {
        let ranked = assign_rankings(vec![
            item("a", 3.1),
            item("b", 0.0),
            item("c", 4.8),
            item("d", 3.9),
        ]);
        let order: Vec<(&str, Option<usize>)> = ranked.iter().map(|i| (i.name, i.rank)).collect();
        assert_eq!(
            order,
            vec![("c", Some(1)), ("d", Some(2)), ("a", Some(3)), ("b", None)]
        );
    }

    #[test]
    fn test_fuel_range_start_dates() {
        let today = day(31);
        assert_eq!(FuelRange::Week.start_date(today), Some(day(24)));
        assert_eq!(FuelRange::Month.start_date(today), Some(day(1)));
        assert_eq!(FuelRange::All.start_date(today), None);
        assert_eq!(FuelRange::parse(Some("QUARTER"), FuelRange::Month), FuelRange::Quarter);
        assert_eq!(FuelRange::parse(Some("decade"), FuelRange::Month), FuelRange::Month);
        assert_eq!(FuelRange::parse(None, FuelRange::Week), FuelRange::Week);
    }

    #[test]
    fn test_trip_efficiency_prefers_evening_reading() {
        let trip = trip_efficiency(Some(1000.0), Some(1180.0), 1100.0, 45.0);
        assert_eq!(trip.km_traveled, 180.0);
        assert_eq!(trip.efficiency, 4.0);

        let no_evening = trip_efficiency(Some(1000.0), None, 1100.0, 30.0);
        assert_eq!(no_evening.end_odometer, 1100.0);
        assert_eq!(no_evening.efficiency, 3.33);

        let backwards = trip_efficiency(Some(1200.0), None, 1100.0, 30.0);
        assert_eq!(backwards.km_traveled, 0.0);
        assert_eq!(backwards.efficiency, 0.0);
    }

    #[test]
    fn test_fill_up_report_needs_two_entries() {
        let report = fill_up_report(&[FillUp {
            id: 1,
            fuel_date: day(1),
            odometer: 1000.0,
            liters: 40.0,
            total_cost: 12000.0,
        }]);
        assert!(!report.has_data);
        assert_eq!(
            report.message.as_deref(),
            Some("Need at least 2 fuel entries to calculate efficiency")
        );
    }

    #[test]
    fn test_fill_up_report_consecutive_pairs() {
        // Llegan en orden descendente de odómetro, como los devuelve la consulta
        let entries = vec![
            FillUp { id: 3, fuel_date: day(3), odometer: 1500.0, liters: 50.0, total_cost: 15000.0 },
            FillUp { id: 2, fuel_date: day(2), odometer: 1200.0, liters: 40.0, total_cost: 12000.0 },
            FillUp { id: 1, fuel_date: day(1), odometer: 1000.0, liters: 60.0, total_cost: 18000.0 },
        ];

        let report = fill_up_report(&entries);
        assert!(report.has_data);
        let summary = report.summary.unwrap();

        assert_eq!(summary.number_of_records, 2);
        assert_eq!(summary.efficiency_data[0].km_per_liter, 5.0);
        assert_eq!(summary.efficiency_data[0].cost_per_km, 60.0);
        assert_eq!(summary.efficiency_data[1].km_per_liter, 6.0);
        assert_eq!(summary.total_distance, 500.0);
        assert_eq!(summary.total_liters, 90.0);
        assert_eq!(summary.total_cost, 27000.0);
        assert_eq!(summary.avg_km_per_liter, 5.56);
        assert_eq!(summary.avg_cost_per_km, 54.0);
        assert_eq!(summary.best_efficiency, 6.0);
        assert_eq!(summary.worst_efficiency, 5.0);
        assert_eq!(summary.avg_cost_per_day, 13500.0);
        assert_eq!(summary.projected_weekly_cost, 94500.0);
        assert_eq!(summary.projected_monthly_liters, 1350.0);
    }

    #[test]
    fn test_fill_up_report_serializes_flat() {
        let report = FillUpReport::empty("Need at least 2 fuel entries to calculate efficiency");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["hasData"], false);
        assert!(json.get("totalDistance").is_none());
    }
}
