//! Panel diario del conductor: asignación, revisión, odómetro y combustible

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use validator::Validate;

use crate::dto::today_route_dto::{
    Dashboard, FitnessCheckView, FuelOverview, OdometerToday, QuickStats, SubmitFitnessRequest,
    SubmitFuelRequest, SubmitOdometerRequest, TodayAssignment,
};
use crate::models::assignment::AssignmentDetail;
use crate::models::fitness::FluidLevel;
use crate::models::fuel::FuelEntry;
use crate::models::odometer::{DailyDistance, OdometerReading, ReadingType};
use crate::repositories::assignment_repository::AssignmentRepository;
use crate::repositories::fitness_repository::{FitnessRepository, NewFitnessCheck};
use crate::repositories::fuel_entry_repository::{FuelCostSummary, FuelEntryRepository, NewFuelEntry};
use crate::repositories::odometer_repository::{NewReading, OdometerRepository};
use crate::services::fuel_efficiency_service::{fill_up_report, FillUp, FillUpReport};
use crate::services::odometer_service::{check_reading, today_distance};
use crate::utils::errors::{bad_request_error, not_found_error, AppError};
use crate::utils::numeric::{to_decimal, to_f64};
use crate::utils::validation::{clamp_limit, validate_date};

pub const NO_ASSIGNMENT: &str = "No active assignment found";

pub struct TodayRouteController {
    assignments: AssignmentRepository,
    fitness: FitnessRepository,
    odometer: OdometerRepository,
    fuel: FuelEntryRepository,
}

/// Asignación y bus a los que se imputa un envío del conductor
struct Target {
    assignment_id: i32,
    driver_id: i32,
    bus_id: i32,
    detail: AssignmentDetail,
}

impl TodayRouteController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            assignments: AssignmentRepository::new(pool.clone()),
            fitness: FitnessRepository::new(pool.clone()),
            odometer: OdometerRepository::new(pool.clone()),
            fuel: FuelEntryRepository::new(pool),
        }
    }

    pub async fn today_assignment(
        &self,
        driver_id: i32,
        date: Option<NaiveDate>,
    ) -> Result<Option<TodayAssignment>, AppError> {
        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        let detail = self.assignments.find_for_driver_on(driver_id, date).await?;
        Ok(detail.map(|d| TodayAssignment::from_detail(d, Utc::now())))
    }

    pub async fn active_assignments(&self, driver_id: i32) -> Result<Vec<TodayAssignment>, AppError> {
        let now = Utc::now();
        let details = self.assignments.list_active_for_driver(driver_id).await?;
        Ok(details
            .into_iter()
            .map(|d| TodayAssignment::from_detail(d, now))
            .collect())
    }

    pub async fn dashboard(&self, driver_id: i32, date: Option<NaiveDate>) -> Result<Dashboard, AppError> {
        let day = date.unwrap_or_else(|| Utc::now().date_naive());
        let Some(assignment) = self.today_assignment(driver_id, Some(day)).await? else {
            return Ok(Dashboard::without_assignment());
        };

        let (assignment_id, bus_id) = (assignment.assignment_id, assignment.bus_id);
        let (fitness, readings, previous_day, recent, report) = tokio::join!(
            self.fitness.find_by_assignment_and_date(assignment_id, day),
            self.odometer.readings_for_day(assignment_id, day),
            self.odometer.previous_day(bus_id, day),
            self.fuel.by_bus(bus_id, 10),
            self.fill_up_report_for(bus_id, 20),
        );

        let mut odometer = split_readings(or_default(readings, "lecturas del día"));
        odometer.previous_day = or_default(previous_day, "día anterior");

        Ok(Dashboard {
            has_assignment: true,
            message: None,
            assignment: Some(assignment),
            fitness_check: Some(or_default(fitness, "revisión del día").map(FitnessCheckView::from)),
            odometer: Some(odometer),
            fuel: Some(FuelOverview {
                recent_entries: or_default(recent, "cargas recientes"),
                efficiency_report: report
                    .unwrap_or_else(|_| FillUpReport::empty("Failed to calculate efficiency")),
            }),
        })
    }

    pub async fn quick_stats(&self, driver_id: i32, date: Option<NaiveDate>) -> Result<Option<QuickStats>, AppError> {
        let day = date.unwrap_or_else(|| Utc::now().date_naive());
        let Some(assignment) = self.today_assignment(driver_id, Some(day)).await? else {
            return Ok(None);
        };

        let (fitness, readings, report) = tokio::join!(
            self.fitness.find_by_assignment_and_date(assignment.assignment_id, day),
            self.odometer.readings_for_day(assignment.assignment_id, day),
            self.fill_up_report_for(assignment.bus_id, 20),
        );

        let fitness = or_default(fitness, "revisión del día");
        let odometer = split_readings(or_default(readings, "lecturas del día"));
        let report = report.unwrap_or_else(|_| FillUpReport::empty("Failed to calculate efficiency"));

        Ok(Some(QuickStats::new(fitness.as_ref(), odometer.today_distance, &report)))
    }

    // ----- Revisión diaria -----

    /// Asignación indicada o la del conductor para el día
    pub async fn assignment_id_for(
        &self,
        driver_id: i32,
        date: Option<NaiveDate>,
        assignment_id: Option<i32>,
    ) -> Result<Option<i32>, AppError> {
        if assignment_id.is_some() {
            return Ok(assignment_id);
        }
        let day = date.unwrap_or_else(|| Utc::now().date_naive());
        let detail = self.assignments.find_for_driver_on(driver_id, day).await?;
        Ok(detail.map(|d| d.assignment_id))
    }

    pub async fn fitness_check(
        &self,
        assignment_id: i32,
        date: Option<NaiveDate>,
    ) -> Result<Option<FitnessCheckView>, AppError> {
        let day = date.unwrap_or_else(|| Utc::now().date_naive());
        let check = self.fitness.find_by_assignment_and_date(assignment_id, day).await?;
        Ok(check.map(FitnessCheckView::from))
    }

    pub async fn submit_fitness(
        &self,
        driver_id: i32,
        request: SubmitFitnessRequest,
    ) -> Result<FitnessCheckView, AppError> {
        request.validate()?;

        let check_date = match request.check_date.as_deref() {
            Some(value) => parse_date(value)?,
            None => Utc::now().date_naive(),
        };
        let target = self
            .resolve_target(driver_id, request.assignment_id, request.bus_id)
            .await?;

        tracing::info!(
            "🛢️ Revisión diaria del conductor {} para la asignación {}",
            driver_id,
            target.assignment_id
        );

        let saved = self
            .fitness
            .upsert(NewFitnessCheck {
                assignment_id: target.assignment_id,
                driver_id: target.driver_id,
                bus_id: target.bus_id,
                oil_level: parse_level(&request.oil_level)?,
                oil_checked: request.oil_checked,
                water_level: parse_level(&request.water_level)?,
                water_checked: request.water_checked,
                notes: request.notes.unwrap_or_default(),
                check_date,
            })
            .await?;

        Ok(saved.into())
    }

    pub async fn fitness_history(&self, bus_id: Option<i32>, limit: Option<i64>) -> Result<Vec<FitnessCheckView>, AppError> {
        let bus_id = require_bus(bus_id)?;
        let records = self
            .fitness
            .recent_by_bus(bus_id, clamp_limit(limit, 30, 365))
            .await?;
        Ok(records.into_iter().map(FitnessCheckView::from).collect())
    }

    // ----- Odómetro -----

    pub async fn odometer_today(
        &self,
        driver_id: i32,
        date: Option<NaiveDate>,
        assignment_id: Option<i32>,
    ) -> Result<OdometerToday, AppError> {
        let day = date.unwrap_or_else(|| Utc::now().date_naive());
        let detail = match assignment_id {
            Some(id) => self.assignments.find_detail(id).await?,
            None => self.assignments.find_for_driver_on(driver_id, day).await?,
        };
        let Some(detail) = detail else {
            return Ok(OdometerToday::default());
        };

        let (readings, previous_day) = tokio::join!(
            self.odometer.readings_for_day(detail.assignment_id, day),
            self.odometer.previous_day(detail.vehicle_id, day),
        );

        let mut odometer = split_readings(readings?);
        odometer.previous_day = previous_day?;
        Ok(odometer)
    }

    pub async fn submit_odometer(
        &self,
        driver_id: i32,
        request: SubmitOdometerRequest,
    ) -> Result<OdometerReading, AppError> {
        request.validate()?;

        let reading_type: ReadingType = request.reading_type.parse().map_err(AppError::BadRequest)?;
        let reading_date = match request.reading_date.as_deref() {
            Some(value) => parse_date(value)?,
            None => Utc::now().date_naive(),
        };
        let target = self
            .resolve_target(driver_id, request.assignment_id, request.bus_id)
            .await?;

        let detail = &target.detail;
        let starts = detail.start_date.date_naive() <= reading_date;
        let ends = detail.end_date.map_or(true, |end| reading_date <= end.date_naive());
        if !(starts && ends) {
            return Err(bad_request_error("Reading date is outside the assignment period"));
        }

        let (latest, morning) = tokio::join!(
            self.odometer.latest_for_bus(target.bus_id),
            self.odometer
                .find_by_type_and_date(target.assignment_id, ReadingType::Morning, reading_date),
        );
        let latest = latest?.map(|r| to_f64(r.reading_km));
        let morning = morning?.map(|r| to_f64(r.reading_km));

        check_reading(reading_type, request.reading_km, latest, morning)
            .map_err(|rejected| AppError::BadRequest(rejected.0))?;

        self.odometer
            .upsert(NewReading {
                assignment_id: target.assignment_id,
                driver_id: target.driver_id,
                bus_id: target.bus_id,
                reading_type,
                reading_km: to_decimal(request.reading_km, "readingKm")?,
                reading_date,
            })
            .await
    }

    pub async fn odometer_history(&self, bus_id: Option<i32>, days: Option<i32>) -> Result<Vec<DailyDistance>, AppError> {
        let bus_id = require_bus(bus_id)?;
        let days = days.unwrap_or(30).clamp(1, 366);
        self.odometer.daily_distances(bus_id, days).await
    }

    // ----- Combustible -----

    /// Cargas del bus indicado o del bus de la asignación de hoy
    pub async fn fuel_entries(
        &self,
        driver_id: i32,
        bus_id: Option<i32>,
        limit: Option<i64>,
    ) -> Result<Vec<FuelEntry>, AppError> {
        let Some(bus_id) = self.bus_or_today(driver_id, bus_id).await? else {
            return Ok(Vec::new());
        };
        self.fuel.by_bus(bus_id, clamp_limit(limit, 50, 500)).await
    }

    pub async fn submit_fuel(&self, driver_id: i32, request: SubmitFuelRequest) -> Result<FuelEntry, AppError> {
        request.validate()?;

        let fuel_date = match request.fuel_date.as_deref() {
            Some(value) => parse_date(value)?,
            None => Utc::now().date_naive(),
        };
        let target = self
            .resolve_target(driver_id, request.assignment_id, request.bus_id)
            .await?;

        let entry = NewFuelEntry {
            assignment_id: target.assignment_id,
            driver_id: target.driver_id,
            bus_id: target.bus_id,
            odometer_at_fueling: to_decimal(request.odometer_at_fueling, "odometerAtFueling")?,
            liters_filled: to_decimal(request.liters_filled, "litersFilled")?,
            price_per_liter: to_decimal(request.price_per_liter, "pricePerLiter")?,
            total_cost: to_decimal(request.resolved_total_cost(), "totalCost")?.round_dp(2),
            fuel_station: request.fuel_station.trim().to_string(),
            notes: request.notes.unwrap_or_default(),
            fuel_date,
        };

        self.fuel.create(entry).await
    }

    pub async fn efficiency_report(
        &self,
        driver_id: i32,
        bus_id: Option<i32>,
        limit: Option<i64>,
    ) -> Result<FillUpReport, AppError> {
        let Some(bus_id) = self.bus_or_today(driver_id, bus_id).await? else {
            return Ok(FillUpReport::empty(NO_ASSIGNMENT));
        };
        self.fill_up_report_for(bus_id, clamp_limit(limit, 50, 500)).await
    }

    pub async fn fuel_summary(
        &self,
        bus_id: Option<i32>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<FuelCostSummary, AppError> {
        match (bus_id, start_date, end_date) {
            (Some(bus_id), Some(start), Some(end)) => self.fuel.cost_summary(bus_id, start, end).await,
            _ => Err(bad_request_error("Bus ID, start date, and end date are required")),
        }
    }

    pub async fn driver_fuel_history(&self, driver_id: i32, limit: Option<i64>) -> Result<Vec<FuelEntry>, AppError> {
        self.fuel.by_driver(driver_id, clamp_limit(limit, 50, 500)).await
    }

    // ----- Auxiliares -----

    async fn fill_up_report_for(&self, bus_id: i32, limit: i64) -> Result<FillUpReport, AppError> {
        let entries = self.fuel.by_bus(bus_id, limit).await?;
        let fill_ups: Vec<FillUp> = entries.iter().map(to_fill_up).collect();
        Ok(fill_up_report(&fill_ups))
    }

    async fn bus_or_today(&self, driver_id: i32, bus_id: Option<i32>) -> Result<Option<i32>, AppError> {
        if bus_id.is_some() {
            return Ok(bus_id);
        }
        let today = Utc::now().date_naive();
        let detail = self.assignments.find_for_driver_on(driver_id, today).await?;
        Ok(detail.map(|d| d.vehicle_id))
    }

    /// Sin `assignment_id` se usa la asignación de hoy; el bus por defecto es el asignado
    async fn resolve_target(
        &self,
        driver_id: i32,
        assignment_id: Option<i32>,
        bus_id: Option<i32>,
    ) -> Result<Target, AppError> {
        let detail = match assignment_id {
            Some(id) => self.assignments.find_detail(id).await?,
            None => {
                let today = Utc::now().date_naive();
                self.assignments.find_for_driver_on(driver_id, today).await?
            }
        };
        let detail = detail.ok_or_else(|| not_found_error(NO_ASSIGNMENT))?;

        Ok(Target {
            assignment_id: detail.assignment_id,
            driver_id,
            bus_id: bus_id.unwrap_or(detail.vehicle_id),
            detail,
        })
    }
}

fn to_fill_up(entry: &FuelEntry) -> FillUp {
    FillUp {
        id: entry.id,
        fuel_date: entry.fuel_date,
        odometer: to_f64(entry.odometer_at_fueling),
        liters: to_f64(entry.liters_filled),
        total_cost: to_f64(entry.total_cost),
    }
}

/// Separa las lecturas del día en mañana y tarde
fn split_readings(readings: Vec<OdometerReading>) -> OdometerToday {
    let mut today = OdometerToday::default();
    for reading in readings {
        match reading.reading_type {
            ReadingType::Morning => today.morning = Some(reading),
            ReadingType::Evening => today.evening = Some(reading),
        }
    }
    today.morning_submitted = today.morning.is_some();
    today.evening_submitted = today.evening.is_some();
    today.today_distance = today_distance(
        today.morning.as_ref().map(|r| to_f64(r.reading_km)),
        today.evening.as_ref().map(|r| to_f64(r.reading_km)),
    );
    today
}

/// Una sección del panel que falla no tumba el resto
fn or_default<T: Default>(result: Result<T, AppError>, section: &str) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!("⚠️ Panel del conductor: falló {}: {}", section, e);
        T::default()
    })
}

fn require_bus(bus_id: Option<i32>) -> Result<i32, AppError> {
    bus_id.ok_or_else(|| bad_request_error("Bus ID is required"))
}

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    validate_date(value).map_err(|_| bad_request_error("Invalid date format, expected YYYY-MM-DD"))
}

fn parse_level(value: &str) -> Result<FluidLevel, AppError> {
    value.parse().map_err(AppError::BadRequest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal::Decimal;

    fn reading(id: i32, reading_type: ReadingType, km: f64) -> OdometerReading {
        OdometerReading {
            id,
            assignment_id: 3,
            driver_id: 7,
            bus_id: 2,
            reading_type,
            reading_km: Decimal::from_f64(km).unwrap(),
            reading_date: NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(),
            submitted_at: Utc.with_ymd_and_hms(2026, 5, 4, 7, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_split_readings_computes_distance() {
        let today = split_readings(vec![
            reading(2, ReadingType::Evening, 45_310.5),
            reading(1, ReadingType::Morning, 45_120.0),
        ]);
        assert!(today.morning_submitted);
        assert!(today.evening_submitted);
        assert_eq!(today.today_distance, 190.5);
    }

    #[test]
    fn test_split_readings_morning_only() {
        let today = split_readings(vec![reading(1, ReadingType::Morning, 45_120.0)]);
        assert!(today.morning_submitted);
        assert!(!today.evening_submitted);
        assert_eq!(today.today_distance, 0.0);
    }

    #[test]
    fn test_or_default_swallows_errors() {
        let failed: Result<Vec<FuelEntry>, AppError> = Err(AppError::Internal("boom".to_string()));
        assert!(or_default(failed, "cargas recientes").is_empty());
    }

    #[test]
    fn test_require_bus() {
        assert!(matches!(require_bus(None), Err(AppError::BadRequest(m)) if m == "Bus ID is required"));
        assert_eq!(require_bus(Some(4)).unwrap(), 4);
    }
}
