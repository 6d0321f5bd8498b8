//! Reportes de rendimiento de combustible por bus y por conductor
//!
//! Los agregados vienen de la base; calificación, estado, ranking y alertas
//! se calculan aquí a partir de ellos.

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use crate::dto::fuel_efficiency_dto::{
    efficiency_alerts, leaderboard, BusEfficiency, BusFullReport, BusOperated, DriverEfficiency,
    DriverFullReport, DriverOperated, EfficiencyAlert, FuelEntryEfficiency, LeaderboardEntry,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::Role;
use crate::repositories::fuel_efficiency_repository::FuelEfficiencyRepository;
use crate::services::fuel_efficiency_service::{assign_rankings, FuelRange};
use crate::utils::errors::{not_found_error, AppError};

pub const DEFAULT_LEADERBOARD_SIZE: i64 = 10;

pub struct FuelEfficiencyController {
    repository: FuelEfficiencyRepository,
}

impl FuelEfficiencyController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: FuelEfficiencyRepository::new(pool),
        }
    }

    fn since(range: FuelRange) -> Option<NaiveDate> {
        range.start_date(Utc::now().date_naive())
    }

    // ----- Buses -----

    /// Buses activos con su rango en la flota
    pub async fn buses(&self, range: FuelRange) -> Result<Vec<BusEfficiency>, AppError> {
        let rows = self
            .repository
            .bus_aggregates(Self::since(range), None, true)
            .await?;
        Ok(assign_rankings(rows.into_iter().map(BusEfficiency::from).collect()))
    }

    /// El rango se calcula contra toda la flota activa
    pub async fn bus(&self, bus_id: i32, range: FuelRange) -> Result<BusEfficiency, AppError> {
        let ranked = self.buses(range).await?;
        if let Some(bus) = ranked.into_iter().find(|b| b.bus_id == bus_id) {
            return Ok(bus);
        }

        // Buses inactivos no participan en el ranking
        self.repository
            .bus_aggregates(Self::since(range), Some(bus_id), false)
            .await?
            .into_iter()
            .next()
            .map(BusEfficiency::from)
            .ok_or_else(|| not_found_error("Bus not found"))
    }

    pub async fn bus_full_report(&self, bus_id: i32, range: FuelRange) -> Result<BusFullReport, AppError> {
        let since = Self::since(range);
        let bus = self.bus(bus_id, range).await?;

        let (drivers, entries) = tokio::join!(
            self.repository.drivers_on_bus(bus_id, since),
            self.repository.fuel_entry_trips(Some(bus_id), None, since),
        );

        Ok(BusFullReport {
            bus,
            drivers_operated: drivers?.into_iter().map(DriverOperated::from).collect(),
            fuel_entries: entries?.into_iter().map(FuelEntryEfficiency::from).collect(),
        })
    }

    // ----- Conductores -----

    pub async fn drivers(&self, range: FuelRange) -> Result<Vec<DriverEfficiency>, AppError> {
        let rows = self
            .repository
            .driver_aggregates(Self::since(range), None)
            .await?;
        Ok(assign_rankings(rows.into_iter().map(DriverEfficiency::from).collect()))
    }

    /// Conductor con su rango entre todos los conductores y los buses que operó
    pub async fn driver(&self, driver_id: i32, range: FuelRange) -> Result<DriverEfficiency, AppError> {
        let (ranked, buses) = tokio::join!(
            self.drivers(range),
            self.buses_operated(driver_id, range),
        );

        let mut driver = ranked?
            .into_iter()
            .find(|d| d.driver_id == driver_id)
            .ok_or_else(|| not_found_error("Driver not found"))?;
        driver.buses_operated = Some(buses?);
        Ok(driver)
    }

    pub async fn driver_full_report(
        &self,
        driver_id: i32,
        range: FuelRange,
    ) -> Result<DriverFullReport, AppError> {
        let driver = self.driver(driver_id, range).await?;
        let fuel_entries = self.fuel_entries(driver_id, range).await?;
        Ok(DriverFullReport { driver, fuel_entries })
    }

    pub async fn buses_operated(&self, driver_id: i32, range: FuelRange) -> Result<Vec<BusOperated>, AppError> {
        let rows = self
            .repository
            .buses_for_driver(driver_id, Self::since(range))
            .await?;
        Ok(rows.into_iter().map(BusOperated::from).collect())
    }

    pub async fn fuel_entries(
        &self,
        driver_id: i32,
        range: FuelRange,
    ) -> Result<Vec<FuelEntryEfficiency>, AppError> {
        let rows = self
            .repository
            .fuel_entry_trips(None, Some(driver_id), Self::since(range))
            .await?;
        Ok(rows.into_iter().map(FuelEntryEfficiency::from).collect())
    }

    // ----- Resúmenes -----

    pub async fn leaderboard(&self, range: FuelRange, limit: Option<i64>) -> Result<Vec<LeaderboardEntry>, AppError> {
        let limit = limit.unwrap_or(DEFAULT_LEADERBOARD_SIZE).clamp(1, 100) as usize;
        let drivers = self.drivers(range).await?;
        Ok(leaderboard(drivers, limit))
    }

    /// Incluye buses inactivos: un bus dado de baja con mal rendimiento sigue alertando
    pub async fn alerts(&self, range: FuelRange) -> Result<Vec<EfficiencyAlert>, AppError> {
        let since = Self::since(range);
        let (buses, drivers) = tokio::join!(
            self.repository.bus_aggregates(since, None, false),
            self.drivers(range),
        );
        let buses: Vec<BusEfficiency> = buses?.into_iter().map(BusEfficiency::from).collect();
        let alerts = efficiency_alerts(&buses, &drivers?);

        if !alerts.is_empty() {
            tracing::warn!("🚨 {} alertas de rendimiento de combustible ({})", alerts.len(), range.as_str());
        }
        Ok(alerts)
    }
}

/// Un conductor sólo puede consultar sus propios reportes
pub fn ensure_own_reports(user: &AuthenticatedUser, driver_id: i32) -> Result<(), AppError> {
    if user.role == Role::Driver && user.user_id != driver_id {
        return Err(AppError::Forbidden(
            "Drivers can only view their own fuel efficiency".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(user_id: i32, role: Role) -> AuthenticatedUser {
        AuthenticatedUser { user_id, role }
    }

    #[test]
    fn test_drivers_only_see_their_own_reports() {
        assert!(ensure_own_reports(&caller(4, Role::Driver), 4).is_ok());
        assert!(matches!(
            ensure_own_reports(&caller(4, Role::Driver), 5),
            Err(AppError::Forbidden(_))
        ));
        assert!(ensure_own_reports(&caller(1, Role::Admin), 5).is_ok());
        assert!(ensure_own_reports(&caller(2, Role::Accountant), 5).is_ok());
    }
}
