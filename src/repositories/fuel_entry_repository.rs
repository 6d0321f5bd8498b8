use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::models::fuel::FuelEntry;
use crate::utils::errors::AppError;

#[derive(Debug, Clone)]
pub struct NewFuelEntry {
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
}

/// Totales de combustible de un bus en un rango de fechas
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FuelCostSummary {
    pub total_cost: Decimal,
    pub total_liters: Decimal,
    pub entries: i64,
}

pub struct FuelEntryRepository {
    pool: PgPool,
}

impl FuelEntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, entry: NewFuelEntry) -> Result<FuelEntry, AppError> {
        let saved = sqlx::query_as::<_, FuelEntry>(
            r#"
            INSERT INTO fuel_entries (
                assignment_id, driver_id, bus_id, odometer_at_fueling,
                liters_filled, price_per_liter, total_cost, fuel_station, notes, fuel_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(entry.assignment_id)
        .bind(entry.driver_id)
        .bind(entry.bus_id)
        .bind(entry.odometer_at_fueling)
        .bind(entry.liters_filled)
        .bind(entry.price_per_liter)
        .bind(entry.total_cost)
        .bind(entry.fuel_station)
        .bind(entry.notes)
        .bind(entry.fuel_date)
        .fetch_one(&self.pool)
        .await?;

        log::info!(
            "⛽ Carga {} registrada: {} L para el bus {}",
            saved.id,
            saved.liters_filled,
            saved.bus_id
        );
        Ok(saved)
    }

    /// Cargas del bus, de mayor a menor odómetro
    pub async fn by_bus(&self, bus_id: i32, limit: i64) -> Result<Vec<FuelEntry>, AppError> {
        let entries = sqlx::query_as::<_, FuelEntry>(
            r#"
            SELECT * FROM fuel_entries
            WHERE bus_id = $1
            ORDER BY odometer_at_fueling DESC
            LIMIT $2
            "#,
        )
        .bind(bus_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn by_driver(&self, driver_id: i32, limit: i64) -> Result<Vec<FuelEntry>, AppError> {
        let entries = sqlx::query_as::<_, FuelEntry>(
            r#"
            SELECT * FROM fuel_entries
            WHERE driver_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(driver_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn cost_summary(
        &self,
        bus_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<FuelCostSummary, AppError> {
        let summary = sqlx::query_as::<_, FuelCostSummary>(
            r#"
            SELECT
                COALESCE(SUM(total_cost), 0) AS total_cost,
                COALESCE(SUM(liters_filled), 0) AS total_liters,
                COUNT(*) AS entries
            FROM fuel_entries
            WHERE bus_id = $1
              AND fuel_date >= $2
              AND fuel_date <= $3
            "#,
        )
        .bind(bus_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }
}
