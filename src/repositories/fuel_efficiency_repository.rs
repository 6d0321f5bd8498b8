//! Consultas agregadas de rendimiento de combustible
//!
//! `since = None` equivale a la ventana `all`.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::fuel_efficiency::{
    BusForDriver, BusFuelAggregate, DriverFuelAggregate, DriverOnBus, FuelEntryTrip,
};
use crate::utils::errors::AppError;

const BUS_AGGREGATE_QUERY: &str = r#"
    WITH bus_odometer AS (
        SELECT bus_id, MAX(reading_km) - MIN(reading_km) AS total_distance
        FROM odometer_reading
        WHERE ($1::date IS NULL OR reading_date >= $1)
        GROUP BY bus_id
    ),
    bus_fuel AS (
        SELECT
            bus_id,
            COUNT(id) AS trips,
            COALESCE(SUM(liters_filled), 0) AS total_fuel,
            COALESCE(SUM(total_cost), 0) AS total_cost
        FROM fuel_entries
        WHERE ($1::date IS NULL OR fuel_date >= $1)
        GROUP BY bus_id
    )
    SELECT
        b.id AS bus_id,
        b.no_plate AS reg_number,
        b.brand,
        b.model,
        b.year_of_manufacture AS year,
        b.is_active,
        COALESCE(bo.total_distance, 0) AS total_km,
        COALESCE(bf.total_fuel, 0) AS total_fuel,
        COALESCE(bf.total_cost, 0) AS total_cost,
        COALESCE(bf.trips, 0) AS trips
    FROM bus b
    LEFT JOIN bus_odometer bo ON b.id = bo.bus_id
    LEFT JOIN bus_fuel bf ON b.id = bf.bus_id
    WHERE ($2::int IS NULL OR b.id = $2)
      AND ($3::bool = FALSE OR b.is_active = TRUE)
    ORDER BY b.id
"#;

const DRIVER_AGGREGATE_QUERY: &str = r#"
    WITH driver_odometer AS (
        SELECT
            driver_id,
            MAX(reading_km) - MIN(reading_km) AS total_distance,
            COUNT(DISTINCT bus_id) AS bus_count
        FROM odometer_reading
        WHERE ($1::date IS NULL OR reading_date >= $1)
        GROUP BY driver_id
    ),
    driver_fuel AS (
        SELECT
            driver_id,
            COUNT(id) AS trips,
            COALESCE(SUM(liters_filled), 0) AS total_fuel,
            COALESCE(SUM(total_cost), 0) AS total_cost,
            COUNT(DISTINCT bus_id) AS bus_count
        FROM fuel_entries
        WHERE ($1::date IS NULL OR fuel_date >= $1)
        GROUP BY driver_id
    )
    SELECT
        u.id AS driver_id,
        u.name,
        u.nic,
        u.mobile AS phone,
        u.employee_number,
        u.created_at AS join_date,
        COALESCE(doo.total_distance, 0) AS total_km,
        COALESCE(df.total_fuel, 0) AS total_fuel,
        COALESCE(df.total_cost, 0) AS total_cost,
        COALESCE(df.trips, 0) AS trips,
        COALESCE(df.bus_count, doo.bus_count, 0) AS bus_count
    FROM users u
    LEFT JOIN driver_odometer doo ON u.id = doo.driver_id
    LEFT JOIN driver_fuel df ON u.id = df.driver_id
    WHERE u.role = 'driver'
      AND ($2::int IS NULL OR u.id = $2)
    ORDER BY u.id
"#;

pub struct FuelEfficiencyRepository {
    pool: PgPool,
}

impl FuelEfficiencyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Agregados por bus; `bus_id = None` trae la flota completa
    pub async fn bus_aggregates(
        &self,
        since: Option<NaiveDate>,
        bus_id: Option<i32>,
        active_only: bool,
    ) -> Result<Vec<BusFuelAggregate>, AppError> {
        let rows = sqlx::query_as::<_, BusFuelAggregate>(BUS_AGGREGATE_QUERY)
            .bind(since)
            .bind(bus_id)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;

        log::debug!("⛽ Agregados de {} buses", rows.len());
        Ok(rows)
    }

    pub async fn driver_aggregates(
        &self,
        since: Option<NaiveDate>,
        driver_id: Option<i32>,
    ) -> Result<Vec<DriverFuelAggregate>, AppError> {
        let rows = sqlx::query_as::<_, DriverFuelAggregate>(DRIVER_AGGREGATE_QUERY)
            .bind(since)
            .bind(driver_id)
            .fetch_all(&self.pool)
            .await?;

        log::debug!("⛽ Agregados de {} conductores", rows.len());
        Ok(rows)
    }

    /// Conductores con cargas en el bus, el de más kilómetros primero
    pub async fn drivers_on_bus(
        &self,
        bus_id: i32,
        since: Option<NaiveDate>,
    ) -> Result<Vec<DriverOnBus>, AppError> {
        let rows = sqlx::query_as::<_, DriverOnBus>(
            r#"
            WITH driver_odo AS (
                SELECT driver_id, MAX(reading_km) - MIN(reading_km) AS km_driven
                FROM odometer_reading
                WHERE bus_id = $1 AND ($2::date IS NULL OR reading_date >= $2)
                GROUP BY driver_id
            ),
            driver_fuel AS (
                SELECT
                    driver_id,
                    COUNT(id) AS trips,
                    COALESCE(SUM(liters_filled), 0) AS fuel_used,
                    COALESCE(SUM(total_cost), 0) AS fuel_cost
                FROM fuel_entries
                WHERE bus_id = $1 AND ($2::date IS NULL OR fuel_date >= $2)
                GROUP BY driver_id
            )
            SELECT
                u.id AS driver_id,
                u.name,
                u.employee_number,
                u.mobile AS phone,
                u.nic,
                COALESCE(doo.km_driven, 0) AS km_driven,
                df.fuel_used,
                df.fuel_cost,
                df.trips
            FROM users u
            INNER JOIN driver_fuel df ON u.id = df.driver_id
            LEFT JOIN driver_odo doo ON u.id = doo.driver_id
            WHERE u.role = 'driver'
            ORDER BY km_driven DESC
            "#,
        )
        .bind(bus_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Buses en los que el conductor cargó combustible
    pub async fn buses_for_driver(
        &self,
        driver_id: i32,
        since: Option<NaiveDate>,
    ) -> Result<Vec<BusForDriver>, AppError> {
        let rows = sqlx::query_as::<_, BusForDriver>(
            r#"
            WITH bus_odo AS (
                SELECT bus_id, MAX(reading_km) - MIN(reading_km) AS km_driven
                FROM odometer_reading
                WHERE driver_id = $1 AND ($2::date IS NULL OR reading_date >= $2)
                GROUP BY bus_id
            ),
            bus_fuel AS (
                SELECT
                    bus_id,
                    COUNT(id) AS trips,
                    COALESCE(SUM(liters_filled), 0) AS fuel_used,
                    COALESCE(SUM(total_cost), 0) AS fuel_cost
                FROM fuel_entries
                WHERE driver_id = $1 AND ($2::date IS NULL OR fuel_date >= $2)
                GROUP BY bus_id
            )
            SELECT
                b.id AS bus_id,
                b.no_plate AS reg_number,
                b.brand,
                b.model,
                b.year_of_manufacture AS year,
                COALESCE(bo.km_driven, 0) AS km_driven,
                bf.fuel_used,
                bf.fuel_cost,
                bf.trips
            FROM bus b
            INNER JOIN bus_fuel bf ON b.id = bf.bus_id
            LEFT JOIN bus_odo bo ON b.id = bo.bus_id
            ORDER BY km_driven DESC
            "#,
        )
        .bind(driver_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Cargas filtradas por bus y/o conductor, las más recientes primero
    pub async fn fuel_entry_trips(
        &self,
        bus_id: Option<i32>,
        driver_id: Option<i32>,
        since: Option<NaiveDate>,
    ) -> Result<Vec<FuelEntryTrip>, AppError> {
        let rows = sqlx::query_as::<_, FuelEntryTrip>(
            r#"
            SELECT
                fe.id,
                fe.fuel_date,
                u.id AS driver_id,
                u.name AS driver_name,
                u.employee_number AS driver_employee_number,
                b.id AS bus_id,
                b.no_plate AS bus_reg_number,
                b.brand AS bus_brand,
                b.model AS bus_model,
                vda.route,
                fe.odometer_at_fueling,
                (
                    SELECT reading_km FROM odometer_reading
                    WHERE assignment_id = fe.assignment_id
                      AND reading_date = fe.fuel_date
                      AND reading_type = 'morning'
                    LIMIT 1
                ) AS morning_reading,
                (
                    SELECT reading_km FROM odometer_reading
                    WHERE assignment_id = fe.assignment_id
                      AND reading_date = fe.fuel_date
                      AND reading_type = 'evening'
                    LIMIT 1
                ) AS evening_reading,
                fe.liters_filled,
                fe.total_cost,
                fe.price_per_liter,
                fe.fuel_station,
                fe.notes,
                fe.created_at
            FROM fuel_entries fe
            LEFT JOIN users u ON fe.driver_id = u.id
            LEFT JOIN bus b ON fe.bus_id = b.id
            LEFT JOIN vehicle_driver_assignment vda
                ON vda.vehicle_driver_assignmentid = fe.assignment_id
            WHERE ($1::int IS NULL OR fe.bus_id = $1)
              AND ($2::int IS NULL OR fe.driver_id = $2)
              AND ($3::date IS NULL OR fe.fuel_date >= $3)
            ORDER BY fe.fuel_date DESC, fe.created_at DESC
            "#,
        )
        .bind(bus_id)
        .bind(driver_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
