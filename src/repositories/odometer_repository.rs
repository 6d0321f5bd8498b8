use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::odometer::{DailyDistance, OdometerReading, ReadingType};
use crate::utils::errors::AppError;

const DAILY_DISTANCE_SELECT: &str = r#"
    SELECT
        m.assignment_id,
        m.driver_id,
        m.bus_id,
        m.reading_date,
        m.reading_km AS morning_reading,
        e.reading_km AS evening_reading,
        COALESCE(e.reading_km - m.reading_km, 0) AS distance_traveled,
        m.submitted_at AS morning_submitted_at,
        e.submitted_at AS evening_submitted_at
    FROM odometer_reading m
    LEFT JOIN odometer_reading e
        ON m.bus_id = e.bus_id
       AND m.reading_date = e.reading_date
       AND e.reading_type = 'evening'
"#;

#[derive(Debug, Clone)]
pub struct NewReading {
    pub assignment_id: i32,
    pub driver_id: i32,
    pub bus_id: i32,
    pub reading_type: ReadingType,
    pub reading_km: Decimal,
    pub reading_date: NaiveDate,
}

pub struct OdometerRepository {
    pool: PgPool,
}

impl OdometerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_type_and_date(
        &self,
        assignment_id: i32,
        reading_type: ReadingType,
        date: NaiveDate,
    ) -> Result<Option<OdometerReading>, AppError> {
        let reading = sqlx::query_as::<_, OdometerReading>(
            r#"
            SELECT * FROM odometer_reading
            WHERE assignment_id = $1 AND reading_type = $2 AND reading_date = $3
            "#,
        )
        .bind(assignment_id)
        .bind(reading_type)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reading)
    }

    /// Lecturas de la mañana y de la tarde de la asignación en el día
    pub async fn readings_for_day(
        &self,
        assignment_id: i32,
        date: NaiveDate,
    ) -> Result<Vec<OdometerReading>, AppError> {
        let readings = sqlx::query_as::<_, OdometerReading>(
            r#"
            SELECT * FROM odometer_reading
            WHERE assignment_id = $1 AND reading_date = $2
            ORDER BY reading_type
            "#,
        )
        .bind(assignment_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(readings)
    }

    /// Último día anterior a `before` con lectura de la mañana
    pub async fn previous_day(
        &self,
        bus_id: i32,
        before: NaiveDate,
    ) -> Result<Option<DailyDistance>, AppError> {
        let day = sqlx::query_as::<_, DailyDistance>(&format!(
            r#"
            {}
            WHERE m.bus_id = $1
              AND m.reading_type = 'morning'
              AND m.reading_date < $2
            ORDER BY m.reading_date DESC
            LIMIT 1
            "#,
            DAILY_DISTANCE_SELECT
        ))
        .bind(bus_id)
        .bind(before)
        .fetch_optional(&self.pool)
        .await?;

        Ok(day)
    }

    pub async fn daily_distances(&self, bus_id: i32, days: i32) -> Result<Vec<DailyDistance>, AppError> {
        let rows = sqlx::query_as::<_, DailyDistance>(&format!(
            r#"
            {}
            WHERE m.bus_id = $1
              AND m.reading_type = 'morning'
              AND m.reading_date >= CURRENT_DATE - $2::int
            ORDER BY m.reading_date DESC
            "#,
            DAILY_DISTANCE_SELECT
        ))
        .bind(bus_id)
        .bind(days)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Lectura más reciente del bus; en el mismo día la de la tarde va primero
    pub async fn latest_for_bus(&self, bus_id: i32) -> Result<Option<OdometerReading>, AppError> {
        let reading = sqlx::query_as::<_, OdometerReading>(
            r#"
            SELECT * FROM odometer_reading
            WHERE bus_id = $1
            ORDER BY reading_date DESC,
                     CASE reading_type WHEN 'evening' THEN 1 ELSE 2 END
            LIMIT 1
            "#,
        )
        .bind(bus_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reading)
    }

    /// Insertar o reemplazar la lectura (asignación, tipo, fecha)
    pub async fn upsert(&self, reading: NewReading) -> Result<OdometerReading, AppError> {
        let saved = sqlx::query_as::<_, OdometerReading>(
            r#"
            INSERT INTO odometer_reading (
                assignment_id, driver_id, bus_id, reading_type, reading_km, reading_date, submitted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (assignment_id, reading_type, reading_date)
            DO UPDATE SET
                reading_km = EXCLUDED.reading_km,
                submitted_at = EXCLUDED.submitted_at,
                updated_at = CURRENT_TIMESTAMP
            RETURNING *
            "#,
        )
        .bind(reading.assignment_id)
        .bind(reading.driver_id)
        .bind(reading.bus_id)
        .bind(reading.reading_type)
        .bind(reading.reading_km)
        .bind(reading.reading_date)
        .fetch_one(&self.pool)
        .await?;

        log::info!(
            "📏 Lectura {} de {} km para el bus {}",
            saved.reading_type.label(),
            saved.reading_km,
            saved.bus_id
        );
        Ok(saved)
    }
}
