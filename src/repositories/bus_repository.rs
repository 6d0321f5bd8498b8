use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::bus::Bus;
use crate::utils::errors::AppError;

/// Columnas de `bus` ya convertidas para la base de datos
#[derive(Debug, Default)]
pub struct BusFields {
    pub no_plate: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub number_of_seats: Option<i32>,
    pub fuel_type: Option<String>,
    pub fuel_tank_capacity: Option<Decimal>,
    pub wheel_count: Option<i32>,
    pub engine_cc: Option<i32>,
    pub year_of_manufacture: Option<i32>,
    pub is_active: Option<bool>,
}

pub struct BusRepository {
    pool: PgPool,
}

impl BusRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Bus>, AppError> {
        let buses = sqlx::query_as::<_, Bus>("SELECT * FROM bus ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(buses)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Bus>, AppError> {
        let bus = sqlx::query_as::<_, Bus>("SELECT * FROM bus WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(bus)
    }

    pub async fn exists(&self, id: i32) -> Result<bool, AppError> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM bus WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists.0)
    }

    pub async fn create(&self, no_plate: String, fields: BusFields) -> Result<Bus, AppError> {
        let now = Utc::now();
        let bus = sqlx::query_as::<_, Bus>(
            r#"
            INSERT INTO bus (no_plate, brand, model, number_of_seats, fuel_type, fuel_tank_capacity,
                             wheel_count, engine_cc, year_of_manufacture, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING *
            "#,
        )
        .bind(no_plate)
        .bind(fields.brand)
        .bind(fields.model)
        .bind(fields.number_of_seats)
        .bind(fields.fuel_type)
        .bind(fields.fuel_tank_capacity)
        .bind(fields.wheel_count)
        .bind(fields.engine_cc)
        .bind(fields.year_of_manufacture)
        .bind(fields.is_active.unwrap_or(true))
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        log::info!("🚌 Bus {} registrado ({})", bus.id, bus.no_plate);
        Ok(bus)
    }

    pub async fn update(&self, id: i32, fields: BusFields) -> Result<Option<Bus>, AppError> {
        let bus = sqlx::query_as::<_, Bus>(
            r#"
            UPDATE bus SET
                no_plate = COALESCE($2, no_plate),
                brand = COALESCE($3, brand),
                model = COALESCE($4, model),
                number_of_seats = COALESCE($5, number_of_seats),
                fuel_type = COALESCE($6, fuel_type),
                fuel_tank_capacity = COALESCE($7, fuel_tank_capacity),
                wheel_count = COALESCE($8, wheel_count),
                engine_cc = COALESCE($9, engine_cc),
                year_of_manufacture = COALESCE($10, year_of_manufacture),
                is_active = COALESCE($11, is_active),
                updated_at = $12
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fields.no_plate)
        .bind(fields.brand)
        .bind(fields.model)
        .bind(fields.number_of_seats)
        .bind(fields.fuel_type)
        .bind(fields.fuel_tank_capacity)
        .bind(fields.wheel_count)
        .bind(fields.engine_cc)
        .bind(fields.year_of_manufacture)
        .bind(fields.is_active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(bus)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM bus WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
