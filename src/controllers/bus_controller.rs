use sqlx::PgPool;
use validator::Validate;

use crate::dto::bus_dto::{CreateBusRequest, UpdateBusRequest};
use crate::models::bus::Bus;
use crate::repositories::bus_repository::{BusFields, BusRepository};
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::numeric::to_decimal_opt;

pub struct BusController {
    repository: BusRepository,
}

impl BusController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BusRepository::new(pool),
        }
    }

    pub async fn list(&self) -> Result<Vec<Bus>, AppError> {
        self.repository.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Bus, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Bus not found"))
    }

    pub async fn create(&self, request: CreateBusRequest) -> Result<Bus, AppError> {
        request.validate()?;

        // La matrícula duplicada llega como violación de unicidad (409)
        let fields = BusFields {
            no_plate: None,
            brand: request.brand,
            model: request.model,
            number_of_seats: request.number_of_seats,
            fuel_type: request.fuel_type,
            fuel_tank_capacity: to_decimal_opt(request.fuel_tank_capacity, "fuel_tank_capacity")?,
            wheel_count: request.wheel_count,
            engine_cc: request.engine_cc,
            year_of_manufacture: request.year_of_manufacture,
            is_active: request.is_active,
        };

        self.repository
            .create(request.no_plate.trim().to_string(), fields)
            .await
    }

    pub async fn update(&self, id: i32, request: UpdateBusRequest) -> Result<Bus, AppError> {
        request.validate()?;

        let fields = BusFields {
            no_plate: request.no_plate.map(|p| p.trim().to_string()),
            brand: request.brand,
            model: request.model,
            number_of_seats: request.number_of_seats,
            fuel_type: request.fuel_type,
            fuel_tank_capacity: to_decimal_opt(request.fuel_tank_capacity, "fuel_tank_capacity")?,
            wheel_count: request.wheel_count,
            engine_cc: request.engine_cc,
            year_of_manufacture: request.year_of_manufacture,
            is_active: request.is_active,
        };

        self.repository
            .update(id, fields)
            .await?
            .ok_or_else(|| not_found_error("Bus not found"))
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Bus not found"));
        }
        log::info!("🗑️ Bus {} eliminado", id);
        Ok(())
    }
}
