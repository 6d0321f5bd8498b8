//! Asignaciones bus-conductor

use sqlx::PgPool;
use validator::Validate;

use crate::dto::assignment_dto::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest};
use crate::models::assignment::Assignment;
use crate::models::user::Role;
use crate::repositories::assignment_repository::{AssignmentChanges, AssignmentRepository};
use crate::repositories::bus_repository::BusRepository;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{bad_request_error, not_found_error, AppError};

pub struct AssignmentController {
    repository: AssignmentRepository,
    buses: BusRepository,
    users: UserRepository,
}

impl AssignmentController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: AssignmentRepository::new(pool.clone()),
            buses: BusRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    pub async fn list(&self, query: AssignmentListQuery) -> Result<Vec<Assignment>, AppError> {
        query.validate()?;
        self.repository.list(&query).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Assignment, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Assignment not found"))
    }

    pub async fn create(&self, request: CreateAssignmentRequest) -> Result<Assignment, AppError> {
        request.validate()?;

        self.ensure_vehicle(request.vehicle_id).await?;
        self.ensure_driver(request.employee_id).await?;

        self.repository
            .create(
                request.vehicle_id,
                request.employee_id,
                request.start_date,
                request.end_date,
                request.route.trim().to_string(),
            )
            .await
    }

    pub async fn update(&self, id: i32, request: UpdateAssignmentRequest) -> Result<Assignment, AppError> {
        request.validate()?;

        if let Some(employee_id) = request.employee_id {
            self.ensure_driver(employee_id).await?;
        }
        if let Some(vehicle_id) = request.vehicle_id {
            self.ensure_vehicle(vehicle_id).await?;
        }

        let changes = AssignmentChanges {
            vehicle_id: request.vehicle_id,
            employee_id: request.employee_id,
            start_date: request.start_date,
            end_date: request.end_date,
            route: request.route.map(|r| r.trim().to_string()),
        };

        self.repository
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found_error("Assignment not found"))
    }

    /// Idempotente: un id inexistente también responde 204
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            log::debug!("🗑️ Asignación {} ya no existía", id);
        }
        Ok(())
    }

    async fn ensure_vehicle(&self, vehicle_id: i32) -> Result<(), AppError> {
        if !self.buses.exists(vehicle_id).await? {
            return Err(not_found_error("Vehicle not found"));
        }
        Ok(())
    }

    async fn ensure_driver(&self, employee_id: i32) -> Result<(), AppError> {
        let user = self
            .users
            .find_by_id(employee_id)
            .await?
            .ok_or_else(|| not_found_error("User not found"))?;

        if user.role != Role::Driver {
            return Err(bad_request_error("User is not a driver"));
        }
        Ok(())
    }
}
