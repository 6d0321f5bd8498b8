//! Gestión del personal (conductores y contadores)

use sqlx::PgPool;
use validator::Validate;

use crate::dto::staff_dto::{CreateStaffRequest, NextEmployeeNumberResponse, UpdateStaffRequest};
use crate::models::user::{Role, UserResponse};
use crate::repositories::user_repository::{NewUser, UserRepository};
use crate::services::staff_number_service::{employee_prefix, next_employee_number};
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::password::{ensure_hashed, hash_password};

pub struct StaffController {
    repository: UserRepository,
}

impl StaffController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    pub async fn list(&self) -> Result<Vec<UserResponse>, AppError> {
        let staff = self.repository.list_staff().await?;
        Ok(staff.into_iter().map(UserResponse::from).collect())
    }

    /// Un rol desconocido o ausente numera como contador
    pub async fn next_employee_number(
        &self,
        role: Option<&str>,
    ) -> Result<NextEmployeeNumberResponse, AppError> {
        let role = role
            .and_then(|r| r.parse::<Role>().ok())
            .unwrap_or(Role::Accountant);
        let last = self
            .repository
            .last_employee_number(employee_prefix(role))
            .await?;

        Ok(NextEmployeeNumberResponse {
            employee_number: next_employee_number(role, last.as_deref()),
        })
    }

    pub async fn create(&self, request: CreateStaffRequest) -> Result<UserResponse, AppError> {
        request.validate()?;

        let role = request
            .role
            .parse::<Role>()
            .map_err(AppError::BadRequest)?;

        let user = self
            .repository
            .create(NewUser {
                name: request.name.trim().to_string(),
                address: request.address,
                mobile: request.mobile,
                role,
                nic: request.nic,
                employee_number: request.employee_number,
                email: request.email.trim().to_string(),
                password_hash: ensure_hashed(&request.password)?,
                is_active: request.is_active.unwrap_or(true),
            })
            .await?;

        Ok(user.into())
    }

    pub async fn update(&self, id: i32, request: UpdateStaffRequest) -> Result<UserResponse, AppError> {
        request.validate()?;

        let password_hash = match request.password.as_deref().map(str::trim) {
            Some(password) if !password.is_empty() => Some(hash_password(password)?),
            _ => None,
        };

        self.repository
            .update_staff(
                id,
                request.name.trim().to_string(),
                request.address,
                request.mobile,
                request.nic,
                request.email.trim().to_string(),
                password_hash,
                request.is_active.unwrap_or(true),
            )
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| not_found_error("Staff not found"))
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Staff not found"));
        }
        Ok(())
    }
}
