//! Administración de usuarios

use sqlx::PgPool;
use validator::Validate;

use crate::dto::user_dto::{CreateUserRequest, UpdateUserRequest};
use crate::models::user::{Role, UserResponse};
use crate::repositories::user_repository::{NewUser, UserChanges, UserRepository};
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::password::hash_password;

pub struct UserController {
    repository: UserRepository,
}

impl UserController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreateUserRequest) -> Result<UserResponse, AppError> {
        request.validate()?;

        let role = parse_role(&request.role)?;
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
                password_hash: hash_password(&request.password)?,
                is_active: request.is_active.unwrap_or(true),
            })
            .await?;

        Ok(user.into())
    }

    pub async fn list(&self) -> Result<Vec<UserResponse>, AppError> {
        let users = self.repository.list().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<UserResponse, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| not_found_error("User not found"))
    }

    pub async fn update(&self, id: i32, request: UpdateUserRequest) -> Result<UserResponse, AppError> {
        request.validate()?;

        let role = request.role.as_deref().map(parse_role).transpose()?;
        let password_hash = request.password.as_deref().map(hash_password).transpose()?;

        let changes = UserChanges {
            name: request.name.map(|n| n.trim().to_string()),
            address: request.address,
            mobile: request.mobile,
            role,
            nic: request.nic,
            employee_number: request.employee_number,
            email: request.email.map(|e| e.trim().to_string()),
            password_hash,
            is_active: request.is_active,
        };

        self.repository
            .update(id, changes)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| not_found_error("User not found"))
    }
}

fn parse_role(value: &str) -> Result<Role, AppError> {
    value.parse::<Role>().map_err(AppError::BadRequest)
}
