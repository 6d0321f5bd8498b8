use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::Role;

// Request de login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// Response de login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub name: String,
}

// Identidad del token actual
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: i32,
    pub role: Role,
}
