use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_role;

// Request para crear un usuario
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, message = "Name must have at least 2 characters"))]
    pub name: String,
    #[validate(custom = "validate_role")]
    pub role: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must have at least 6 characters"))]
    pub password: String,
    pub address: Option<String>,
    pub mobile: Option<String>,
    pub nic: Option<String>,
    #[serde(alias = "employe_number", alias = "employeeNumber")]
    pub employee_number: Option<String>,
    pub is_active: Option<bool>,
}

// Request para actualizar parcialmente un usuario
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, message = "Name must have at least 2 characters"))]
    pub name: Option<String>,
    #[validate(custom = "validate_role")]
    pub role: Option<String>,
    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must have at least 6 characters"))]
    pub password: Option<String>,
    pub address: Option<String>,
    pub mobile: Option<String>,
    pub nic: Option<String>,
    #[serde(alias = "employe_number", alias = "employeeNumber")]
    pub employee_number: Option<String>,
    pub is_active: Option<bool>,
}
