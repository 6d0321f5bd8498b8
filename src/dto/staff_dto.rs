use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::{validate_not_blank, validate_role};

// Request para registrar personal (conductores y contadores)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStaffRequest {
    #[validate(custom = "validate_not_blank")]
    pub name: String,
    pub address: Option<String>,
    pub mobile: Option<String>,
    #[validate(custom = "validate_role")]
    pub role: String,
    pub nic: Option<String>,
    #[serde(alias = "employe_number", alias = "employeeNumber")]
    pub employee_number: Option<String>,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must have at least 6 characters"))]
    pub password: String,
    pub is_active: Option<bool>,
}

// Request para reemplazar los datos de un miembro del personal
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStaffRequest {
    #[validate(custom = "validate_not_blank")]
    pub name: String,
    pub address: Option<String>,
    pub mobile: Option<String>,
    pub nic: Option<String>,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    /// Vacío o ausente conserva la contraseña actual
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct NextEmployeeNumberQuery {
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextEmployeeNumberResponse {
    pub employee_number: String,
}
