use serde::Deserialize;
use validator::Validate;

// Request para registrar un bus
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBusRequest {
    #[validate(length(min = 3, message = "Plate number must have at least 3 characters"))]
    pub no_plate: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    #[validate(range(min = 0, message = "Number of seats cannot be negative"))]
    pub number_of_seats: Option<i32>,
    pub fuel_type: Option<String>,
    #[validate(range(min = 0.0, message = "Fuel tank capacity cannot be negative"))]
    pub fuel_tank_capacity: Option<f64>,
    #[validate(range(min = 0, message = "Wheel count cannot be negative"))]
    pub wheel_count: Option<i32>,
    #[validate(range(min = 0, message = "Engine capacity cannot be negative"))]
    pub engine_cc: Option<i32>,
    #[validate(range(min = 0, message = "Year of manufacture cannot be negative"))]
    pub year_of_manufacture: Option<i32>,
    pub is_active: Option<bool>,
}

// Request para actualizar parcialmente un bus
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateBusRequest {
    #[validate(length(min = 3, message = "Plate number must have at least 3 characters"))]
    pub no_plate: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    #[validate(range(min = 0, message = "Number of seats cannot be negative"))]
    pub number_of_seats: Option<i32>,
    pub fuel_type: Option<String>,
    #[validate(range(min = 0.0, message = "Fuel tank capacity cannot be negative"))]
    pub fuel_tank_capacity: Option<f64>,
    #[validate(range(min = 0, message = "Wheel count cannot be negative"))]
    pub wheel_count: Option<i32>,
    #[validate(range(min = 0, message = "Engine capacity cannot be negative"))]
    pub engine_cc: Option<i32>,
    #[validate(range(min = 0, message = "Year of manufacture cannot be negative"))]
    pub year_of_manufacture: Option<i32>,
    pub is_active: Option<bool>,
}
