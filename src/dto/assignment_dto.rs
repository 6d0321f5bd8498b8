use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::utils::validation::{deserialize_nullable_datetime, deserialize_optional_datetime};

// Request para crear una asignación bus-conductor
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_create_range", skip_on_field_errors = false))]
pub struct CreateAssignmentRequest {
    #[serde(alias = "vehicleId")]
    #[validate(range(min = 1, message = "vehicle_id must be a positive integer"))]
    pub vehicle_id: i32,
    #[serde(alias = "employeeId")]
    #[validate(range(min = 1, message = "employee_id must be a positive integer"))]
    pub employee_id: i32,
    /// Ausente: la base de datos usa `NOW()`
    #[serde(default, alias = "startDate", deserialize_with = "deserialize_optional_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, alias = "endDate", deserialize_with = "deserialize_optional_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, max = 120, message = "Route must have between 1 and 120 characters"))]
    pub route: String,
}

// Request para modificar una asignación; `end_date: null` la deja abierta
#[derive(Debug, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_update_range", skip_on_field_errors = false))]
pub struct UpdateAssignmentRequest {
    #[serde(default, alias = "vehicleId")]
    #[validate(range(min = 1, message = "vehicle_id must be a positive integer"))]
    pub vehicle_id: Option<i32>,
    #[serde(default, alias = "employeeId")]
    #[validate(range(min = 1, message = "employee_id must be a positive integer"))]
    pub employee_id: Option<i32>,
    #[serde(default, alias = "startDate", deserialize_with = "deserialize_optional_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, alias = "endDate", deserialize_with = "deserialize_nullable_datetime")]
    pub end_date: Option<Option<DateTime<Utc>>>,
    #[validate(length(min = 1, max = 120, message = "Route must have between 1 and 120 characters"))]
    pub route: Option<String>,
}

// Filtros del listado
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AssignmentListQuery {
    #[serde(alias = "vehicleId")]
    pub vehicle_id: Option<i32>,
    #[serde(alias = "employeeId")]
    pub employee_id: Option<i32>,
    pub active: Option<String>,
    #[validate(range(min = 1, max = 200, message = "limit must be between 1 and 200"))]
    pub limit: Option<i64>,
    #[validate(range(min = 0, message = "offset cannot be negative"))]
    pub offset: Option<i64>,
}

impl AssignmentListQuery {
    pub fn active_only(&self) -> bool {
        self.active.as_deref() == Some("true")
    }
}

fn range_error() -> ValidationError {
    let mut error = ValidationError::new("date_range");
    error.message = Some("end_date must be on or after start_date".into());
    error
}

fn validate_create_range(request: &CreateAssignmentRequest) -> Result<(), ValidationError> {
    match (request.start_date, request.end_date) {
        (Some(start), Some(end)) if end < start => Err(range_error()),
        _ => Ok(()),
    }
}

fn validate_update_range(request: &UpdateAssignmentRequest) -> Result<(), ValidationError> {
    match (request.start_date, request.end_date) {
        (Some(start), Some(Some(end))) if end < start => Err(range_error()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_aliases_and_date_formats() {
        let request: CreateAssignmentRequest = serde_json::from_str(
            r#"{"vehicleId": 3, "employeeId": 9, "startDate": "2026-05-01", "endDate": "2026-05-31 18:00", "route": "Galle - Matara"}"#,
        )
        .unwrap();
        assert_eq!(request.vehicle_id, 3);
        assert_eq!(request.employee_id, 9);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let request: CreateAssignmentRequest = serde_json::from_str(
            r#"{"vehicle_id": 1, "employee_id": 2, "start_date": "2026-05-10", "end_date": "2026-05-01", "route": "A"}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_route_length_bounds() {
        let long_route = "x".repeat(121);
        let request = CreateAssignmentRequest {
            vehicle_id: 1,
            employee_id: 2,
            start_date: None,
            end_date: None,
            route: long_route,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_patch_can_clear_end_date() {
        let request: UpdateAssignmentRequest =
            serde_json::from_str(r#"{"end_date": null}"#).unwrap();
        assert_eq!(request.end_date, Some(None));

        let untouched: UpdateAssignmentRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(untouched.end_date, None);
    }
}
