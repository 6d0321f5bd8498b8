//! Cuerpos de repuestos, instalaciones y bitácora

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::odometer::{OdometerReading, ReadingType};
use crate::models::spare_part::{ActivePartUsage, VehicleSparePart};
use crate::services::spare_part_wear_service::{part_wear, WearStatus};
use crate::utils::numeric::to_f64;
use crate::utils::validation::{validate_date_str, validate_not_blank};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSparePartRequest {
    #[validate(
        custom(function = "validate_not_blank", message = "Part name cannot be empty"),
        length(max = 255, message = "Part name cannot exceed 255 characters")
    )]
    pub part_name: String,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSparePartRequest {
    #[validate(
        custom(function = "validate_not_blank", message = "Part name cannot be empty"),
        length(max = 255, message = "Part name cannot exceed 255 characters")
    )]
    pub part_name: Option<String>,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,
}

/// Filtros de `GET /vehicle/all`
#[derive(Debug, Default, Deserialize)]
pub struct InstallationFilters {
    pub bus_id: Option<i32>,
    pub is_active: Option<bool>,
    pub spare_part_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MaintenanceLogFilters {
    pub bus_id: Option<i32>,
}

/// Instalación de un repuesto; en un reemplazo la pieza y el bus salen de la instalación anterior
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InstallSparePartRequest {
    #[validate(range(min = 1, message = "Invalid spare part ID"))]
    pub spare_part_id: Option<i32>,
    #[validate(range(min = 1, message = "Invalid bus ID"))]
    pub bus_id: Option<i32>,
    #[validate(range(min = 0.0, message = "Install odometer must be a valid positive number"))]
    pub install_odometer: f64,
    #[validate(custom = "validate_date_str")]
    pub install_date: Option<String>,
    #[validate(range(min = 1, message = "Invalid installer ID"))]
    pub installed_by: Option<i32>,
    #[validate(range(min = 0.0, message = "Cost must be a valid positive number"))]
    pub cost: Option<f64>,
    #[validate(range(min = 0.01, message = "Distance limit must be a valid positive number"))]
    pub distance_limit: f64,
    #[validate(
        custom(function = "validate_not_blank", message = "Brand cannot be empty"),
        length(max = 120, message = "Brand cannot exceed 120 characters")
    )]
    pub brand: String,
    pub is_active: Option<bool>,
    #[validate(range(min = 0.0, message = "Boundary limit must be a valid positive number"))]
    pub boundary_limit: f64,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateInstallationRequest {
    pub is_active: Option<bool>,
    #[validate(range(min = 0.0, message = "Cost must be a valid positive number"))]
    pub cost: Option<f64>,
    #[validate(
        custom(function = "validate_not_blank", message = "Brand cannot be empty"),
        length(max = 120, message = "Brand cannot exceed 120 characters")
    )]
    pub brand: Option<String>,
    #[validate(range(min = 0.01, message = "Distance limit must be a valid positive number"))]
    pub distance_limit: Option<f64>,
    #[validate(range(min = 0.0, message = "Boundary limit must be a valid positive number"))]
    pub boundary_limit: Option<f64>,
}

/// El aviso de reemplazo tiene que llegar antes de agotar la distancia
pub fn limits_are_consistent(boundary_limit: f64, distance_limit: f64) -> bool {
    boundary_limit < distance_limit
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplacementResult {
    pub old_part: VehicleSparePart,
    pub new_part: VehicleSparePart,
}

/// Instalación activa con su desgaste calculado
#[derive(Debug, Serialize)]
pub struct PartStatus {
    #[serde(flatten)]
    pub part: ActivePartUsage,
    pub distance_used: f64,
    pub remaining_distance: f64,
    pub status: WearStatus,
}

impl From<ActivePartUsage> for PartStatus {
    fn from(part: ActivePartUsage) -> Self {
        let wear = part_wear(
            to_f64(part.install_odometer),
            Some(to_f64(part.current_odometer)),
            to_f64(part.distance_limit),
            to_f64(part.boundary_limit),
        );
        Self {
            part,
            distance_used: wear.distance_used,
            remaining_distance: wear.remaining_distance,
            status: wear.status,
        }
    }
}

impl PartStatus {
    pub fn needs_replacement(&self) -> bool {
        self.remaining_distance <= to_f64(self.part.boundary_limit)
    }
}

/// Última lectura del bus, o 0 con un mensaje si nunca se registró una
#[derive(Debug, Serialize)]
pub struct LatestOdometer {
    pub reading_km: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_type: Option<ReadingType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<Option<OdometerReading>> for LatestOdometer {
    fn from(reading: Option<OdometerReading>) -> Self {
        match reading {
            Some(r) => Self {
                reading_km: r.reading_km,
                reading_date: Some(r.reading_date),
                reading_type: Some(r.reading_type),
                message: None,
            },
            None => Self {
                reading_km: Decimal::ZERO,
                reading_date: None,
                reading_type: None,
                message: Some("No odometer reading found".to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn usage(install: f64, current: f64, limit: f64, boundary: f64) -> ActivePartUsage {
        ActivePartUsage {
            id: 1,
            spare_part_id: 2,
            part_name: "Brake pads".to_string(),
            bus_id: 3,
            no_plate: "NB-1020".to_string(),
            brand: Some("Bosch".to_string()),
            install_odometer: Decimal::from_f64(install).unwrap(),
            install_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            distance_limit: Decimal::from_f64(limit).unwrap(),
            boundary_limit: Decimal::from_f64(boundary).unwrap(),
            current_odometer: Decimal::from_f64(current).unwrap(),
        }
    }

    #[test]
    fn test_part_status_from_usage() {
        let status = PartStatus::from(usage(20_000.0, 29_700.0, 10_000.0, 500.0));
        assert_eq!(status.distance_used, 9_700.0);
        assert_eq!(status.remaining_distance, 300.0);
        assert_eq!(status.status, WearStatus::Warning);
        assert!(status.needs_replacement());

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["part_name"], "Brake pads");
        assert_eq!(json["status"], "WARNING");
    }

    #[test]
    fn test_fresh_part_is_ok() {
        let status = PartStatus::from(usage(20_000.0, 20_000.0, 10_000.0, 500.0));
        assert_eq!(status.status, WearStatus::Ok);
        assert!(!status.needs_replacement());
    }

    #[test]
    fn test_latest_odometer_without_readings() {
        let json = serde_json::to_value(LatestOdometer::from(None)).unwrap();
        assert_eq!(json["reading_km"], 0.0);
        assert_eq!(json["message"], "No odometer reading found");
        assert!(json.get("reading_date").is_none());
    }

    #[test]
    fn test_install_request_validation() {
        let request: InstallSparePartRequest = serde_json::from_str(
            r#"{"spare_part_id": 1, "bus_id": 2, "install_odometer": 12000, "distance_limit": 0,
                "brand": "Bosch", "boundary_limit": 100}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
        assert!(limits_are_consistent(500.0, 10_000.0));
        assert!(!limits_are_consistent(10_000.0, 10_000.0));
    }
}
