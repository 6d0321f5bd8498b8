//! Repuestos: catálogo, instalaciones por bus y bitácora de mantenimiento

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Entrada del catálogo de repuestos
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SparePart {
    pub id: i32,
    pub part_name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repuesto instalado en un bus con su presupuesto de distancia
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VehicleSparePart {
    pub id: i32,
    pub spare_part_id: i32,
    pub bus_id: i32,
    pub install_odometer: Decimal,
    pub install_date: NaiveDate,
    pub installed_by: Option<i32>,
    pub cost: Option<Decimal>,
    pub distance_limit: Decimal,
    pub brand: Option<String>,
    pub is_active: bool,
    pub boundary_limit: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_name: Option<String>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_description: Option<String>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_plate: Option<String>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bus_brand: Option<String>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bus_model: Option<String>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installer_name: Option<String>,
}

/// Instalación activa con el odómetro actual del bus
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ActivePartUsage {
    pub id: i32,
    pub spare_part_id: i32,
    pub part_name: String,
    pub bus_id: i32,
    pub no_plate: String,
    pub brand: Option<String>,
    pub install_odometer: Decimal,
    pub install_date: NaiveDate,
    pub distance_limit: Decimal,
    pub boundary_limit: Decimal,
    pub current_odometer: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MaintenanceLog {
    pub id: i32,
    pub vehicle_spare_part_id: Option<i32>,
    pub bus_id: i32,
    pub odometer_at_service: Option<Decimal>,
    pub action_taken: String,
    pub performed_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    #[sqlx(default)]
    pub no_plate: Option<String>,
    #[sqlx(default)]
    pub performed_by_name: Option<String>,
}
