//! Repuestos: catálogo, instalaciones, reemplazos y alertas de desgaste
//!
//! Cada escritura sobre una instalación deja su entrada en `maintenance_log`
//! dentro de la misma transacción.

use chrono::Utc;
use sqlx::PgPool;
use validator::Validate;

use crate::dto::spare_part_dto::{
    limits_are_consistent, CreateSparePartRequest, InstallSparePartRequest, InstallationFilters,
    LatestOdometer, PartStatus, ReplacementResult, UpdateInstallationRequest, UpdateSparePartRequest,
};
use crate::models::spare_part::{MaintenanceLog, SparePart, VehicleSparePart};
use crate::repositories::bus_repository::BusRepository;
use crate::repositories::odometer_repository::OdometerRepository;
use crate::repositories::spare_part_repository::{NewInstallation, NewMaintenanceLog, SparePartRepository};
use crate::utils::errors::{bad_request_error, not_found_error, AppError};
use crate::utils::numeric::{to_decimal, to_decimal_opt, to_f64};
use crate::utils::validation::validate_date;

const DUPLICATE_NAME: &str = "A spare part with this name already exists";
const LIMITS_MESSAGE: &str = "Boundary limit must be less than distance limit";

pub struct SparePartController {
    repository: SparePartRepository,
    buses: BusRepository,
    odometer: OdometerRepository,
}

impl SparePartController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: SparePartRepository::new(pool.clone()),
            buses: BusRepository::new(pool.clone()),
            odometer: OdometerRepository::new(pool),
        }
    }

    // ----- Catálogo -----

    pub async fn list_parts(&self) -> Result<Vec<SparePart>, AppError> {
        self.repository.list_parts().await
    }

    pub async fn get_part(&self, id: i32) -> Result<SparePart, AppError> {
        self.repository
            .find_part(id)
            .await?
            .ok_or_else(|| not_found_error("Spare part not found"))
    }

    pub async fn create_part(&self, request: CreateSparePartRequest) -> Result<SparePart, AppError> {
        request.validate()?;

        let name = request.part_name.trim();
        if self.repository.find_part_by_name(name).await?.is_some() {
            return Err(AppError::Conflict(DUPLICATE_NAME.to_string()));
        }

        let description = request
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());
        self.repository.create_part(name, description).await
    }

    pub async fn update_part(&self, id: i32, request: UpdateSparePartRequest) -> Result<SparePart, AppError> {
        request.validate()?;

        let existing = self.get_part(id).await?;
        let name = request.part_name.as_deref().map(str::trim);

        if let Some(name) = name.filter(|n| *n != existing.part_name) {
            let duplicate = self.repository.find_part_by_name(name).await?;
            if duplicate.map_or(false, |d| d.id != id) {
                return Err(AppError::Conflict(DUPLICATE_NAME.to_string()));
            }
        }

        self.repository
            .update_part(id, name, request.description.as_deref().map(str::trim))
            .await?
            .ok_or_else(|| not_found_error("Spare part not found"))
    }

    pub async fn delete_part(&self, id: i32) -> Result<(), AppError> {
        if !self.repository.delete_part(id).await? {
            return Err(not_found_error("Spare part not found"));
        }
        Ok(())
    }

    // ----- Instalaciones -----

    pub async fn list_installations(&self, filters: InstallationFilters) -> Result<Vec<VehicleSparePart>, AppError> {
        self.repository.list_installations(&filters).await
    }

    pub async fn get_installation(&self, id: i32) -> Result<VehicleSparePart, AppError> {
        self.repository
            .find_installation(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle spare part installation not found"))
    }

    pub async fn install(&self, performed_by: i32, request: InstallSparePartRequest) -> Result<VehicleSparePart, AppError> {
        request.validate()?;

        let (Some(spare_part_id), Some(bus_id)) = (request.spare_part_id, request.bus_id) else {
            return Err(bad_request_error("Spare part ID and Bus ID are required"));
        };
        self.get_part(spare_part_id).await?;
        if !self.buses.exists(bus_id).await? {
            return Err(not_found_error("Bus not found"));
        }

        let installation = new_installation(spare_part_id, bus_id, performed_by, &request)?;

        let mut tx = self.repository.begin().await?;
        let saved = SparePartRepository::insert_installation(&mut tx, &installation).await?;
        SparePartRepository::insert_log(
            &mut tx,
            NewMaintenanceLog {
                vehicle_spare_part_id: saved.id,
                bus_id: saved.bus_id,
                odometer_at_service: Some(saved.install_odometer),
                action_taken: format!("Installed new {} spare part", installation.brand),
                performed_by: installation.installed_by,
            },
        )
        .await?;
        tx.commit().await?;

        Ok(saved)
    }

    pub async fn update_installation(
        &self,
        id: i32,
        performed_by: i32,
        request: UpdateInstallationRequest,
    ) -> Result<VehicleSparePart, AppError> {
        request.validate()?;

        let mut tx = self.repository.begin().await?;
        let existing = SparePartRepository::lock_installation(&mut tx, id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle spare part installation not found"))?;

        let boundary = request.boundary_limit.unwrap_or(to_f64(existing.boundary_limit));
        let distance = request.distance_limit.unwrap_or(to_f64(existing.distance_limit));
        if !limits_are_consistent(boundary, distance) {
            return Err(bad_request_error(LIMITS_MESSAGE));
        }

        let updated = SparePartRepository::update_installation(&mut tx, id, &request)
            .await?
            .ok_or_else(|| not_found_error("Vehicle spare part installation not found"))?;

        if existing.is_active && request.is_active == Some(false) {
            SparePartRepository::insert_log(
                &mut tx,
                NewMaintenanceLog {
                    vehicle_spare_part_id: id,
                    bus_id: existing.bus_id,
                    odometer_at_service: Some(existing.install_odometer),
                    action_taken: "Spare part replaced/deactivated".to_string(),
                    performed_by: Some(performed_by),
                },
            )
            .await?;
        }
        tx.commit().await?;

        Ok(updated)
    }

    pub async fn delete_installation(&self, id: i32) -> Result<(), AppError> {
        if !self.repository.delete_installation(id).await? {
            return Err(not_found_error("Vehicle spare part installation not found"));
        }
        Ok(())
    }

    /// Desactiva la instalación y monta la nueva pieza en el mismo bus
    pub async fn replace(
        &self,
        id: i32,
        performed_by: i32,
        request: InstallSparePartRequest,
    ) -> Result<ReplacementResult, AppError> {
        request.validate()?;

        let mut tx = self.repository.begin().await?;
        let old = SparePartRepository::lock_installation(&mut tx, id)
            .await?
            .ok_or_else(|| not_found_error("Original spare part installation not found"))?;
        if !old.is_active {
            return Err(bad_request_error("This spare part has already been replaced"));
        }

        let installation = new_installation(old.spare_part_id, old.bus_id, performed_by, &request)?;

        let old_part = SparePartRepository::deactivate_installation(&mut tx, id).await?;
        SparePartRepository::insert_log(
            &mut tx,
            NewMaintenanceLog {
                vehicle_spare_part_id: id,
                bus_id: old.bus_id,
                odometer_at_service: Some(installation.install_odometer),
                action_taken: format!(
                    "Replaced {} spare part with new {}",
                    old.brand.as_deref().unwrap_or("unknown"),
                    installation.brand
                ),
                performed_by: installation.installed_by,
            },
        )
        .await?;

        let new_part = SparePartRepository::insert_installation(&mut tx, &installation).await?;
        SparePartRepository::insert_log(
            &mut tx,
            NewMaintenanceLog {
                vehicle_spare_part_id: new_part.id,
                bus_id: new_part.bus_id,
                odometer_at_service: Some(new_part.install_odometer),
                action_taken: format!("Installed new {} spare part", installation.brand),
                performed_by: installation.installed_by,
            },
        )
        .await?;
        tx.commit().await?;

        tracing::info!("♻️ Instalación {} reemplazada por {}", id, new_part.id);
        Ok(ReplacementResult { old_part, new_part })
    }

    // ----- Alertas y estado -----

    /// Piezas activas dentro de la franja de aviso, la más gastada primero
    pub async fn replacement_alerts(&self) -> Result<Vec<PartStatus>, AppError> {
        let mut alerts: Vec<PartStatus> = self
            .repository
            .active_usage(None)
            .await?
            .into_iter()
            .map(PartStatus::from)
            .filter(PartStatus::needs_replacement)
            .collect();
        alerts.sort_by(|a, b| a.remaining_distance.total_cmp(&b.remaining_distance));

        if !alerts.is_empty() {
            tracing::warn!("🚨 {} repuestos requieren reemplazo", alerts.len());
        }
        Ok(alerts)
    }

    pub async fn bus_status(&self, bus_id: i32) -> Result<Vec<PartStatus>, AppError> {
        let mut parts: Vec<PartStatus> = self
            .repository
            .active_usage(Some(bus_id))
            .await?
            .into_iter()
            .map(PartStatus::from)
            .collect();
        parts.sort_by(|a, b| a.remaining_distance.total_cmp(&b.remaining_distance));
        Ok(parts)
    }

    pub async fn maintenance_logs(&self, bus_id: Option<i32>) -> Result<Vec<MaintenanceLog>, AppError> {
        self.repository.list_logs(bus_id).await
    }

    pub async fn latest_odometer(&self, bus_id: i32) -> Result<LatestOdometer, AppError> {
        let reading = self.odometer.latest_for_bus(bus_id).await?;
        Ok(LatestOdometer::from(reading))
    }
}

fn new_installation(
    spare_part_id: i32,
    bus_id: i32,
    performed_by: i32,
    request: &InstallSparePartRequest,
) -> Result<NewInstallation, AppError> {
    if !limits_are_consistent(request.boundary_limit, request.distance_limit) {
        return Err(bad_request_error(LIMITS_MESSAGE));
    }

    let install_date = match request.install_date.as_deref() {
        Some(value) => validate_date(value).map_err(|_| bad_request_error("Invalid date format"))?,
        None => Utc::now().date_naive(),
    };

    Ok(NewInstallation {
        spare_part_id,
        bus_id,
        install_odometer: to_decimal(request.install_odometer, "install_odometer")?,
        install_date,
        installed_by: Some(request.installed_by.unwrap_or(performed_by)),
        cost: to_decimal_opt(request.cost, "cost")?,
        distance_limit: to_decimal(request.distance_limit, "distance_limit")?,
        brand: request.brand.trim().to_string(),
        is_active: request.is_active.unwrap_or(true),
        boundary_limit: to_decimal(request.boundary_limit, "boundary_limit")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(boundary: f64, distance: f64) -> InstallSparePartRequest {
        InstallSparePartRequest {
            spare_part_id: None,
            bus_id: None,
            install_odometer: 48_250.0,
            install_date: Some("2026-04-02".to_string()),
            installed_by: None,
            cost: Some(18_500.0),
            distance_limit: distance,
            brand: "  Michelin ".to_string(),
            is_active: None,
            boundary_limit: boundary,
        }
    }

    #[test]
    fn test_new_installation_defaults() {
        let installation = new_installation(3, 8, 1, &request(2_000.0, 40_000.0)).unwrap();
        assert_eq!(installation.brand, "Michelin");
        assert_eq!(installation.installed_by, Some(1));
        assert!(installation.is_active);
        assert_eq!(installation.install_date.to_string(), "2026-04-02");
    }

    #[test]
    fn test_boundary_must_be_below_distance() {
        let err = new_installation(3, 8, 1, &request(40_000.0, 40_000.0)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(m) if m == LIMITS_MESSAGE));
    }
}
