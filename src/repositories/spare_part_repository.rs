use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use crate::dto::spare_part_dto::{InstallationFilters, UpdateInstallationRequest};
use crate::models::spare_part::{ActivePartUsage, MaintenanceLog, SparePart, VehicleSparePart};
use crate::utils::errors::AppError;
use crate::utils::numeric::to_decimal_opt;

const INSTALLATION_SELECT: &str = r#"
    SELECT
        vsp.*,
        sp.part_name,
        sp.description AS part_description,
        b.no_plate,
        b.brand AS bus_brand,
        b.model AS bus_model,
        u.name AS installer_name
    FROM vehicle_spare_part vsp
    JOIN spare_part sp ON vsp.spare_part_id = sp.id
    JOIN bus b ON vsp.bus_id = b.id
    LEFT JOIN users u ON vsp.installed_by = u.id
"#;

// Odómetro actual: la lectura más alta del bus, o el de instalación si no hay lecturas
const ACTIVE_USAGE_SELECT: &str = r#"
    SELECT
        vsp.id,
        vsp.spare_part_id,
        sp.part_name,
        vsp.bus_id,
        b.no_plate,
        vsp.brand,
        vsp.install_odometer,
        vsp.install_date,
        vsp.distance_limit,
        vsp.boundary_limit,
        COALESCE(
            (SELECT MAX(o.reading_km) FROM odometer_reading o WHERE o.bus_id = vsp.bus_id),
            vsp.install_odometer
        ) AS current_odometer
    FROM vehicle_spare_part vsp
    JOIN spare_part sp ON vsp.spare_part_id = sp.id
    JOIN bus b ON vsp.bus_id = b.id
    WHERE vsp.is_active = TRUE
"#;

/// Datos de una instalación nueva, ya validados
#[derive(Debug, Clone)]
pub struct NewInstallation {
    pub spare_part_id: i32,
    pub bus_id: i32,
    pub install_odometer: Decimal,
    pub install_date: NaiveDate,
    pub installed_by: Option<i32>,
    pub cost: Option<Decimal>,
    pub distance_limit: Decimal,
    pub brand: String,
    pub is_active: bool,
    pub boundary_limit: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewMaintenanceLog {
    pub vehicle_spare_part_id: i32,
    pub bus_id: i32,
    pub odometer_at_service: Option<Decimal>,
    pub action_taken: String,
    pub performed_by: Option<i32>,
}

pub struct SparePartRepository {
    pool: PgPool,
}

impl SparePartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, AppError> {
        Ok(self.pool.begin().await?)
    }

    // ----- Catálogo -----

    pub async fn list_parts(&self) -> Result<Vec<SparePart>, AppError> {
        let parts = sqlx::query_as::<_, SparePart>("SELECT * FROM spare_part ORDER BY part_name ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(parts)
    }

    pub async fn find_part(&self, id: i32) -> Result<Option<SparePart>, AppError> {
        let part = sqlx::query_as::<_, SparePart>("SELECT * FROM spare_part WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(part)
    }

    /// Búsqueda sin distinguir mayúsculas
    pub async fn find_part_by_name(&self, name: &str) -> Result<Option<SparePart>, AppError> {
        let part = sqlx::query_as::<_, SparePart>(
            "SELECT * FROM spare_part WHERE LOWER(part_name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(part)
    }

    pub async fn create_part(&self, name: &str, description: Option<&str>) -> Result<SparePart, AppError> {
        let part = sqlx::query_as::<_, SparePart>(
            r#"
            INSERT INTO spare_part (part_name, description)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        log::info!("🔩 Repuesto creado: {} (id {})", part.part_name, part.id);
        Ok(part)
    }

    pub async fn update_part(
        &self,
        id: i32,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<SparePart>, AppError> {
        let part = sqlx::query_as::<_, SparePart>(
            r#"
            UPDATE spare_part
            SET part_name = COALESCE($1, part_name),
                description = COALESCE($2, description),
                updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(part)
    }

    pub async fn delete_part(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM spare_part WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ----- Instalaciones -----

    pub async fn list_installations(
        &self,
        filters: &InstallationFilters,
    ) -> Result<Vec<VehicleSparePart>, AppError> {
        let installations = sqlx::query_as::<_, VehicleSparePart>(&format!(
            r#"
            {}
            WHERE ($1::int IS NULL OR vsp.bus_id = $1)
              AND ($2::bool IS NULL OR vsp.is_active = $2)
              AND ($3::int IS NULL OR vsp.spare_part_id = $3)
            ORDER BY vsp.install_date DESC, vsp.created_at DESC
            "#,
            INSTALLATION_SELECT
        ))
        .bind(filters.bus_id)
        .bind(filters.is_active)
        .bind(filters.spare_part_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(installations)
    }

    pub async fn find_installation(&self, id: i32) -> Result<Option<VehicleSparePart>, AppError> {
        let installation = sqlx::query_as::<_, VehicleSparePart>(&format!(
            "{} WHERE vsp.id = $1",
            INSTALLATION_SELECT
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(installation)
    }

    /// Bloquea la fila hasta el fin de la transacción
    pub async fn lock_installation(
        conn: &mut PgConnection,
        id: i32,
    ) -> Result<Option<VehicleSparePart>, AppError> {
        let installation = sqlx::query_as::<_, VehicleSparePart>(
            "SELECT * FROM vehicle_spare_part WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(installation)
    }

    pub async fn insert_installation(
        conn: &mut PgConnection,
        installation: &NewInstallation,
    ) -> Result<VehicleSparePart, AppError> {
        let saved = sqlx::query_as::<_, VehicleSparePart>(
            r#"
            INSERT INTO vehicle_spare_part (
                spare_part_id, bus_id, install_odometer, install_date,
                installed_by, cost, distance_limit, brand, is_active, boundary_limit
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(installation.spare_part_id)
        .bind(installation.bus_id)
        .bind(installation.install_odometer)
        .bind(installation.install_date)
        .bind(installation.installed_by)
        .bind(installation.cost)
        .bind(installation.distance_limit)
        .bind(&installation.brand)
        .bind(installation.is_active)
        .bind(installation.boundary_limit)
        .fetch_one(conn)
        .await?;

        log::info!(
            "🔧 Repuesto {} instalado en el bus {} (instalación {})",
            saved.spare_part_id,
            saved.bus_id,
            saved.id
        );
        Ok(saved)
    }

    pub async fn update_installation(
        conn: &mut PgConnection,
        id: i32,
        changes: &UpdateInstallationRequest,
    ) -> Result<Option<VehicleSparePart>, AppError> {
        let updated = sqlx::query_as::<_, VehicleSparePart>(
            r#"
            UPDATE vehicle_spare_part
            SET is_active = COALESCE($1, is_active),
                cost = COALESCE($2, cost),
                brand = COALESCE($3, brand),
                distance_limit = COALESCE($4, distance_limit),
                boundary_limit = COALESCE($5, boundary_limit),
                updated_at = NOW()
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(changes.is_active)
        .bind(to_decimal_opt(changes.cost, "cost")?)
        .bind(changes.brand.as_deref().map(str::trim))
        .bind(to_decimal_opt(changes.distance_limit, "distance_limit")?)
        .bind(to_decimal_opt(changes.boundary_limit, "boundary_limit")?)
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(updated)
    }

    pub async fn deactivate_installation(
        conn: &mut PgConnection,
        id: i32,
    ) -> Result<VehicleSparePart, AppError> {
        let updated = sqlx::query_as::<_, VehicleSparePart>(
            r#"
            UPDATE vehicle_spare_part
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(conn)
        .await?;

        Ok(updated)
    }

    pub async fn delete_installation(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM vehicle_spare_part WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Instalaciones activas con el odómetro actual; `bus_id = None` trae todos los buses
    pub async fn active_usage(&self, bus_id: Option<i32>) -> Result<Vec<ActivePartUsage>, AppError> {
        let rows = sqlx::query_as::<_, ActivePartUsage>(&format!(
            "{} AND ($1::int IS NULL OR vsp.bus_id = $1)",
            ACTIVE_USAGE_SELECT
        ))
        .bind(bus_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ----- Bitácora -----

    pub async fn insert_log(conn: &mut PgConnection, entry: NewMaintenanceLog) -> Result<MaintenanceLog, AppError> {
        let saved = sqlx::query_as::<_, MaintenanceLog>(
            r#"
            INSERT INTO maintenance_log (
                vehicle_spare_part_id, bus_id, odometer_at_service, action_taken, performed_by
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(entry.vehicle_spare_part_id)
        .bind(entry.bus_id)
        .bind(entry.odometer_at_service)
        .bind(&entry.action_taken)
        .bind(entry.performed_by)
        .fetch_one(conn)
        .await?;

        log::debug!("📝 Bitácora del bus {}: {}", saved.bus_id, saved.action_taken);
        Ok(saved)
    }

    pub async fn list_logs(&self, bus_id: Option<i32>) -> Result<Vec<MaintenanceLog>, AppError> {
        let logs = sqlx::query_as::<_, MaintenanceLog>(
            r#"
            SELECT ml.*, b.no_plate, u.name AS performed_by_name
            FROM maintenance_log ml
            JOIN bus b ON ml.bus_id = b.id
            LEFT JOIN users u ON ml.performed_by = u.id
            WHERE ($1::int IS NULL OR ml.bus_id = $1)
            ORDER BY ml.created_at DESC
            "#,
        )
        .bind(bus_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}
