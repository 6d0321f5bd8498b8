use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::fitness::{
    AssignmentCheckStatus, BusCheckStatus, BusFitness, FitnessHistoryEntry, FitnessSummary, FluidLevel,
};
use crate::utils::errors::AppError;

const FITNESS_SELECT: &str = r#"
    SELECT
        bf.*,
        u.name AS driver_name,
        b.no_plate AS bus_plate,
        b.brand AS bus_brand,
        b.model AS bus_model
    FROM bus_fitness bf
    LEFT JOIN users u ON bf.driver_id = u.id
    LEFT JOIN bus b ON bf.bus_id = b.id
"#;

/// Revisión lista para insertar, con los valores por defecto ya resueltos
#[derive(Debug, Clone)]
pub struct NewFitnessCheck {
    pub assignment_id: i32,
    pub driver_id: i32,
    pub bus_id: i32,
    pub oil_level: FluidLevel,
    pub oil_checked: bool,
    pub water_level: FluidLevel,
    pub water_checked: bool,
    pub notes: String,
    pub check_date: NaiveDate,
}

#[derive(Debug, Default)]
pub struct FitnessChanges {
    pub oil_level: Option<FluidLevel>,
    pub oil_checked: Option<bool>,
    pub water_level: Option<FluidLevel>,
    pub water_checked: Option<bool>,
    pub notes: Option<String>,
}

pub struct FitnessRepository {
    pool: PgPool,
}

impl FitnessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// `sort_column` y `order` deben venir de la lista blanca del DTO
    pub async fn list(
        &self,
        sort_column: &'static str,
        order: &'static str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BusFitness>, AppError> {
        let records = sqlx::query_as::<_, BusFitness>(&format!(
            "{} ORDER BY bf.{} {} LIMIT $1 OFFSET $2",
            FITNESS_SELECT, sort_column, order
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bus_fitness")
            .fetch_one(&self.pool)
            .await?;

        Ok(total.0)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<BusFitness>, AppError> {
        let record = sqlx::query_as::<_, BusFitness>(&format!("{} WHERE bf.id = $1", FITNESS_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    pub async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<BusFitness>, AppError> {
        let records = sqlx::query_as::<_, BusFitness>(&format!(
            "{} WHERE bf.check_date = $1 ORDER BY bf.submitted_at DESC",
            FITNESS_SELECT
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn find_by_bus(
        &self,
        bus_id: i32,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<BusFitness>, AppError> {
        let records = sqlx::query_as::<_, BusFitness>(&format!(
            r#"
            {}
            WHERE bf.bus_id = $1
              AND ($2::date IS NULL OR bf.check_date >= $2)
              AND ($3::date IS NULL OR bf.check_date <= $3)
            ORDER BY bf.check_date DESC, bf.submitted_at DESC
            "#,
            FITNESS_SELECT
        ))
        .bind(bus_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Últimas revisiones de un bus, sin joins
    pub async fn recent_by_bus(&self, bus_id: i32, limit: i64) -> Result<Vec<BusFitness>, AppError> {
        let records = sqlx::query_as::<_, BusFitness>(
            "SELECT * FROM bus_fitness WHERE bus_id = $1 ORDER BY check_date DESC LIMIT $2",
        )
        .bind(bus_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn history_with_details(
        &self,
        bus_id: i32,
        limit: i64,
    ) -> Result<Vec<FitnessHistoryEntry>, AppError> {
        let history = sqlx::query_as::<_, FitnessHistoryEntry>(
            r#"
            SELECT
                bf.id, bf.assignment_id, bf.driver_id, bf.bus_id,
                bf.oil_level, bf.oil_checked, bf.water_level, bf.water_checked,
                bf.notes, bf.check_date, bf.submitted_at, bf.created_at,
                u.name AS driver_name,
                u.mobile AS driver_mobile,
                u.employee_number AS driver_employee_number,
                b.no_plate AS bus_plate,
                b.brand AS bus_brand,
                b.model AS bus_model,
                vda.route AS assignment_route,
                vda.start_date AS assignment_start,
                vda.end_date AS assignment_end
            FROM bus_fitness bf
            LEFT JOIN users u ON bf.driver_id = u.id
            LEFT JOIN bus b ON bf.bus_id = b.id
            LEFT JOIN vehicle_driver_assignment vda ON bf.assignment_id = vda.vehicle_driver_assignmentid
            WHERE bf.bus_id = $1
            ORDER BY bf.check_date DESC, bf.submitted_at DESC
            LIMIT $2
            "#,
        )
        .bind(bus_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(history)
    }

    /// Buses activos con la última revisión del día
    pub async fn bus_status_on(&self, date: NaiveDate) -> Result<Vec<BusCheckStatus>, AppError> {
        let status = sqlx::query_as::<_, BusCheckStatus>(
            r#"
            SELECT
                b.id AS bus_id,
                b.no_plate,
                b.brand,
                b.model,
                b.is_active,
                COALESCE(checks.oil_checked, false) AS oil_checked,
                COALESCE(checks.water_checked, false) AS water_checked,
                checks.oil_level,
                checks.water_level,
                checks.driver_name,
                checks.submitted_at
            FROM bus b
            LEFT JOIN (
                SELECT DISTINCT ON (bf.bus_id)
                    bf.bus_id, bf.oil_checked, bf.water_checked,
                    bf.oil_level, bf.water_level, bf.submitted_at,
                    u.name AS driver_name
                FROM bus_fitness bf
                LEFT JOIN users u ON bf.driver_id = u.id
                WHERE bf.check_date = $1
                ORDER BY bf.bus_id, bf.submitted_at DESC
            ) checks ON b.id = checks.bus_id
            WHERE b.is_active = true
            ORDER BY b.no_plate
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(status)
    }

    /// Asignaciones que cubren la fecha junto con su revisión
    pub async fn assignments_with_status(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<AssignmentCheckStatus>, AppError> {
        let rows = sqlx::query_as::<_, AssignmentCheckStatus>(
            r#"
            SELECT
                vda.vehicle_driver_assignmentid AS id,
                vda.vehicle_id AS bus_id,
                vda.employee_id AS driver_id,
                vda.route,
                vda.start_date,
                vda.end_date,
                u.name AS driver_name,
                u.mobile AS driver_mobile,
                b.no_plate AS bus_plate,
                b.brand AS bus_brand,
                b.model AS bus_model,
                bf.id AS fitness_id,
                bf.oil_level,
                bf.oil_checked,
                bf.water_level,
                bf.water_checked,
                bf.notes AS fitness_notes,
                bf.submitted_at AS check_submitted_at,
                (bf.id IS NOT NULL) AS has_checked
            FROM vehicle_driver_assignment vda
            LEFT JOIN users u ON vda.employee_id = u.id
            LEFT JOIN bus b ON vda.vehicle_id = b.id
            LEFT JOIN bus_fitness bf
                ON vda.vehicle_driver_assignmentid = bf.assignment_id AND bf.check_date = $1
            WHERE $1::date >= DATE(vda.start_date)
              AND (vda.end_date IS NULL OR $1::date <= DATE(vda.end_date))
            ORDER BY vda.start_date DESC
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find_by_assignment_and_date(
        &self,
        assignment_id: i32,
        date: NaiveDate,
    ) -> Result<Option<BusFitness>, AppError> {
        let record = sqlx::query_as::<_, BusFitness>(
            "SELECT * FROM bus_fitness WHERE assignment_id = $1 AND check_date = $2",
        )
        .bind(assignment_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn create(&self, check: NewFitnessCheck) -> Result<BusFitness, AppError> {
        let record = sqlx::query_as::<_, BusFitness>(
            r#"
            INSERT INTO bus_fitness (
                assignment_id, driver_id, bus_id, oil_level, oil_checked,
                water_level, water_checked, notes, check_date,
                submitted_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(check.assignment_id)
        .bind(check.driver_id)
        .bind(check.bus_id)
        .bind(check.oil_level)
        .bind(check.oil_checked)
        .bind(check.water_level)
        .bind(check.water_checked)
        .bind(check.notes)
        .bind(check.check_date)
        .fetch_one(&self.pool)
        .await?;

        log::info!(
            "🛢️ Revisión {} registrada para la asignación {}",
            record.id,
            record.assignment_id
        );
        Ok(record)
    }

    /// Insertar o reemplazar la revisión del día de la asignación
    pub async fn upsert(&self, check: NewFitnessCheck) -> Result<BusFitness, AppError> {
        let record = sqlx::query_as::<_, BusFitness>(
            r#"
            INSERT INTO bus_fitness (
                assignment_id, driver_id, bus_id, oil_level, oil_checked,
                water_level, water_checked, notes, check_date, submitted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
            ON CONFLICT (assignment_id, check_date)
            DO UPDATE SET
                oil_level = EXCLUDED.oil_level,
                oil_checked = EXCLUDED.oil_checked,
                water_level = EXCLUDED.water_level,
                water_checked = EXCLUDED.water_checked,
                notes = EXCLUDED.notes,
                submitted_at = EXCLUDED.submitted_at,
                updated_at = CURRENT_TIMESTAMP
            RETURNING *
            "#,
        )
        .bind(check.assignment_id)
        .bind(check.driver_id)
        .bind(check.bus_id)
        .bind(check.oil_level)
        .bind(check.oil_checked)
        .bind(check.water_level)
        .bind(check.water_checked)
        .bind(check.notes)
        .bind(check.check_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn update(&self, id: i32, changes: FitnessChanges) -> Result<Option<BusFitness>, AppError> {
        let record = sqlx::query_as::<_, BusFitness>(
            r#"
            UPDATE bus_fitness SET
                oil_level = COALESCE($2, oil_level),
                oil_checked = COALESCE($3, oil_checked),
                water_level = COALESCE($4, water_level),
                water_checked = COALESCE($5, water_checked),
                notes = COALESCE($6, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.oil_level)
        .bind(changes.oil_checked)
        .bind(changes.water_level)
        .bind(changes.water_checked)
        .bind(changes.notes)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM bus_fitness WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn summary(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<FitnessSummary, AppError> {
        let summary = sqlx::query_as::<_, FitnessSummary>(
            r#"
            SELECT
                COUNT(*) AS total_checks,
                COUNT(*) FILTER (WHERE oil_checked) AS oil_checks_done,
                COUNT(*) FILTER (WHERE water_checked) AS water_checks_done,
                COUNT(*) FILTER (WHERE oil_level = 'full') AS oil_full_count,
                COUNT(*) FILTER (WHERE oil_level = 'adequate') AS oil_adequate_count,
                COUNT(*) FILTER (WHERE oil_level = 'low') AS oil_low_count,
                COUNT(*) FILTER (WHERE oil_level = 'critical') AS oil_critical_count,
                COUNT(*) FILTER (WHERE water_level = 'full') AS water_full_count,
                COUNT(*) FILTER (WHERE water_level = 'adequate') AS water_adequate_count,
                COUNT(*) FILTER (WHERE water_level = 'low') AS water_low_count,
                COUNT(*) FILTER (WHERE water_level = 'critical') AS water_critical_count,
                COUNT(DISTINCT bus_id) AS buses_checked,
                COUNT(DISTINCT driver_id) AS drivers_active,
                COUNT(DISTINCT check_date) AS days_with_checks
            FROM bus_fitness
            WHERE ($1::date IS NULL OR check_date >= $1)
              AND ($2::date IS NULL OR check_date <= $2)
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    /// Revisiones del día con aceite o agua en nivel crítico
    pub async fn critical_on(&self, date: NaiveDate) -> Result<Vec<BusFitness>, AppError> {
        let records = sqlx::query_as::<_, BusFitness>(&format!(
            r#"
            {}
            WHERE (bf.oil_level = 'critical' OR bf.water_level = 'critical')
              AND bf.check_date = $1
            ORDER BY bf.created_at DESC
            "#,
            FITNESS_SELECT
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
