use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::dto::assignment_dto::AssignmentListQuery;
use crate::models::assignment::{Assignment, AssignmentDetail};
use crate::utils::errors::AppError;

const ASSIGNMENT_COLUMNS: &str = r#"
    vehicle_driver_assignmentid AS id,
    vehicle_id,
    employee_id,
    start_date,
    end_date,
    route,
    created_at,
    update_at
"#;

const DETAIL_SELECT: &str = r#"
    SELECT
        vda.vehicle_driver_assignmentid AS assignment_id,
        vda.vehicle_id,
        vda.employee_id,
        vda.start_date,
        vda.end_date,
        vda.route,
        vda.created_at,
        vda.update_at,
        b.no_plate AS bus_number,
        b.brand AS bus_brand,
        b.model AS bus_model,
        b.number_of_seats,
        b.fuel_type,
        b.fuel_tank_capacity,
        b.engine_cc,
        b.year_of_manufacture,
        u.name AS driver_name,
        u.employee_number AS driver_employee_number
    FROM vehicle_driver_assignment vda
    JOIN bus b ON vda.vehicle_id = b.id
    JOIN users u ON vda.employee_id = u.id
"#;

/// Cambios de una asignación; `end_date: Some(None)` la deja sin fin
#[derive(Debug, Default)]
pub struct AssignmentChanges {
    pub vehicle_id: Option<i32>,
    pub employee_id: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<Option<DateTime<Utc>>>,
    pub route: Option<String>,
}

pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Sin `limit` devuelve todas las filas (`LIMIT NULL`)
    pub async fn list(&self, filters: &AssignmentListQuery) -> Result<Vec<Assignment>, AppError> {
        let assignments = sqlx::query_as::<_, Assignment>(&format!(
            r#"
            SELECT {}
            FROM vehicle_driver_assignment
            WHERE ($1::int IS NULL OR vehicle_id = $1)
              AND ($2::int IS NULL OR employee_id = $2)
              AND (NOT $3 OR (start_date <= NOW() AND (end_date IS NULL OR end_date >= NOW())))
            ORDER BY start_date DESC
            LIMIT $4 OFFSET $5
            "#,
            ASSIGNMENT_COLUMNS
        ))
        .bind(filters.vehicle_id)
        .bind(filters.employee_id)
        .bind(filters.active_only())
        .bind(filters.limit)
        .bind(filters.offset.unwrap_or(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Assignment>, AppError> {
        let assignment = sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {} FROM vehicle_driver_assignment WHERE vehicle_driver_assignmentid = $1",
            ASSIGNMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(assignment)
    }

    pub async fn create(
        &self,
        vehicle_id: i32,
        employee_id: i32,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        route: String,
    ) -> Result<Assignment, AppError> {
        let assignment = sqlx::query_as::<_, Assignment>(&format!(
            r#"
            INSERT INTO vehicle_driver_assignment (vehicle_id, employee_id, start_date, end_date, route)
            VALUES ($1, $2, COALESCE($3, NOW()), $4, $5)
            RETURNING {}
            "#,
            ASSIGNMENT_COLUMNS
        ))
        .bind(vehicle_id)
        .bind(employee_id)
        .bind(start_date)
        .bind(end_date)
        .bind(route)
        .fetch_one(&self.pool)
        .await?;

        log::info!(
            "📋 Asignación {} creada: bus {} -> conductor {}",
            assignment.id,
            assignment.vehicle_id,
            assignment.employee_id
        );
        Ok(assignment)
    }

    pub async fn update(&self, id: i32, changes: AssignmentChanges) -> Result<Option<Assignment>, AppError> {
        let (set_end_date, end_date) = match changes.end_date {
            Some(value) => (true, value),
            None => (false, None),
        };

        let assignment = sqlx::query_as::<_, Assignment>(&format!(
            r#"
            UPDATE vehicle_driver_assignment SET
                vehicle_id = COALESCE($2, vehicle_id),
                employee_id = COALESCE($3, employee_id),
                start_date = COALESCE($4, start_date),
                end_date = CASE WHEN $5 THEN $6 ELSE end_date END,
                route = COALESCE($7, route),
                update_at = NOW()
            WHERE vehicle_driver_assignmentid = $1
            RETURNING {}
            "#,
            ASSIGNMENT_COLUMNS
        ))
        .bind(id)
        .bind(changes.vehicle_id)
        .bind(changes.employee_id)
        .bind(changes.start_date)
        .bind(set_end_date)
        .bind(end_date)
        .bind(changes.route)
        .fetch_optional(&self.pool)
        .await?;

        Ok(assignment)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM vehicle_driver_assignment WHERE vehicle_driver_assignmentid = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Asignación del conductor que cubre la fecha (por día, fin abierto incluido)
    pub async fn find_for_driver_on(
        &self,
        driver_id: i32,
        date: NaiveDate,
    ) -> Result<Option<AssignmentDetail>, AppError> {
        let detail = sqlx::query_as::<_, AssignmentDetail>(&format!(
            r#"
            {}
            WHERE vda.employee_id = $1
              AND $2::date >= DATE(vda.start_date)
              AND (vda.end_date IS NULL OR $2::date <= DATE(vda.end_date))
            ORDER BY vda.start_date DESC
            LIMIT 1
            "#,
            DETAIL_SELECT
        ))
        .bind(driver_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(detail)
    }

    pub async fn find_detail(&self, id: i32) -> Result<Option<AssignmentDetail>, AppError> {
        let detail = sqlx::query_as::<_, AssignmentDetail>(&format!(
            "{} WHERE vda.vehicle_driver_assignmentid = $1",
            DETAIL_SELECT
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(detail)
    }

    /// Asignaciones del conductor que aún no terminaron
    pub async fn list_active_for_driver(&self, driver_id: i32) -> Result<Vec<AssignmentDetail>, AppError> {
        let details = sqlx::query_as::<_, AssignmentDetail>(&format!(
            r#"
            {}
            WHERE vda.employee_id = $1
              AND (vda.end_date IS NULL OR vda.end_date >= CURRENT_DATE)
            ORDER BY vda.start_date ASC
            "#,
            DETAIL_SELECT
        ))
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    /// Todas las asignaciones que cubren la fecha
    pub async fn list_covering(&self, date: NaiveDate) -> Result<Vec<AssignmentDetail>, AppError> {
        let details = sqlx::query_as::<_, AssignmentDetail>(&format!(
            r#"
            {}
            WHERE $1::date >= DATE(vda.start_date)
              AND (vda.end_date IS NULL OR $1::date <= DATE(vda.end_date))
            ORDER BY b.no_plate
            "#,
            DETAIL_SELECT
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }
}
