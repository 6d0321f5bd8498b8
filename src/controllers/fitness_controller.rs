//! Revisiones diarias de aceite y agua

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use validator::Validate;

use crate::dto::fitness_dto::{
    AssignmentStatusList, BusFitnessHistory, BusFitnessRecords, BusStatusList, CreateFitnessRequest,
    DateRangeQuery, FitnessDayRecords, FitnessListQuery, FitnessPage, Pagination, UpdateFitnessRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::fitness::{BusFitness, FitnessSummary, FluidLevel};
use crate::repositories::fitness_repository::{FitnessChanges, FitnessRepository, NewFitnessCheck};
use crate::utils::errors::{bad_request_error, not_found_error, AppError};
use crate::utils::validation::{clamp_limit, validate_date};

pub struct FitnessController {
    repository: FitnessRepository,
}

impl FitnessController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: FitnessRepository::new(pool),
        }
    }

    pub async fn list(&self, query: FitnessListQuery) -> Result<FitnessPage, AppError> {
        let (page, limit) = (query.page(), query.limit());
        let records = self
            .repository
            .list(query.sort_column(), query.sort_order(), limit, query.offset())
            .await?;
        let total = self.repository.count().await?;

        Ok(FitnessPage {
            success: true,
            data: records,
            pagination: Pagination::new(page, limit, total),
        })
    }

    pub async fn by_date(&self, date: &str) -> Result<FitnessDayRecords, AppError> {
        let date = parse_date(date)?;
        let records = self.repository.find_by_date(date).await?;
        Ok(FitnessDayRecords::new(records, date))
    }

    pub async fn by_bus(&self, bus_id: i32, range: DateRangeQuery) -> Result<BusFitnessRecords, AppError> {
        let records = self
            .repository
            .find_by_bus(bus_id, range.start_date, range.end_date)
            .await?;
        Ok(BusFitnessRecords::new(records, bus_id))
    }

    pub async fn bus_history(&self, bus_id: i32, limit: Option<i64>) -> Result<BusFitnessHistory, AppError> {
        let history = self
            .repository
            .history_with_details(bus_id, clamp_limit(limit, 50, 500))
            .await?;
        Ok(BusFitnessHistory::new(history, bus_id))
    }

    pub async fn bus_status(&self, date: &str) -> Result<BusStatusList, AppError> {
        let date = parse_date(date)?;
        let status = self.repository.bus_status_on(date).await?;
        Ok(BusStatusList::new(status, date))
    }

    pub async fn assignments_with_status(&self, date: Option<NaiveDate>) -> Result<AssignmentStatusList, AppError> {
        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        let rows = self.repository.assignments_with_status(date).await?;
        Ok(AssignmentStatusList::new(rows, date))
    }

    pub async fn summary(&self, range: DateRangeQuery) -> Result<FitnessSummary, AppError> {
        self.repository.summary(range.start_date, range.end_date).await
    }

    pub async fn critical_alerts(&self, date: Option<NaiveDate>) -> Result<FitnessDayRecords, AppError> {
        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        let records = self.repository.critical_on(date).await?;
        if !records.is_empty() {
            tracing::warn!("🚨 {} revisiones con nivel crítico el {}", records.len(), date);
        }
        Ok(FitnessDayRecords::new(records, date))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<BusFitness, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Fitness check not found"))
    }

    /// El conductor autenticado queda como autor de la revisión
    pub async fn create(&self, driver_id: i32, request: CreateFitnessRequest) -> Result<BusFitness, AppError> {
        request.validate()?;

        let (assignment_id, bus_id) = match (request.assignment_id, request.bus_id) {
            (Some(assignment_id), Some(bus_id)) => (assignment_id, bus_id),
            _ => return Err(bad_request_error("Assignment ID and Bus ID are required")),
        };

        let check_date = match request.check_date.as_deref() {
            Some(date) => parse_date(date)?,
            None => Utc::now().date_naive(),
        };

        if self
            .repository
            .find_by_assignment_and_date(assignment_id, check_date)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Fitness check already submitted for this assignment today".to_string(),
            ));
        }

        self.repository
            .create(NewFitnessCheck {
                assignment_id,
                driver_id,
                bus_id,
                oil_level: parse_level(request.oil_level.as_deref())?.unwrap_or_default(),
                oil_checked: request.oil_checked.unwrap_or(true),
                water_level: parse_level(request.water_level.as_deref())?.unwrap_or_default(),
                water_checked: request.water_checked.unwrap_or(true),
                notes: request.notes.unwrap_or_default(),
                check_date,
            })
            .await
    }

    /// Solo el administrador o el conductor autor pueden modificarla
    pub async fn update(
        &self,
        id: i32,
        user: &AuthenticatedUser,
        request: UpdateFitnessRequest,
    ) -> Result<BusFitness, AppError> {
        request.validate()?;

        let existing = self.get_by_id(id).await?;
        if !user.is_admin() && user.user_id != existing.driver_id {
            return Err(AppError::Forbidden(
                "Not authorized to update this record".to_string(),
            ));
        }

        let changes = FitnessChanges {
            oil_level: parse_level(request.oil_level.as_deref())?,
            oil_checked: request.oil_checked,
            water_level: parse_level(request.water_level.as_deref())?,
            water_checked: request.water_checked,
            notes: request.notes,
        };

        self.repository
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found_error("Fitness check not found"))
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Fitness check not found"));
        }
        Ok(())
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    validate_date(value).map_err(|_| bad_request_error("Date must use the YYYY-MM-DD format"))
}

fn parse_level(value: Option<&str>) -> Result<Option<FluidLevel>, AppError> {
    value
        .map(|v| v.parse::<FluidLevel>().map_err(AppError::BadRequest))
        .transpose()
}
