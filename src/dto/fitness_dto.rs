use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::fitness::{
    AssignmentCheckStatus, BusCheckStatus, BusFitness, FitnessHistoryEntry,
};
use crate::utils::validation::{validate_date_str, validate_fluid_level};

/// Columnas por las que se puede ordenar el listado
/// Páginas más allá de esta se consideran la última consultable
const MAX_PAGE: i64 = 1_000_000;

const SORTABLE_COLUMNS: [&str; 5] = ["id", "check_date", "submitted_at", "bus_id", "driver_id"];

#[derive(Debug, Default, Deserialize)]
pub struct FitnessListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(alias = "sortBy")]
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl FitnessListQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).clamp(1, MAX_PAGE)
    }

    /// Desplazamiento SQL de la página pedida
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 200)
    }

    /// Columna en lista blanca; cualquier otra cae en `check_date`
    pub fn sort_column(&self) -> &'static str {
        self.sort_by
            .as_deref()
            .and_then(|requested| SORTABLE_COLUMNS.iter().find(|c| **c == requested))
            .copied()
            .unwrap_or("check_date")
    }

    pub fn sort_order(&self) -> &'static str {
        match self.order.as_deref().map(str::to_uppercase).as_deref() {
            Some("ASC") => "ASC",
            _ => "DESC",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    #[serde(alias = "startDate")]
    pub start_date: Option<NaiveDate>,
    #[serde(alias = "endDate")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<NaiveDate>,
}

// Request de revisión diaria
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateFitnessRequest {
    #[serde(alias = "assignmentId")]
    pub assignment_id: Option<i32>,
    #[serde(alias = "busId")]
    pub bus_id: Option<i32>,
    #[serde(alias = "oilLevel")]
    #[validate(custom = "validate_fluid_level")]
    pub oil_level: Option<String>,
    #[serde(alias = "oilChecked")]
    pub oil_checked: Option<bool>,
    #[serde(alias = "waterLevel")]
    #[validate(custom = "validate_fluid_level")]
    pub water_level: Option<String>,
    #[serde(alias = "waterChecked")]
    pub water_checked: Option<bool>,
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
    #[serde(alias = "checkDate")]
    #[validate(custom = "validate_date_str")]
    pub check_date: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateFitnessRequest {
    #[serde(alias = "oilLevel")]
    #[validate(custom = "validate_fluid_level")]
    pub oil_level: Option<String>,
    #[serde(alias = "oilChecked")]
    pub oil_checked: Option<bool>,
    #[serde(alias = "waterLevel")]
    #[validate(custom = "validate_fluid_level")]
    pub water_level: Option<String>,
    #[serde(alias = "waterChecked")]
    pub water_checked: Option<bool>,
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: (total + limit - 1) / limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FitnessPage {
    pub success: bool,
    pub data: Vec<BusFitness>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct FitnessByDate<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub date: NaiveDate,
}

impl<T> FitnessByDate<T> {
    pub fn new(data: Vec<T>, date: NaiveDate) -> Self {
        Self {
            success: true,
            data,
            date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FitnessByBus<T> {
    pub success: bool,
    pub data: Vec<T>,
    #[serde(rename = "busId")]
    pub bus_id: i32,
}

impl<T> FitnessByBus<T> {
    pub fn new(data: Vec<T>, bus_id: i32) -> Self {
        Self {
            success: true,
            data,
            bus_id,
        }
    }
}

pub type FitnessDayRecords = FitnessByDate<BusFitness>;
pub type BusStatusList = FitnessByDate<BusCheckStatus>;
pub type AssignmentStatusList = FitnessByDate<AssignmentCheckStatus>;
pub type BusFitnessRecords = FitnessByBus<BusFitness>;
pub type BusFitnessHistory = FitnessByBus<FitnessHistoryEntry>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_column_whitelist() {
        let query = FitnessListQuery {
            sort_by: Some("submitted_at; DROP TABLE bus".to_string()),
            order: Some("asc".to_string()),
            ..Default::default()
        };
        assert_eq!(query.sort_column(), "check_date");
        assert_eq!(query.sort_order(), "ASC");

        let query = FitnessListQuery {
            sort_by: Some("bus_id".to_string()),
            ..Default::default()
        };
        assert_eq!(query.sort_column(), "bus_id");
        assert_eq!(query.sort_order(), "DESC");
        assert_eq!((query.page(), query.limit()), (1, 20));
    }

    #[test]
    fn test_pagination_total_pages() {
        assert_eq!(Pagination::new(1, 20, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 20, 20).total_pages, 1);
        assert_eq!(Pagination::new(2, 20, 41).total_pages, 3);
    }

    #[test]
    fn test_invalid_fluid_level_fails_validation() {
        let request = CreateFitnessRequest {
            assignment_id: Some(1),
            bus_id: Some(1),
            oil_level: Some("empty".to_string()),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_huge_page_does_not_overflow_offset() {
        let query = FitnessListQuery {
            page: Some(i64::MAX),
            limit: Some(200),
            sort_by: None,
            order: None,
        };
        assert_eq!(query.page(), MAX_PAGE);
        assert_eq!(query.offset(), (MAX_PAGE - 1) * 200);

        let first = FitnessListQuery {
            page: Some(-3),
            limit: None,
            sort_by: None,
            order: None,
        };
        assert_eq!(first.offset(), 0);
    }
}
