//! Estado temporal de una asignación (próxima, activa, terminada)

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Upcoming,
    Active,
    Completed,
}

pub fn assignment_status(
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> AssignmentStatus {
    if now < start {
        AssignmentStatus::Upcoming
    } else if end.map_or(false, |end| now > end) {
        AssignmentStatus::Completed
    } else {
        AssignmentStatus::Active
    }
}

/// Días que faltan hasta el fin, redondeando hacia arriba desde la medianoche de hoy.
/// Sin fecha de fin no hay cuenta regresiva.
pub fn days_remaining(end: Option<DateTime<Utc>>, today: NaiveDate) -> Option<i64> {
    let end = end?;
    let midnight = today.and_hms_opt(0, 0, 0)?.and_utc();
    let seconds = (end - midnight).num_seconds();
    let days = (seconds + 86_399).div_euclid(86_400);
    Some(days.max(0))
}

/// "Marca Modelo" sin espacios sobrantes
pub fn bus_model_full(brand: Option<&str>, model: Option<&str>) -> String {
    format!("{} {}", brand.unwrap_or(""), model.unwrap_or(""))
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_assignment_status() {
        assert_eq!(assignment_status(at(10, 0), Some(at(20, 0)), at(5, 0)), AssignmentStatus::Upcoming);
        assert_eq!(assignment_status(at(10, 0), Some(at(20, 0)), at(15, 0)), AssignmentStatus::Active);
        assert_eq!(assignment_status(at(10, 0), Some(at(20, 0)), at(21, 0)), AssignmentStatus::Completed);
        assert_eq!(assignment_status(at(10, 0), None, at(28, 0)), AssignmentStatus::Active);
    }

    #[test]
    fn test_days_remaining_rounds_up_and_floors_at_zero() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        assert_eq!(days_remaining(Some(at(20, 0)), today), Some(5));
        assert_eq!(days_remaining(Some(at(20, 6)), today), Some(6));
        assert_eq!(days_remaining(Some(at(15, 0)), today), Some(0));
        assert_eq!(days_remaining(Some(at(10, 0)), today), Some(0));
        assert_eq!(days_remaining(None, today), None);
    }

    #[test]
    fn test_bus_model_full() {
        assert_eq!(bus_model_full(Some("Ashok Leyland"), Some("Viking")), "Ashok Leyland Viking");
        assert_eq!(bus_model_full(Some("Lanka"), None), "Lanka");
        assert_eq!(bus_model_full(None, None), "");
    }
}
