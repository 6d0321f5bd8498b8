//! Reglas de las lecturas de odómetro
//!
//! Una lectura nunca baja respecto de la última registrada para el bus, y la
//! de la tarde exige la de la mañana del mismo día con un valor igual o mayor.

use crate::models::odometer::ReadingType;
use crate::services::fuel_efficiency_service::round2;

/// Lectura rechazada; el texto se devuelve tal cual al cliente
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingRejected(pub String);

pub fn check_reading(
    reading_type: ReadingType,
    reading_km: f64,
    latest_for_bus: Option<f64>,
    morning_same_day: Option<f64>,
) -> Result<(), ReadingRejected> {
    if reading_km <= 0.0 {
        return Err(ReadingRejected("Reading must be greater than 0".to_string()));
    }

    if let Some(previous) = latest_for_bus.filter(|p| *p > 0.0) {
        if reading_km < previous {
            return Err(ReadingRejected(format!(
                "Reading ({} km) cannot be less than previous reading ({} km)",
                reading_km, previous
            )));
        }
    }

    if reading_type == ReadingType::Evening {
        let morning = morning_same_day.ok_or_else(|| {
            ReadingRejected("Morning reading must be submitted before evening reading".to_string())
        })?;
        if reading_km < morning {
            return Err(ReadingRejected(format!(
                "Evening reading ({} km) cannot be less than morning reading ({} km)",
                reading_km, morning
            )));
        }
    }

    Ok(())
}

/// Distancia del día: tarde menos mañana, 0 si falta alguna
pub fn today_distance(morning: Option<f64>, evening: Option<f64>) -> f64 {
    match (morning, evening) {
        (Some(m), Some(e)) => round2(e - m),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_cannot_go_backwards() {
        let err = check_reading(ReadingType::Morning, 1000.0, Some(1200.5), None).unwrap_err();
        assert_eq!(
            err.0,
            "Reading (1000 km) cannot be less than previous reading (1200.5 km)"
        );
        assert!(check_reading(ReadingType::Morning, 1200.5, Some(1200.5), None).is_ok());
    }

    #[test]
    fn test_evening_requires_morning() {
        let err = check_reading(ReadingType::Evening, 1300.0, Some(1200.0), None).unwrap_err();
        assert_eq!(err.0, "Morning reading must be submitted before evening reading");

        assert!(check_reading(ReadingType::Evening, 1300.0, Some(1250.0), Some(1250.0)).is_ok());
    }

    #[test]
    fn test_evening_below_morning_is_rejected() {
        // Sin lecturas previas del bus solo aplica la regla de la mañana
        let err = check_reading(ReadingType::Evening, 900.0, None, Some(950.0)).unwrap_err();
        assert!(err.0.starts_with("Evening reading (900 km)"));
    }

    #[test]
    fn test_non_positive_reading() {
        assert!(check_reading(ReadingType::Morning, 0.0, None, None).is_err());
    }

    #[test]
    fn test_today_distance() {
        assert_eq!(today_distance(Some(1200.0), Some(1354.25)), 154.25);
        assert_eq!(today_distance(Some(1200.0), None), 0.0);
    }
}
