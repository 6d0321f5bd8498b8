//! Desgaste de repuestos por distancia
//!
//! `restante = límite de distancia - (odómetro actual - odómetro de instalación)`

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WearStatus {
    Ok,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PartWear {
    pub current_odometer: f64,
    pub distance_used: f64,
    pub remaining_distance: f64,
    pub status: WearStatus,
}

impl PartWear {
    /// Debe avisarse el reemplazo: lo restante ya entró en la franja de aviso
    pub fn needs_replacement(&self, boundary_limit: f64) -> bool {
        self.remaining_distance <= boundary_limit
    }
}

/// `CRITICAL` sin distancia restante, `WARNING` dentro de la franja de aviso
pub fn wear_status(remaining: f64, boundary_limit: f64) -> WearStatus {
    if remaining <= 0.0 {
        WearStatus::Critical
    } else if remaining <= boundary_limit {
        WearStatus::Warning
    } else {
        WearStatus::Ok
    }
}

/// Calcular el desgaste; sin lecturas se usa el odómetro de instalación
pub fn part_wear(
    install_odometer: f64,
    current_odometer: Option<f64>,
    distance_limit: f64,
    boundary_limit: f64,
) -> PartWear {
    let current = current_odometer.unwrap_or(install_odometer);
    let used = current - install_odometer;
    let remaining = distance_limit - used;

    PartWear {
        current_odometer: current,
        distance_used: used,
        remaining_distance: remaining,
        status: wear_status(remaining, boundary_limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_thresholds() {
        assert_eq!(wear_status(0.0, 500.0), WearStatus::Critical);
        assert_eq!(wear_status(-20.0, 500.0), WearStatus::Critical);
        assert_eq!(wear_status(500.0, 500.0), WearStatus::Warning);
        assert_eq!(wear_status(120.0, 500.0), WearStatus::Warning);
        assert_eq!(wear_status(501.0, 500.0), WearStatus::Ok);
    }

    #[test]
    fn test_part_wear_from_readings() {
        let wear = part_wear(10_000.0, Some(14_600.0), 5_000.0, 500.0);
        assert_eq!(wear.distance_used, 4_600.0);
        assert_eq!(wear.remaining_distance, 400.0);
        assert_eq!(wear.status, WearStatus::Warning);
        assert!(wear.needs_replacement(500.0));
    }

    #[test]
    fn test_part_wear_without_readings_is_fresh() {
        let wear = part_wear(10_000.0, None, 5_000.0, 500.0);
        assert_eq!(wear.current_odometer, 10_000.0);
        assert_eq!(wear.remaining_distance, 5_000.0);
        assert_eq!(wear.status, WearStatus::Ok);
        assert!(!wear.needs_replacement(500.0));
    }

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(serde_json::to_value(WearStatus::Critical).unwrap(), "CRITICAL");
    }
}
