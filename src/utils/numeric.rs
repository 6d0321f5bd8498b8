//! Conversión entre `f64` (cálculos y JSON de entrada) y `Decimal` (columnas NUMERIC)

use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::utils::errors::AppError;

/// Convertir un valor de entrada a `Decimal`; NaN e infinitos se rechazan
pub fn to_decimal(value: f64, field: &str) -> Result<Decimal, AppError> {
    Decimal::from_f64(value)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid numeric value for {}", field)))
}

pub fn to_decimal_opt(value: Option<f64>, field: &str) -> Result<Option<Decimal>, AppError> {
    value.map(|v| to_decimal(v, field)).transpose()
}

pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

pub fn to_f64_opt(value: Option<Decimal>) -> Option<f64> {
    value.and_then(|v| v.to_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_keeps_two_decimals() {
        let d = to_decimal(1234.56, "reading_km").unwrap();
        assert_eq!(d.to_string(), "1234.56");
        assert!((to_f64(d) - 1234.56).abs() < 1e-9);
    }

    #[test]
    fn test_nan_is_rejected() {
        assert!(matches!(to_decimal(f64::NAN, "cost"), Err(AppError::BadRequest(_))));
        assert_eq!(to_decimal_opt(None, "cost").unwrap(), None);
    }
}
