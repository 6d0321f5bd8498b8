//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

use crate::models::fitness::FluidLevel;
use crate::models::odometer::ReadingType;
use crate::models::user::Role;

/// Validar y convertir string a fecha (`YYYY-MM-DD`)
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error.message = Some("Date must use the YYYY-MM-DD format".into());
        error
    })
}

/// Interpretar fechas en los formatos aceptados por la API:
/// RFC 3339, `YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DDTHH:MM[:SS]` o `YYYY-MM-DD` (medianoche UTC)
pub fn parse_flexible_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Deserializador para campos de fecha opcionales
pub fn deserialize_optional_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_flexible_datetime(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", s))),
    }
}

/// Deserializador para fechas que pueden borrarse en un PATCH:
/// ausente -> `None`, `null` -> `Some(None)`, valor -> `Some(Some(fecha))`.
/// Se usa junto a `#[serde(default)]`.
pub fn deserialize_nullable_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_optional_datetime(deserializer).map(Some)
}

/// Validador para `validator`: texto no vacío tras recortar espacios
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.message = Some("Value cannot be empty".into());
        return Err(error);
    }
    Ok(())
}

/// Validador para `validator`: rol conocido (sin distinguir mayúsculas)
pub fn validate_role(value: &str) -> Result<(), ValidationError> {
    value.parse::<Role>().map(|_| ()).map_err(|_| {
        let mut error = ValidationError::new("role");
        error.message = Some("Role must be one of: admin, accountant, driver".into());
        error
    })
}

/// Validador para `validator`: nivel de aceite o agua
pub fn validate_fluid_level(value: &str) -> Result<(), ValidationError> {
    value.parse::<FluidLevel>().map(|_| ()).map_err(|message| {
        let mut error = ValidationError::new("fluid_level");
        error.message = Some(message.into());
        error
    })
}

/// Validador para `validator`: lectura de la mañana o de la tarde
pub fn validate_reading_type(value: &str) -> Result<(), ValidationError> {
    value.parse::<ReadingType>().map(|_| ()).map_err(|message| {
        let mut error = ValidationError::new("reading_type");
        error.message = Some(message.into());
        error
    })
}

/// Validador para `validator`: fecha `YYYY-MM-DD`
pub fn validate_date_str(value: &str) -> Result<(), ValidationError> {
    validate_date(value).map(|_| ())
}

/// Limitar un `limit` de query string a un rango razonable
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_flexible_datetime_formats() {
        let date_only = parse_flexible_datetime("2026-04-02").unwrap();
        assert_eq!((date_only.year(), date_only.month(), date_only.day()), (2026, 4, 2));
        assert_eq!(date_only.hour(), 0);

        let with_time = parse_flexible_datetime("2026-04-02 14:30").unwrap();
        assert_eq!((with_time.hour(), with_time.minute()), (14, 30));

        let rfc = parse_flexible_datetime("2026-04-02T10:00:00+05:30").unwrap();
        assert_eq!(rfc.hour(), 4);
        assert_eq!(rfc.minute(), 30);

        assert!(parse_flexible_datetime("02/04/2026").is_none());
    }

    #[test]
    fn test_enum_validators() {
        assert!(validate_fluid_level("adequate").is_ok());
        assert!(validate_fluid_level("empty").is_err());
        assert!(validate_reading_type("evening").is_ok());
        assert!(validate_reading_type("noon").is_err());
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2026-02-28").is_ok());
        assert!(validate_date("2026-02-30").is_err());
    }

    #[test]
    fn test_nullable_datetime_distinguishes_null_and_missing() {
        #[derive(Deserialize)]
        struct Patch {
            #[serde(default, deserialize_with = "deserialize_nullable_datetime")]
            end_date: Option<Option<DateTime<Utc>>>,
        }

        let missing: Patch = serde_json::from_str("{}").unwrap();
        assert!(missing.end_date.is_none());

        let cleared: Patch = serde_json::from_str(r#"{"end_date": null}"#).unwrap();
        assert_eq!(cleared.end_date, Some(None));

        let set: Patch = serde_json::from_str(r#"{"end_date": "2026-05-01"}"#).unwrap();
        assert!(matches!(set.end_date, Some(Some(_))));
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None, 50, 200), 50);
        assert_eq!(clamp_limit(Some(0), 50, 200), 1);
        assert_eq!(clamp_limit(Some(1000), 50, 200), 200);
    }
}
