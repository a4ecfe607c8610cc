//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! de rutas, vehículos y conductores.

use chrono::{Datelike, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use validator::ValidationError;

/// Año mínimo aceptado para un vehículo
pub const MIN_VEHICLE_YEAR: i32 = 1900;

/// Longitud fija del número de licencia (CNH)
pub const LICENSE_NUMBER_LENGTH: usize = 11;

lazy_static! {
    // Formato antiguo (ABC-1234 / ABC1234) y formato Mercosul (ABC1D23)
    static ref LEGACY_PLATE: Regex = Regex::new(r"^[A-Z]{3}-?[0-9]{4}$").unwrap();
    static ref MERCOSUL_PLATE: Regex = Regex::new(r"^[A-Z]{3}[0-9][A-Z][0-9]{2}$").unwrap();
    static ref LICENSE_NUMBER: Regex = Regex::new(r"^[0-9]{11}$").unwrap();
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + std::fmt::Display + Serialize>(
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    // NaN no es comparable: `!(value >= 0)` también lo rechaza
    if !(value >= T::zero()) {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar una medida (distancia, duración): finita y no negativa
pub fn validate_measure(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        let mut error = ValidationError::new("finite");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    validate_non_negative(value)
}

/// Normalizar matrícula: mayúsculas, sin espacios ni guiones
pub fn normalize_plate(value: &str) -> String {
    value
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect()
}

/// Validar formato de matrícula de vehículo (antiguo o Mercosul)
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    let upper = value.trim().to_uppercase();
    if LEGACY_PLATE.is_match(&upper) || MERCOSUL_PLATE.is_match(&upper) {
        return Ok(());
    }

    let mut error = ValidationError::new("license_plate");
    error.add_param("value".into(), &value.to_string());
    error.add_param("format".into(), &"ABC-1234 or ABC1D23".to_string());
    Err(error)
}

/// Validar número de licencia de conducir: 11 dígitos
pub fn validate_license_number(value: &str) -> Result<(), ValidationError> {
    if LICENSE_NUMBER.is_match(value.trim()) {
        return Ok(());
    }

    let mut error = ValidationError::new("license_number");
    error.add_param("value".into(), &value.to_string());
    error.add_param("length".into(), &LICENSE_NUMBER_LENGTH);
    Err(error)
}

/// Validar año de fabricación en [1900, año actual]
pub fn validate_vehicle_year(year: i32) -> Result<(), ValidationError> {
    validate_range(year, MIN_VEHICLE_YEAR, Utc::now().year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Rua A").is_ok());
        assert!(validate_not_empty("").is_err());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range(5, 1, 10).is_ok());
        assert!(validate_range(0, 1, 10).is_err());
        assert!(validate_range(15, 1, 10).is_err());
    }

    #[test]
    fn test_validate_measure() {
        assert!(validate_measure(0.0).is_ok());
        assert!(validate_measure(12.5).is_ok());
        assert!(validate_measure(-0.1).is_err());
        assert!(validate_measure(f64::NAN).is_err());
        assert!(validate_measure(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_license_plate() {
        assert!(validate_license_plate("ABC-1234").is_ok());
        assert!(validate_license_plate("abc1234").is_ok());
        assert!(validate_license_plate("BRA2E19").is_ok());
        assert!(validate_license_plate("AB-123-CD").is_err());
        assert!(validate_license_plate("A").is_err());
    }

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate(" abc-1234 "), "ABC1234");
        assert_eq!(normalize_plate("bra2e19"), "BRA2E19");
    }

    #[test]
    fn test_validate_license_number() {
        assert!(validate_license_number("12345678901").is_ok());
        assert!(validate_license_number("1234567890").is_err());
        assert!(validate_license_number("1234567890A").is_err());
    }

    #[test]
    fn test_validate_vehicle_year() {
        assert!(validate_vehicle_year(1900).is_ok());
        assert!(validate_vehicle_year(Utc::now().year()).is_ok());
        assert!(validate_vehicle_year(1899).is_err());
        assert!(validate_vehicle_year(Utc::now().year() + 1).is_err());
    }
}
