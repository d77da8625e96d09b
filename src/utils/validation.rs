//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y normalización de valores recibidos desde el frontend.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

/// Tamaño máximo de la firma decodificada (2 MB)
pub const MAX_SIGNATURE_BYTES: usize = 2 * 1024 * 1024;

lazy_static! {
    /// Placa normalizada: letras y dígitos, 5 a 10 caracteres
    pub static ref PLATE_REGEX: Regex = Regex::new(r"^[A-Z0-9]{5,10}$").unwrap();
    /// Teléfono: dígitos con separadores y prefijo internacional opcional
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9 ()\-]{7,20}$").unwrap();
    /// Prefijo de data URL aceptado para firmas
    static ref SIGNATURE_PREFIX: Regex =
        Regex::new(r"^data:image/(png|jpeg|jpg);base64,").unwrap();
}

fn error_with(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = error_with("non_negative", "El valor no puede ser negativo");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Monto en dinero: no negativo
pub fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(*value)
}

/// Porcentaje de comisión: 0 a 100
pub fn validate_percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        let mut error = error_with("percentage", "El porcentaje debe estar entre 0 y 100");
        error.add_param("value".into(), value);
        return Err(error);
    }
    Ok(())
}

/// Normalizar placa: mayúsculas, sin espacios ni guiones
pub fn normalize_plate(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_' | '.'))
        .flat_map(char::to_uppercase)
        .collect()
}

/// Validar formato de placa de vehículo (se normaliza antes de comparar)
pub fn validate_plate(value: &str) -> Result<(), ValidationError> {
    if !PLATE_REGEX.is_match(&normalize_plate(value)) {
        let mut error = error_with("plate", "La placa debe tener entre 5 y 10 letras o dígitos");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Normalizar un campo opcional: recorta espacios y descarta vacíos
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Campo opcional en una edición: `None` conserva el actual, `""` lo borra
pub fn merge_optional(incoming: Option<String>, existing: Option<String>) -> Option<String> {
    match incoming {
        Some(value) => normalize_optional(Some(value)),
        None => existing,
    }
}

/// Teléfono en una edición: vacío borra el campo
pub fn validate_phone_or_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || PHONE_REGEX.is_match(value.trim()) {
        return Ok(());
    }
    Err(error_with("phone", "Teléfono inválido"))
}

/// Email en una edición: vacío borra el campo
pub fn validate_email_or_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || validator::validate_email(value.trim()) {
        return Ok(());
    }
    Err(error_with("email", "Email inválido"))
}

/// Validar una firma capturada como data URL (PNG o JPEG en base64)
pub fn validate_signature(value: &str) -> Result<(), ValidationError> {
    let Some(prefix) = SIGNATURE_PREFIX.find(value) else {
        return Err(error_with(
            "signature",
            "La firma debe ser una imagen PNG o JPEG en formato data URL",
        ));
    };

    let payload = &value[prefix.end()..];
    // base64 ocupa 4/3 del tamaño decodificado
    if payload.len() / 4 * 3 > MAX_SIGNATURE_BYTES {
        return Err(error_with("signature_size", "La firma excede el tamaño máximo de 2 MB"));
    }

    match STANDARD.decode(payload) {
        Ok(bytes) if !bytes.is_empty() => Ok(()),
        _ => Err(error_with("signature", "La firma no es un base64 válido")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_percentage() {
        assert!(validate_percentage(&Decimal::new(155, 1)).is_ok());
        assert!(validate_percentage(&Decimal::ZERO).is_ok());
        assert!(validate_percentage(&Decimal::ONE_HUNDRED).is_ok());
        assert!(validate_percentage(&Decimal::new(10001, 2)).is_err());
        assert!(validate_percentage(&Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(&Decimal::new(150000, 2)).is_ok());
        assert!(validate_amount(&Decimal::new(-5, 0)).is_err());
    }

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate("abc-123"), "ABC123");
        assert_eq!(normalize_plate(" xyz 98a "), "XYZ98A");
    }

    #[test]
    fn test_validate_plate() {
        assert!(validate_plate("ABC-123").is_ok());
        assert!(validate_plate("abc 12d").is_ok());
        assert!(validate_plate("A1").is_err());
        assert!(validate_plate("ABC#123").is_err());
    }

    #[test]
    fn test_merge_optional() {
        let existing = Some("Cambio de aceite".to_string());
        assert_eq!(merge_optional(None, existing.clone()), existing);
        assert_eq!(merge_optional(Some("  ".into()), existing.clone()), None);
        assert_eq!(merge_optional(Some(" Frenos ".into()), existing).as_deref(), Some("Frenos"));
    }

    #[test]
    fn test_optional_contact_validators() {
        assert!(validate_phone_or_empty("").is_ok());
        assert!(validate_phone_or_empty("300 123 4567").is_ok());
        assert!(validate_phone_or_empty("abc").is_err());
        assert!(validate_email_or_empty("  ").is_ok());
        assert!(validate_email_or_empty("ana@taller.co").is_ok());
        assert!(validate_email_or_empty("nope").is_err());
    }

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("3001234567"));
        assert!(PHONE_REGEX.is_match("+57 (300) 123-4567"));
        assert!(!PHONE_REGEX.is_match("12ab"));
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(Some("  hola ".into())), Some("hola".into()));
        assert_eq!(normalize_optional(Some("   ".into())), None);
        assert_eq!(normalize_optional(None), None);
    }

    #[test]
    fn test_validate_signature() {
        // PNG 1x1 mínimo
        let png = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";
        assert!(validate_signature(png).is_ok());
        assert!(validate_signature("data:image/gif;base64,R0lGOD").is_err());
        assert!(validate_signature("data:image/png;base64,@@@").is_err());
        assert!(validate_signature("data:image/png;base64,").is_err());
        assert!(validate_signature("no es una firma").is_err());
    }
}
