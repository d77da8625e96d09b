use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::utils::validation::{
    normalize_optional, validate_email_or_empty, validate_phone_or_empty, PHONE_REGEX,
};

// Request para crear un cliente
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_contact", skip_on_field_errors = false))]
pub struct CreateClientRequest {
    #[validate(length(min = 2, max = 150, message = "El nombre debe tener entre 2 y 150 caracteres"))]
    pub name: String,

    #[validate(regex(path = "PHONE_REGEX", message = "Teléfono inválido"))]
    pub phone: Option<String>,

    #[validate(regex(path = "PHONE_REGEX", message = "WhatsApp inválido"))]
    pub whatsapp: Option<String>,

    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,

    pub address: Option<String>,
    pub document_number: Option<String>,
    pub notes: Option<String>,
    pub branch_id: Option<Uuid>,
}

/// Un cliente necesita teléfono o WhatsApp
fn validate_contact(request: &CreateClientRequest) -> Result<(), ValidationError> {
    let has_phone = request.phone.as_deref().is_some_and(|p| !p.trim().is_empty());
    let has_whatsapp = request.whatsapp.as_deref().is_some_and(|w| !w.trim().is_empty());

    if has_phone || has_whatsapp {
        Ok(())
    } else {
        let mut error = ValidationError::new("contact_required");
        error.message = Some("Se requiere teléfono o WhatsApp".into());
        Err(error)
    }
}

// Request para actualizar un cliente. Un string vacío borra el campo.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientRequest {
    #[validate(length(min = 2, max = 150, message = "El nombre debe tener entre 2 y 150 caracteres"))]
    pub name: Option<String>,

    #[validate(custom = "validate_phone_or_empty")]
    pub phone: Option<String>,

    #[validate(custom = "validate_phone_or_empty")]
    pub whatsapp: Option<String>,

    #[validate(custom = "validate_email_or_empty")]
    pub email: Option<String>,

    pub address: Option<String>,
    pub document_number: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientQuery {
    pub search: Option<String>,
    pub branch_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Datos de contacto ya unificados
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
}

impl ContactInfo {
    /// Unificar teléfono y WhatsApp: si solo llega uno, se replica en el otro
    pub fn unify(phone: Option<String>, whatsapp: Option<String>) -> Self {
        let phone = normalize_optional(phone);
        let whatsapp = normalize_optional(whatsapp);

        Self {
            phone: phone.clone().or_else(|| whatsapp.clone()),
            whatsapp: whatsapp.or(phone),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.phone.is_none() && self.whatsapp.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(phone: Option<&str>, whatsapp: Option<&str>) -> CreateClientRequest {
        CreateClientRequest {
            name: "Juan Pérez".to_string(),
            phone: phone.map(str::to_string),
            whatsapp: whatsapp.map(str::to_string),
            email: None,
            address: None,
            document_number: None,
            notes: None,
            branch_id: None,
        }
    }

    #[test]
    fn test_client_without_contact_is_invalid() {
        let errors = request(None, None).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("__all__"));
        assert!(request(None, Some("   ")).validate().is_err());
    }

    #[test]
    fn test_client_with_whatsapp_only_is_valid() {
        assert!(request(None, Some("3001234567")).validate().is_ok());
        assert!(request(Some("3001234567"), None).validate().is_ok());
    }

    #[test]
    fn test_invalid_phone_is_rejected() {
        assert!(request(Some("abc"), None).validate().is_err());
    }

    #[test]
    fn test_update_checks_contact_format_but_accepts_clearing() {
        let update: UpdateClientRequest =
            serde_json::from_str(r#"{"phone":"abc","email":"nope"}"#).unwrap();
        let errors = update.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone"));
        assert!(errors.field_errors().contains_key("email"));

        let clearing: UpdateClientRequest =
            serde_json::from_str(r#"{"whatsapp":"","email":""}"#).unwrap();
        assert!(clearing.validate().is_ok());

        let valid: UpdateClientRequest =
            serde_json::from_str(r#"{"phone":"+57 300 123 4567","email":"ana@taller.co"}"#).unwrap();
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn test_unify_mirrors_whatsapp_into_phone() {
        let contact = ContactInfo::unify(None, Some("3001234567".into()));
        assert_eq!(contact.phone.as_deref(), Some("3001234567"));
        assert_eq!(contact.whatsapp.as_deref(), Some("3001234567"));
    }

    #[test]
    fn test_unify_keeps_both_when_present() {
        let contact = ContactInfo::unify(Some(" 6011234567 ".into()), Some("3001234567".into()));
        assert_eq!(contact.phone.as_deref(), Some("6011234567"));
        assert_eq!(contact.whatsapp.as_deref(), Some("3001234567"));
        assert!(ContactInfo::unify(Some("".into()), None).is_empty());
    }
}
