use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::{validate_percentage, PHONE_REGEX};

// Request para crear un mecánico
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMechanicRequest {
    #[validate(length(min = 2, max = 120, message = "El nombre debe tener entre 2 y 120 caracteres"))]
    pub name: String,

    #[validate(regex(path = "PHONE_REGEX", message = "Teléfono inválido"))]
    pub phone: Option<String>,

    #[validate(length(max = 80))]
    pub specialty: Option<String>,

    #[validate(custom = "validate_percentage")]
    pub commission_percentage: Decimal,

    pub branch_id: Option<Uuid>,
}

// Request para actualizar un mecánico
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMechanicRequest {
    #[validate(length(min = 2, max = 120, message = "El nombre debe tener entre 2 y 120 caracteres"))]
    pub name: Option<String>,

    #[validate(regex(path = "PHONE_REGEX", message = "Teléfono inválido"))]
    pub phone: Option<String>,

    pub specialty: Option<String>,

    #[validate(custom = "validate_percentage")]
    pub commission_percentage: Option<Decimal>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanicQuery {
    pub include_inactive: Option<bool>,
    pub branch_id: Option<Uuid>,
}

// Periodo del reporte de comisiones (fechas inclusivas)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commission_percentage_bounds() {
        let request = |pct: &str| CreateMechanicRequest {
            name: "Carlos Ruiz".to_string(),
            phone: None,
            specialty: None,
            commission_percentage: pct.parse().unwrap(),
            branch_id: None,
        };

        assert!(request("15.5").validate().is_ok());
        assert!(request("100").validate().is_ok());
        assert!(request("100.01").validate().is_err());
        assert!(request("-1").validate().is_err());
    }

    #[test]
    fn test_percentage_deserializes_from_number() {
        let request: CreateMechanicRequest =
            serde_json::from_str(r#"{"name":"Ana","commissionPercentage":12.5}"#).unwrap();
        assert_eq!(request.commission_percentage, Decimal::new(125, 1));
    }
}
