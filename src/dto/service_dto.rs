use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::validate_amount;

// Request para crear una orden de servicio
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    pub mechanic_id: Option<Uuid>,
    pub status_id: Option<i32>,
    pub appointment_id: Option<Uuid>,

    #[validate(length(min = 3, message = "La descripción del problema es requerida"))]
    pub problem_description: String,

    pub diagnosis: Option<String>,
    pub quotation_details: Option<String>,

    #[validate(custom = "validate_amount")]
    pub total_amount: Option<Decimal>,

    /// Se persiste tal cual llega; si falta se calcula con el porcentaje del mecánico
    #[validate(custom = "validate_amount")]
    pub mechanic_commission: Option<Decimal>,

    pub branch_id: Option<Uuid>,
}

// Request para actualizar una orden de servicio
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    pub mechanic_id: Option<Uuid>,
    /// Quita el mecánico asignado
    #[serde(default)]
    pub unassign_mechanic: bool,

    #[validate(length(min = 3, message = "La descripción del problema es requerida"))]
    pub problem_description: Option<String>,

    pub diagnosis: Option<String>,
    pub quotation_details: Option<String>,

    #[validate(custom = "validate_amount")]
    pub total_amount: Option<Decimal>,

    #[validate(custom = "validate_amount")]
    pub mechanic_commission: Option<Decimal>,
}

// Request para cambiar el estado de una orden
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceStatusRequest {
    #[validate(range(min = 1, message = "Estado inválido"))]
    pub status_id: i32,

    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceQuery {
    pub status_id: Option<i32>,
    pub client_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub mechanic_id: Option<Uuid>,
    pub branch_id: Option<Uuid>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Entidad sobre la que se consulta el historial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryType {
    Client,
    Vehicle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_amounts_are_rejected() {
        let request: CreateServiceRequest = serde_json::from_value(serde_json::json!({
            "clientId": Uuid::new_v4(),
            "vehicleId": Uuid::new_v4(),
            "problemDescription": "Ruido en frenos",
            "totalAmount": -10,
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_commission_is_optional() {
        let request: CreateServiceRequest = serde_json::from_value(serde_json::json!({
            "clientId": Uuid::new_v4(),
            "vehicleId": Uuid::new_v4(),
            "problemDescription": "Cambio de aceite",
            "totalAmount": 120000,
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert!(request.mechanic_commission.is_none());
    }

    #[test]
    fn test_history_type_from_path() {
        let t: HistoryType = serde_json::from_str("\"vehicle\"").unwrap();
        assert_eq!(t, HistoryType::Vehicle);
        assert!(serde_json::from_str::<HistoryType>("\"mechanic\"").is_err());
    }
}
