use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::dto::client_dto::CreateClientRequest;
use crate::utils::validation::{validate_plate, validate_signature};

// Vehículo nuevo capturado en la recepción
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionVehicle {
    #[validate(custom = "validate_plate")]
    pub plate: String,

    #[validate(length(min = 1, max = 60, message = "La marca es requerida"))]
    pub brand: String,

    #[validate(length(min = 1, max = 60, message = "El modelo es requerido"))]
    pub model: String,

    #[validate(range(min = 1900, max = 2100, message = "Año inválido"))]
    pub year: Option<i32>,

    pub color: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
}

// Checklist de inspección; lo no marcado se guarda como falso
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceptionChecklist {
    pub luces_ok: bool,
    pub llantas_ok: bool,
    pub frenos_ok: bool,
    pub espejos_ok: bool,
    pub parabrisas_ok: bool,
    pub documentos_ok: bool,
    pub herramientas_ok: bool,
    pub llanta_repuesto_ok: bool,
}

// Request de recepción de vehículo (cliente → vehículo → checklist → firma)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_reception_targets", skip_on_field_errors = false))]
pub struct ReceiveVehicleRequest {
    pub client_id: Option<Uuid>,
    #[validate]
    pub client: Option<CreateClientRequest>,

    pub vehicle_id: Option<Uuid>,
    #[validate]
    pub vehicle: Option<ReceptionVehicle>,

    /// Orden existente a completar con los datos de recepción
    pub service_id: Option<Uuid>,
    pub appointment_id: Option<Uuid>,
    pub mechanic_id: Option<Uuid>,

    #[validate(length(min = 3, message = "La descripción del problema es requerida"))]
    pub problem_description: String,

    #[validate(range(min = 0, message = "El kilometraje no puede ser negativo"))]
    pub kilometraje: Option<i32>,

    #[validate(range(min = 0, max = 100, message = "El nivel de combustible debe estar entre 0 y 100"))]
    pub nivel_combustible: Option<i32>,

    #[serde(default)]
    pub checklist: ReceptionChecklist,

    pub carroceria_notes: Option<String>,
    pub observaciones: Option<String>,

    #[validate(custom = "validate_signature")]
    pub signature: String,

    #[validate(length(max = 150))]
    pub signed_by: Option<String>,
}

/// Se necesita un cliente y un vehículo, existentes o nuevos
fn validate_reception_targets(request: &ReceiveVehicleRequest) -> Result<(), ValidationError> {
    let message = match (
        request.client_id.is_some() || request.client.is_some(),
        request.vehicle_id.is_some() || request.vehicle.is_some(),
    ) {
        (true, true) => return Ok(()),
        (false, _) => "Se requiere un cliente existente o los datos de uno nuevo",
        (_, false) => "Se requiere un vehículo existente o los datos de uno nuevo",
    };

    let mut error = ValidationError::new("reception_targets");
    error.message = Some(message.into());
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNATURE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    fn base() -> serde_json::Value {
        serde_json::json!({
            "client": { "name": "Juan Pérez", "whatsapp": "3001234567" },
            "vehicle": { "plate": "abc-123", "brand": "Mazda", "model": "3" },
            "problemDescription": "Revisión general",
            "nivelCombustible": 50,
            "checklist": { "lucesOk": true },
            "signature": SIGNATURE
        })
    }

    #[test]
    fn test_valid_reception_with_new_client_and_vehicle() {
        let request: ReceiveVehicleRequest = serde_json::from_value(base()).unwrap();
        assert!(request.validate().is_ok());
        assert!(request.checklist.luces_ok);
        assert!(!request.checklist.frenos_ok);
    }

    #[test]
    fn test_reception_requires_vehicle() {
        let mut body = base();
        body.as_object_mut().unwrap().remove("vehicle");
        let request: ReceiveVehicleRequest = serde_json::from_value(body).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_reception_validates_nested_client() {
        let mut body = base();
        body["client"] = serde_json::json!({ "name": "Sin Contacto" });
        let request: ReceiveVehicleRequest = serde_json::from_value(body).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_reception_rejects_bad_signature_and_fuel_level() {
        let mut body = base();
        body["signature"] = serde_json::json!("firma");
        let request: ReceiveVehicleRequest = serde_json::from_value(body).unwrap();
        assert!(request.validate().is_err());

        let mut body = base();
        body["nivelCombustible"] = serde_json::json!(120);
        let request: ReceiveVehicleRequest = serde_json::from_value(body).unwrap();
        assert!(request.validate().is_err());
    }
}
