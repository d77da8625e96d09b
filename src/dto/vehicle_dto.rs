use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::validate_plate;

// Request para crear un vehículo
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    pub client_id: Uuid,

    #[validate(custom = "validate_plate")]
    pub plate: String,

    #[validate(length(min = 1, max = 60, message = "La marca es requerida"))]
    pub brand: String,

    #[validate(length(min = 1, max = 60, message = "El modelo es requerido"))]
    pub model: String,

    #[validate(range(min = 1900, max = 2100, message = "Año inválido"))]
    pub year: Option<i32>,

    #[validate(length(max = 40))]
    pub color: Option<String>,

    #[validate(length(max = 20))]
    pub fuel_type: Option<String>,

    #[validate(length(max = 20))]
    pub transmission: Option<String>,

    #[validate(length(max = 30))]
    pub vin: Option<String>,

    #[validate(range(min = 0, message = "El kilometraje no puede ser negativo"))]
    pub mileage: Option<i32>,

    pub notes: Option<String>,
}

// Request para actualizar un vehículo
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    pub client_id: Option<Uuid>,

    #[validate(custom = "validate_plate")]
    pub plate: Option<String>,

    #[validate(length(min = 1, max = 60, message = "La marca es requerida"))]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 60, message = "El modelo es requerido"))]
    pub model: Option<String>,

    #[validate(range(min = 1900, max = 2100, message = "Año inválido"))]
    pub year: Option<i32>,

    pub color: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub vin: Option<String>,

    #[validate(range(min = 0, message = "El kilometraje no puede ser negativo"))]
    pub mileage: Option<i32>,

    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleQuery {
    pub client_id: Option<Uuid>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
