use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::PHONE_REGEX;

// Request para crear una sucursal
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchRequest {
    #[validate(length(min = 2, max = 120, message = "El nombre debe tener entre 2 y 120 caracteres"))]
    pub name: String,
    pub address: Option<String>,
    #[validate(regex(path = "PHONE_REGEX", message = "Teléfono inválido"))]
    pub phone: Option<String>,
}

// Request para actualizar una sucursal
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBranchRequest {
    #[validate(length(min = 2, max = 120, message = "El nombre debe tener entre 2 y 120 caracteres"))]
    pub name: Option<String>,
    pub address: Option<String>,
    #[validate(regex(path = "PHONE_REGEX", message = "Teléfono inválido"))]
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchQuery {
    pub include_inactive: Option<bool>,
}
