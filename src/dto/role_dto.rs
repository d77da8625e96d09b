use serde::Deserialize;
use validator::Validate;

use crate::models::role::PermissionMap;

// Request para crear un rol
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    #[validate(length(min = 2, max = 60, message = "El nombre debe tener entre 2 y 60 caracteres"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: PermissionMap,
}

// Request para actualizar un rol
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    #[validate(length(min = 2, max = 60, message = "El nombre debe tener entre 2 y 60 caracteres"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<PermissionMap>,
}
