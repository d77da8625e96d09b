use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::role::PermissionMap;

// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email inválido"))]
    pub email: String,

    #[validate(length(min = 1, message = "La contraseña es requerida"))]
    pub password: String,
}

// Usuario autenticado tal como lo consume el frontend
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub branch_id: Uuid,
    pub branch_name: String,
    pub role_id: Uuid,
    pub role_name: String,
    pub is_admin: bool,
    pub permissions: PermissionMap,
}

// Login response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: CurrentUser,
}
