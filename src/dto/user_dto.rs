use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

// Request para crear un usuario
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 2, max = 120, message = "El nombre debe tener entre 2 y 120 caracteres"))]
    pub name: String,

    #[validate(email(message = "Email inválido"))]
    pub email: String,

    #[validate(length(min = 8, max = 100, message = "La contraseña debe tener al menos 8 caracteres"))]
    pub password: String,

    pub branch_id: Uuid,
    pub role_id: Uuid,
}

// Request para actualizar un usuario
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 120, message = "El nombre debe tener entre 2 y 120 caracteres"))]
    pub name: Option<String>,

    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,

    #[validate(length(min = 8, max = 100, message = "La contraseña debe tener al menos 8 caracteres"))]
    pub password: Option<String>,

    pub branch_id: Option<Uuid>,
    pub role_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub branch_id: Option<Uuid>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
