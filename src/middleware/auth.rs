//! Middleware de autenticación JWT
//!
//! Valida el token Bearer, carga el usuario y su rol, e inyecta un
//! `AuthenticatedUser` en las extensions de la request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::models::role::PermissionMap;
use crate::repositories::user_repository::UserRepository;
use crate::services::lookup_cache;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{extract_token_from_header, verify_token};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub branch_id: Uuid,
    pub role_id: Uuid,
    pub role_name: String,
    pub is_admin: bool,
    pub permissions: PermissionMap,
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let token = extract_token_from_header(auth_header)
        .map_err(|_| AppError::Unauthorized("Formato de token inválido".to_string()))?;

    let claims = verify_token(token, &state.jwt)
        .map_err(|_| AppError::Unauthorized("Token inválido o expirado".to_string()))?;
    let user_id = claims
        .user_id()
        .map_err(|_| AppError::Unauthorized("Token inválido".to_string()))?;

    let authenticated_user = load_authenticated_user(&state, user_id).await?;
    debug!("🔐 Usuario autenticado: {} ({})", authenticated_user.user_id, authenticated_user.role_name);

    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

/// Construir el usuario autenticado a partir de la base; el rol sale del cache
pub async fn load_authenticated_user(state: &AppState, user_id: Uuid) -> Result<AuthenticatedUser, AppError> {
    let user = UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    if !user.is_active {
        return Err(AppError::Unauthorized("Usuario inactivo".to_string()));
    }

    let role = lookup_cache::role(state, user.role_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Rol no encontrado".to_string()))?;

    Ok(AuthenticatedUser {
        user_id: user.id,
        branch_id: user.branch_id,
        role_id: role.id,
        is_admin: role.is_admin(),
        role_name: role.name,
        permissions: role.permissions.0,
    })
}
