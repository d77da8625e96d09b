use axum::{extract::State, routing::post, Extension, Json, Router};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{CurrentUser, LoginRequest, LoginResponse};
use crate::dto::common_dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ApiJson;

/// Rutas públicas de autenticación
pub fn create_auth_router() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let controller = AuthController::new(state);
    let response = controller.login(request).await?;
    Ok(Json(response))
}

/// Usuario autenticado con rol, permisos y sucursal
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<CurrentUser>>, AppError> {
    let controller = AuthController::new(state);
    let current_user = controller.current_user(&user).await?;
    Ok(Json(ApiResponse::success(current_user)))
}
