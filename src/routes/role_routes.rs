use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde_json::Value;
use uuid::Uuid;

use crate::controllers::role_controller::RoleController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::role_dto::{CreateRoleRequest, UpdateRoleRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::role::Role;
use crate::services::authorization_service::{Action, Resource};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath};

pub fn create_role_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/:id", get(get_role).put(update_role))
}

async fn list_roles(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<Role>>>, AppError> {
    user.require(Resource::Roles, Action::View)?;
    let roles = RoleController::new(state).list().await?;
    Ok(Json(ApiResponse::success(roles)))
}

async fn get_role(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Role>>, AppError> {
    user.require(Resource::Roles, Action::View)?;
    let role = RoleController::new(state).get_by_id(id).await?;
    Ok(Json(ApiResponse::success(role)))
}

async fn create_role(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateRoleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    user.require_admin()?;
    let response = RoleController::new(state).create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_role(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateRoleRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    user.require_admin()?;
    let response = RoleController::new(state).update(id, request).await?;
    Ok(Json(response))
}
