use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde_json::Value;
use uuid::Uuid;

use crate::controllers::user_controller::UserController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::user_dto::{CreateUserRequest, UpdateUserRequest, UserQuery};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::User;
use crate::services::authorization_service::{Action, Resource};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath, ApiQuery};

pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    user.require(Resource::Users, Action::View)?;
    let controller = UserController::new(state.pool.clone());
    let data = controller.list(&user, query).await?;
    Ok(Json(ApiResponse::success(data)))
}

async fn get_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    user.require(Resource::Users, Action::View)?;
    let controller = UserController::new(state.pool.clone());
    let found = controller.get_by_id(&user, id).await?;
    Ok(Json(ApiResponse::success(found)))
}

async fn create_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    user.require(Resource::Users, Action::Create)?;
    let controller = UserController::new(state.pool.clone());
    let response = controller.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    user.require(Resource::Users, Action::Edit)?;
    let controller = UserController::new(state.pool.clone());
    let response = controller.update(&user, id, request).await?;
    Ok(Json(response))
}

async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require(Resource::Users, Action::Delete)?;
    let controller = UserController::new(state.pool.clone());
    controller.delete(&user, id).await?;
    Ok(Json(ApiResponse::message("Usuario desactivado exitosamente")))
}
