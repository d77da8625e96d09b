use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde_json::Value;
use uuid::Uuid;

use crate::controllers::branch_controller::BranchController;
use crate::dto::branch_dto::{BranchQuery, CreateBranchRequest, UpdateBranchRequest};
use crate::dto::common_dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::branch::Branch;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath, ApiQuery};

pub fn create_branch_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_branches).post(create_branch))
        .route("/:id", get(get_branch).put(update_branch).delete(delete_branch))
}

async fn list_branches(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiQuery(query): ApiQuery<BranchQuery>,
) -> Result<Json<ApiResponse<Vec<Branch>>>, AppError> {
    let controller = BranchController::new(state.pool.clone());
    let branches = controller.list(&user, query).await?;
    Ok(Json(ApiResponse::success(branches)))
}

async fn get_branch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Branch>>, AppError> {
    let controller = BranchController::new(state.pool.clone());
    let branch = controller.get_by_id(&user, id).await?;
    Ok(Json(ApiResponse::success(branch)))
}

async fn create_branch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateBranchRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    user.require_admin()?;
    let controller = BranchController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_branch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateBranchRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    user.require_admin()?;
    let controller = BranchController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_branch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require_admin()?;
    let controller = BranchController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(ApiResponse::message("Sucursal desactivada exitosamente")))
}
