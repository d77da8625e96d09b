use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde_json::Value;
use uuid::Uuid;

use crate::controllers::mechanic_controller::MechanicController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::mechanic_dto::{
    CommissionQuery, CreateMechanicRequest, MechanicQuery, UpdateMechanicRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::mechanic::{CommissionSummary, Mechanic};
use crate::services::authorization_service::{Action, Resource};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath, ApiQuery};

pub fn create_mechanic_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_mechanic))
        .route("/", get(list_mechanics))
        .route("/:id", get(get_mechanic))
        .route("/:id", put(update_mechanic))
        .route("/:id", delete(delete_mechanic))
        .route("/:id/commissions", get(get_commissions))
}

async fn create_mechanic(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateMechanicRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    user.require(Resource::Mechanics, Action::Create)?;
    let controller = MechanicController::new(state.pool.clone());
    let response = controller.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_mechanics(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiQuery(query): ApiQuery<MechanicQuery>,
) -> Result<Json<ApiResponse<Vec<Mechanic>>>, AppError> {
    user.require(Resource::Mechanics, Action::View)?;
    let controller = MechanicController::new(state.pool.clone());
    let mechanics = controller.list(&user, query).await?;
    Ok(Json(ApiResponse::success(mechanics)))
}

async fn get_mechanic(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Mechanic>>, AppError> {
    user.require(Resource::Mechanics, Action::View)?;
    let controller = MechanicController::new(state.pool.clone());
    let mechanic = controller.get_by_id(&user, id).await?;
    Ok(Json(ApiResponse::success(mechanic)))
}

async fn update_mechanic(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateMechanicRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    user.require(Resource::Mechanics, Action::Edit)?;
    let controller = MechanicController::new(state.pool.clone());
    let response = controller.update(&user, id, request).await?;
    Ok(Json(response))
}

async fn delete_mechanic(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require(Resource::Mechanics, Action::Delete)?;
    let controller = MechanicController::new(state.pool.clone());
    controller.delete(&user, id).await?;
    Ok(Json(ApiResponse::message("Mecánico desactivado exitosamente")))
}

/// Comisiones del mecánico sobre servicios terminados o entregados
async fn get_commissions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<CommissionQuery>,
) -> Result<Json<ApiResponse<CommissionSummary>>, AppError> {
    user.require(Resource::Mechanics, Action::View)?;
    let controller = MechanicController::new(state.pool.clone());
    let summary = controller.commissions(&user, id, query).await?;
    Ok(Json(ApiResponse::success(summary)))
}
