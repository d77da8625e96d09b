use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde_json::Value;
use uuid::Uuid;

use crate::controllers::opportunity_controller::OpportunityController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::opportunity_dto::{
    CreateOpportunityRequest, OpportunityQuery, UpdateOpportunityRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::opportunity::Opportunity;
use crate::services::authorization_service::{Action, Resource};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath, ApiQuery};

pub fn create_opportunity_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_opportunity))
        .route("/", get(list_opportunities))
        .route("/:id", get(get_opportunity))
        .route("/:id", put(update_opportunity))
        .route("/:id", delete(delete_opportunity))
}

async fn create_opportunity(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateOpportunityRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    user.require(Resource::Opportunities, Action::Create)?;
    let controller = OpportunityController::new(state.pool.clone());
    let response = controller.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_opportunities(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiQuery(query): ApiQuery<OpportunityQuery>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    user.require(Resource::Opportunities, Action::View)?;
    let controller = OpportunityController::new(state.pool.clone());
    let data = controller.list(&user, query).await?;
    Ok(Json(ApiResponse::success(data)))
}

async fn get_opportunity(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Opportunity>>, AppError> {
    user.require(Resource::Opportunities, Action::View)?;
    let controller = OpportunityController::new(state.pool.clone());
    let opportunity = controller.get_by_id(&user, id).await?;
    Ok(Json(ApiResponse::success(opportunity)))
}

async fn update_opportunity(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateOpportunityRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    user.require(Resource::Opportunities, Action::Edit)?;
    let controller = OpportunityController::new(state.pool.clone());
    let response = controller.update(&user, id, request).await?;
    Ok(Json(response))
}

async fn delete_opportunity(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require(Resource::Opportunities, Action::Delete)?;
    let controller = OpportunityController::new(state.pool.clone());
    controller.delete(&user, id).await?;
    Ok(Json(ApiResponse::message("Oportunidad eliminada exitosamente")))
}
