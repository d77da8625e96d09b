use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde_json::Value;
use uuid::Uuid;

use crate::controllers::service_controller::ServiceController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::service_dto::{
    CreateServiceRequest, HistoryType, ServiceQuery, UpdateServiceRequest,
    UpdateServiceStatusRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::service::StatusLogEntry;
use crate::services::authorization_service::{Action, Resource};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath, ApiQuery};

pub fn create_service_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_service))
        .route("/", get(list_services))
        .route("/board", get(get_board))
        .route("/history/:type/:id", get(get_history))
        .route("/:id", get(get_service))
        .route("/:id", put(update_service))
        .route("/:id/status", put(update_service_status))
        .route("/:id/status-history", get(get_status_history))
}

async fn create_service(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    user.require(Resource::Services, Action::Create)?;
    let controller = ServiceController::new(state);
    let response = controller.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_services(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiQuery(query): ApiQuery<ServiceQuery>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    user.require(Resource::Services, Action::View)?;
    let data = ServiceController::new(state).list(&user, query).await?;
    Ok(Json(ApiResponse::success(data)))
}

/// Tablero agrupado por estado
async fn get_board(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    user.require(Resource::Services, Action::View)?;
    let data = ServiceController::new(state).board(&user).await?;
    Ok(Json(ApiResponse::success(data)))
}

/// Historial de servicios de un cliente o vehículo
async fn get_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath((history_type, id)): ApiPath<(HistoryType, Uuid)>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    user.require(Resource::Services, Action::View)?;
    let data = ServiceController::new(state).history(&user, history_type, id).await?;
    Ok(Json(ApiResponse::success(data)))
}

async fn get_service(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    user.require(Resource::Services, Action::View)?;
    let data = ServiceController::new(state).get_by_id(&user, id).await?;
    Ok(Json(ApiResponse::success(data)))
}

async fn update_service(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateServiceRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    user.require(Resource::Services, Action::Edit)?;
    let response = ServiceController::new(state).update(&user, id, request).await?;
    Ok(Json(response))
}

async fn update_service_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateServiceStatusRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    user.require(Resource::Services, Action::Edit)?;
    let response = ServiceController::new(state)
        .update_status(&user, id, request)
        .await?;
    Ok(Json(response))
}

async fn get_status_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Vec<StatusLogEntry>>>, AppError> {
    user.require(Resource::Services, Action::View)?;
    let entries = ServiceController::new(state).status_history(&user, id).await?;
    Ok(Json(ApiResponse::success(entries)))
}
