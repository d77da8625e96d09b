use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde_json::Value;
use uuid::Uuid;

use crate::controllers::client_controller::ClientController;
use crate::dto::client_dto::{ClientQuery, CreateClientRequest, UpdateClientRequest};
use crate::dto::common_dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::client::Client;
use crate::services::authorization_service::{Action, Resource};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath, ApiQuery};

pub fn create_client_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_client))
        .route("/", get(list_clients))
        .route("/:id", get(get_client))
        .route("/:id", put(update_client))
        .route("/:id", delete(delete_client))
}

async fn create_client(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateClientRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    user.require(Resource::Clients, Action::Create)?;
    let controller = ClientController::new(state.pool.clone());
    let response = controller.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_clients(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiQuery(query): ApiQuery<ClientQuery>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    user.require(Resource::Clients, Action::View)?;
    let controller = ClientController::new(state.pool.clone());
    let data = controller.list(&user, query).await?;
    Ok(Json(ApiResponse::success(data)))
}

async fn get_client(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Client>>, AppError> {
    user.require(Resource::Clients, Action::View)?;
    let controller = ClientController::new(state.pool.clone());
    let client = controller.get_by_id(&user, id).await?;
    Ok(Json(ApiResponse::success(client)))
}

async fn update_client(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateClientRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    user.require(Resource::Clients, Action::Edit)?;
    let controller = ClientController::new(state.pool.clone());
    let response = controller.update(&user, id, request).await?;
    Ok(Json(response))
}

async fn delete_client(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require(Resource::Clients, Action::Delete)?;
    let controller = ClientController::new(state.pool.clone());
    controller.delete(&user, id).await?;
    Ok(Json(ApiResponse::message("Cliente desactivado exitosamente")))
}
