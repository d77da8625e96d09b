use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde_json::Value;
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleQuery};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::vehicle::{Vehicle, VehicleWithOwner};
use crate::services::authorization_service::{Action, Resource};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath, ApiQuery};

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vehicle))
        .route("/", get(list_vehicles))
        .route("/plate/:plate", get(get_vehicle_by_plate))
        .route("/:id", get(get_vehicle))
        .route("/:id", put(update_vehicle))
        .route("/:id", delete(delete_vehicle))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    user.require(Resource::Vehicles, Action::Create)?;
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    user.require(Resource::Vehicles, Action::View)?;
    let controller = VehicleController::new(state.pool.clone());
    let vehicle = controller.get_by_id(&user, id).await?;
    Ok(Json(ApiResponse::success(vehicle)))
}

/// Búsqueda por placa, usada en recepción para reconocer vehículos conocidos
async fn get_vehicle_by_plate(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(plate): ApiPath<String>,
) -> Result<Json<ApiResponse<VehicleWithOwner>>, AppError> {
    user.require(Resource::Vehicles, Action::View)?;
    let controller = VehicleController::new(state.pool.clone());
    let vehicle = controller.get_by_plate(&user, &plate).await?;
    Ok(Json(ApiResponse::success(vehicle)))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiQuery(query): ApiQuery<VehicleQuery>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    user.require(Resource::Vehicles, Action::View)?;
    let controller = VehicleController::new(state.pool.clone());
    let data = controller.list(&user, query).await?;
    Ok(Json(ApiResponse::success(data)))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    user.require(Resource::Vehicles, Action::Edit)?;
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.update(&user, id, request).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.require(Resource::Vehicles, Action::Delete)?;
    let controller = VehicleController::new(state.pool.clone());
    controller.delete(&user, id).await?;
    Ok(Json(ApiResponse::message("Vehículo eliminado exitosamente")))
}
