use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::Value;

use crate::controllers::reception_controller::ReceptionController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::reception_dto::ReceiveVehicleRequest;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::service::ServiceSummary;
use crate::services::authorization_service::{Action, Resource};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ApiJson;

pub fn create_reception_router() -> Router<AppState> {
    Router::new()
        .route("/receive-vehicle", post(receive_vehicle))
        .route("/today", get(received_today))
}

/// Recepción completa: cliente, vehículo, servicio, checklist y firma
async fn receive_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<ReceiveVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    user.require(Resource::Reception, Action::Create)?;
    let response = ReceptionController::new(state)
        .receive_vehicle(&user, request)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn received_today(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<ServiceSummary>>>, AppError> {
    user.require(Resource::Reception, Action::View)?;
    let services = ReceptionController::new(state).received_today(&user).await?;
    Ok(Json(ApiResponse::success(services)))
}
