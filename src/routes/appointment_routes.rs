use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde_json::Value;
use uuid::Uuid;

use crate::controllers::appointment_controller::AppointmentController;
use crate::dto::appointment_dto::{
    AppointmentQuery, ConvertAppointmentRequest, CreateAppointmentRequest,
    UpdateAppointmentRequest,
};
use crate::dto::common_dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::appointment::Appointment;
use crate::services::authorization_service::{Action, Resource};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath, ApiQuery};

pub fn create_appointment_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_appointment))
        .route("/", get(list_appointments))
        .route("/:id", get(get_appointment))
        .route("/:id", put(update_appointment))
        .route("/:id", delete(cancel_appointment))
        .route("/:id/service", post(convert_to_service))
}

async fn create_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    user.require(Resource::Appointments, Action::Create)?;
    let response = AppointmentController::new(state).create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_appointments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiQuery(query): ApiQuery<AppointmentQuery>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    user.require(Resource::Appointments, Action::View)?;
    let data = AppointmentController::new(state).list(&user, query).await?;
    Ok(Json(ApiResponse::success(data)))
}

async fn get_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Appointment>>, AppError> {
    user.require(Resource::Appointments, Action::View)?;
    let appointment = AppointmentController::new(state).get_by_id(&user, id).await?;
    Ok(Json(ApiResponse::success(appointment)))
}

async fn update_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateAppointmentRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    user.require(Resource::Appointments, Action::Edit)?;
    let response = AppointmentController::new(state)
        .update(&user, id, request)
        .await?;
    Ok(Json(response))
}

/// Eliminar una cita la marca como cancelada
async fn cancel_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Appointment>>, AppError> {
    user.require(Resource::Appointments, Action::Delete)?;
    let appointment = AppointmentController::new(state).cancel(&user, id).await?;
    Ok(Json(ApiResponse::success_with_message(
        appointment,
        "Cita cancelada exitosamente",
    )))
}

async fn convert_to_service(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    request: Option<ApiJson<ConvertAppointmentRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    user.require(Resource::Appointments, Action::Edit)?;
    user.require(Resource::Services, Action::Create)?;
    let request = request.map(|ApiJson(body)| body).unwrap_or_default();
    let response = AppointmentController::new(state)
        .convert_to_service(&user, id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}
