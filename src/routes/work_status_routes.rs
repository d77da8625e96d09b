use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::work_status_controller::WorkStatusController;
use crate::dto::common_dto::ApiResponse;
use crate::models::work_status::WorkStatus;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Catálogo de estados del flujo de trabajo, visible para cualquier usuario autenticado
pub fn create_work_status_router() -> Router<AppState> {
    Router::new().route("/", get(list_work_statuses))
}

async fn list_work_statuses(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<WorkStatus>>>, AppError> {
    let statuses = WorkStatusController::new(state).list().await?;
    Ok(Json(ApiResponse::success(statuses)))
}
