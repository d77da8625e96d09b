use crate::models::work_status::WorkStatus;
use crate::services::lookup_cache;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct WorkStatusController {
    state: AppState,
}

impl WorkStatusController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn list(&self) -> Result<Vec<WorkStatus>, AppError> {
        lookup_cache::work_statuses(&self.state).await
    }
}
