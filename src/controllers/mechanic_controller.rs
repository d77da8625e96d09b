use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::ApiResponse;
use crate::dto::mechanic_dto::{CommissionQuery, CreateMechanicRequest, MechanicQuery, UpdateMechanicRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::mechanic::{CommissionSummary, Mechanic};
use crate::repositories::mechanic_repository::MechanicRepository;
use crate::repositories::work_status_repository::WorkStatusRepository;
use crate::utils::errors::AppError;

pub struct MechanicController {
    repository: MechanicRepository,
    statuses: WorkStatusRepository,
}

impl MechanicController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: MechanicRepository::new(pool.clone()),
            statuses: WorkStatusRepository::new(pool),
        }
    }

    pub async fn list(&self, user: &AuthenticatedUser, query: MechanicQuery) -> Result<Vec<Mechanic>, AppError> {
        let branch_id = user.branch_scope().or(query.branch_id);
        self.repository
            .list(branch_id, query.include_inactive.unwrap_or(false))
            .await
    }

    pub async fn get_by_id(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Mechanic, AppError> {
        let mechanic = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Mecánico no encontrado".to_string()))?;

        user.ensure_branch_access(mechanic.branch_id)?;
        Ok(mechanic)
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateMechanicRequest,
    ) -> Result<ApiResponse<Value>, AppError> {
        request.validate()?;

        let branch_id = user.target_branch(request.branch_id);
        let mechanic = self.repository.create(branch_id, request).await?;

        info!("🔧 Mecánico creado: {}", mechanic.name);
        Ok(ApiResponse::success_with_message(
            json!({ "mechanic": mechanic }),
            "Mecánico creado exitosamente",
        ))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateMechanicRequest,
    ) -> Result<ApiResponse<Value>, AppError> {
        request.validate()?;
        let current = self.get_by_id(user, id).await?;

        if current.is_active && request.is_active == Some(false) {
            self.ensure_no_open_services(id).await?;
        }

        let mechanic = self.repository.update(id, request).await?;
        Ok(ApiResponse::success_with_message(
            json!({ "mechanic": mechanic }),
            "Mecánico actualizado exitosamente",
        ))
    }

    /// Baja lógica; no se permite con servicios abiertos asignados
    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        let mechanic = self.get_by_id(user, id).await?;
        self.ensure_no_open_services(id).await?;

        self.repository.deactivate(id).await?;
        info!("🗑️ Mecánico desactivado: {}", mechanic.name);
        Ok(())
    }

    async fn ensure_no_open_services(&self, id: Uuid) -> Result<(), AppError> {
        let closed = self.statuses.closed_ids().await?;
        let open = self.repository.count_open_services(id, &closed).await?;
        if open > 0 {
            return Err(AppError::BadRequest(format!(
                "No se puede desactivar el mecánico: tiene {} servicio(s) abierto(s)",
                open
            )));
        }
        Ok(())
    }

    /// Resumen de comisiones de servicios terminados en el periodo
    pub async fn commissions(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        query: CommissionQuery,
    ) -> Result<CommissionSummary, AppError> {
        if let (Some(from), Some(to)) = (query.from, query.to) {
            if from > to {
                return Err(AppError::BadRequest(
                    "La fecha inicial no puede ser posterior a la final".to_string(),
                ));
            }
        }

        let mechanic = self.get_by_id(user, id).await?;
        let completed = self.statuses.completed_ids().await?;
        let entries = self
            .repository
            .commissions(id, &completed, query.from, query.to)
            .await?;

        Ok(CommissionSummary::from_entries(&mechanic, entries))
    }
}
