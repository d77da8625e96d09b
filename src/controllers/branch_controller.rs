use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::branch_dto::{BranchQuery, CreateBranchRequest, UpdateBranchRequest};
use crate::dto::common_dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::branch::Branch;
use crate::repositories::branch_repository::BranchRepository;
use crate::utils::errors::AppError;

pub struct BranchController {
    repository: BranchRepository,
}

impl BranchController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BranchRepository::new(pool),
        }
    }

    /// Un administrador ve todas las sucursales; el resto solo la propia
    pub async fn list(&self, user: &AuthenticatedUser, query: BranchQuery) -> Result<Vec<Branch>, AppError> {
        let branches = self.repository.list(query.include_inactive.unwrap_or(false)).await?;

        Ok(match user.branch_scope() {
            Some(own) => branches.into_iter().filter(|b| b.id == own).collect(),
            None => branches,
        })
    }

    pub async fn get_by_id(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Branch, AppError> {
        user.ensure_branch_access(id)?;

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Sucursal no encontrada".to_string()))
    }

    pub async fn create(&self, request: CreateBranchRequest) -> Result<ApiResponse<Value>, AppError> {
        request.validate()?;
        let branch = self.repository.create(request).await?;
        info!("🏢 Sucursal creada: {}", branch.name);

        Ok(ApiResponse::success_with_message(json!({ "branch": branch }), "Sucursal creada exitosamente"))
    }

    pub async fn update(&self, id: Uuid, request: UpdateBranchRequest) -> Result<ApiResponse<Value>, AppError> {
        request.validate()?;
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Sucursal no encontrada".to_string()))?;

        let branch = self.repository.update(id, request).await?;
        Ok(ApiResponse::success_with_message(json!({ "branch": branch }), "Sucursal actualizada exitosamente"))
    }

    /// Baja lógica; no se permite con usuarios activos asignados
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Sucursal no encontrada".to_string()))?;

        let users = self.repository.count_active_users(id).await?;
        if users > 0 {
            return Err(AppError::BadRequest(format!(
                "No se puede desactivar la sucursal: tiene {} usuario(s) activo(s)",
                users
            )));
        }

        self.repository.deactivate(id).await?;
        info!("🗑️ Sucursal desactivada: {}", id);
        Ok(())
    }
}
