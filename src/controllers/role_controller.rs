use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::ApiResponse;
use crate::dto::role_dto::{CreateRoleRequest, UpdateRoleRequest};
use crate::models::role::Role;
use crate::repositories::role_repository::RoleRepository;
use crate::services::authorization_service::validate_permission_map;
use crate::services::lookup_cache;
use crate::state::AppState;
use crate::utils::errors::{conflict_error, AppError};

pub struct RoleController {
    state: AppState,
    repository: RoleRepository,
}

impl RoleController {
    pub fn new(state: AppState) -> Self {
        Self {
            repository: RoleRepository::new(state.pool.clone()),
            state,
        }
    }

    pub async fn list(&self) -> Result<Vec<Role>, AppError> {
        self.repository.list().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Role, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Rol no encontrado".to_string()))
    }

    pub async fn create(&self, request: CreateRoleRequest) -> Result<ApiResponse<Value>, AppError> {
        request.validate()?;
        validate_permission_map(&request.permissions)?;

        let name = request.name.trim();
        if self.repository.find_by_name(name).await?.is_some() {
            return Err(conflict_error("Rol", "nombre", name));
        }

        let role = self
            .repository
            .create(name, request.description, request.permissions)
            .await?;

        info!("🛡️ Rol creado: {}", role.name);
        Ok(ApiResponse::success_with_message(json!({ "role": role }), "Rol creado exitosamente"))
    }

    pub async fn update(&self, id: Uuid, request: UpdateRoleRequest) -> Result<ApiResponse<Value>, AppError> {
        request.validate()?;
        if let Some(permissions) = &request.permissions {
            validate_permission_map(permissions)?;
        }

        let current = self.get_by_id(id).await?;
        if current.is_admin() && request.name.as_deref().is_some_and(|n| n.trim() != current.name) {
            return Err(AppError::BadRequest(
                "El rol de administrador no se puede renombrar".to_string(),
            ));
        }

        let role = self
            .repository
            .update(
                id,
                request.name.map(|n| n.trim().to_string()),
                request.description,
                request.permissions,
            )
            .await?;

        lookup_cache::invalidate_role(&self.state, id).await;
        info!("🛡️ Rol actualizado: {}", role.name);

        Ok(ApiResponse::success_with_message(json!({ "role": role }), "Rol actualizado exitosamente"))
    }
}
