use bcrypt::{hash, DEFAULT_COST};
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{ApiResponse, Pagination};
use crate::dto::user_dto::{CreateUserRequest, UpdateUserRequest, UserQuery};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::User;
use crate::repositories::branch_repository::BranchRepository;
use crate::repositories::role_repository::RoleRepository;
use crate::repositories::user_repository::{UserChanges, UserRepository};
use crate::utils::errors::{conflict_error, AppError};

pub struct UserController {
    repository: UserRepository,
    branches: BranchRepository,
    roles: RoleRepository,
}

impl UserController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool.clone()),
            branches: BranchRepository::new(pool.clone()),
            roles: RoleRepository::new(pool),
        }
    }

    pub async fn list(&self, user: &AuthenticatedUser, query: UserQuery) -> Result<Value, AppError> {
        let pagination = Pagination::new(query.page, query.limit);
        let branch_id = user.branch_scope().or(query.branch_id);

        let (users, total) = self
            .repository
            .list(branch_id, query.search.as_deref(), pagination)
            .await?;

        Ok(json!({ "users": users, "pagination": pagination.meta(total) }))
    }

    pub async fn get_by_id(&self, user: &AuthenticatedUser, id: Uuid) -> Result<User, AppError> {
        let found = self.find(id).await?;
        user.ensure_branch_access(found.branch_id)?;
        Ok(found)
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateUserRequest,
    ) -> Result<ApiResponse<Value>, AppError> {
        request.validate()?;
        user.ensure_branch_access(request.branch_id)?;
        self.check_references(user, Some(request.branch_id), Some(request.role_id)).await?;

        if self.repository.email_exists(&request.email, None).await? {
            return Err(conflict_error("Usuario", "email", &request.email));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)?;
        let created = self
            .repository
            .create(request.branch_id, request.role_id, &request.name, &request.email, &password_hash)
            .await?;

        info!("👤 Usuario creado: {}", created.email);
        Ok(ApiResponse::success_with_message(json!({ "user": created }), "Usuario creado exitosamente"))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<ApiResponse<Value>, AppError> {
        request.validate()?;
        let current = self.find(id).await?;
        user.ensure_branch_access(current.branch_id)?;
        if let Some(branch_id) = request.branch_id {
            user.ensure_branch_access(branch_id)?;
        }
        self.check_references(user, request.branch_id, request.role_id).await?;

        if let Some(email) = &request.email {
            if self.repository.email_exists(email, Some(id)).await? {
                return Err(conflict_error("Usuario", "email", email));
            }
        }

        let password_hash = match &request.password {
            Some(password) => Some(hash(password, DEFAULT_COST)?),
            None => None,
        };

        let updated = self
            .repository
            .update(
                id,
                UserChanges {
                    name: request.name,
                    email: request.email,
                    password_hash,
                    branch_id: request.branch_id,
                    role_id: request.role_id,
                    is_active: request.is_active,
                },
            )
            .await?;

        Ok(ApiResponse::success_with_message(json!({ "user": updated }), "Usuario actualizado exitosamente"))
    }

    /// Baja lógica; un usuario no puede desactivarse a sí mismo
    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        if user.user_id == id {
            return Err(AppError::BadRequest("No puedes eliminar tu propio usuario".to_string()));
        }

        let current = self.find(id).await?;
        user.ensure_branch_access(current.branch_id)?;

        self.repository.deactivate(id).await?;
        info!("🗑️ Usuario desactivado: {}", current.email);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<User, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))
    }

    /// Sucursal activa y rol existente; solo un administrador asigna el rol de administrador
    async fn check_references(
        &self,
        user: &AuthenticatedUser,
        branch_id: Option<Uuid>,
        role_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        if let Some(branch_id) = branch_id {
            match self.branches.find_by_id(branch_id).await? {
                Some(branch) if branch.is_active => {}
                _ => return Err(AppError::BadRequest("Sucursal inválida o inactiva".to_string())),
            }
        }

        if let Some(role_id) = role_id {
            let role = self
                .roles
                .find_by_id(role_id)
                .await?
                .ok_or_else(|| AppError::BadRequest("Rol inválido".to_string()))?;

            if role.is_admin() {
                user.require_admin()?;
            }
        }

        Ok(())
    }
}
