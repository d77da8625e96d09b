use bcrypt::{hash, verify, DEFAULT_COST};
use tracing::{info, warn};
use validator::Validate;

use crate::dto::auth_dto::{CurrentUser, LoginRequest, LoginResponse};
use crate::dto::common_dto::ApiResponse;
use crate::middleware::auth::{load_authenticated_user, AuthenticatedUser};
use crate::models::role::ADMIN_ROLE_NAME;
use crate::repositories::branch_repository::BranchRepository;
use crate::repositories::role_repository::RoleRepository;
use crate::repositories::user_repository::UserRepository;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::generate_token;

/// Nombre de la sucursal creada en el primer arranque
const DEFAULT_BRANCH_NAME: &str = "Sucursal Principal";

pub struct AuthController {
    state: AppState,
    users: UserRepository,
}

impl AuthController {
    pub fn new(state: AppState) -> Self {
        Self {
            users: UserRepository::new(state.pool.clone()),
            state,
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<ApiResponse<LoginResponse>, AppError> {
        request.validate()?;

        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Credenciales inválidas".to_string()))?;

        if !verify(&request.password, &user.password_hash)? {
            warn!("🔒 Contraseña incorrecta para {}", user.email);
            return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
        }

        if !user.is_active {
            return Err(AppError::Unauthorized("Usuario inactivo".to_string()));
        }

        let issued = generate_token(user.id, user.branch_id, user.role_id, &self.state.jwt)?;
        self.users.touch_last_login(user.id).await?;

        let authenticated = load_authenticated_user(&self.state, user.id).await?;
        let current_user = self.current_user(&authenticated).await?;

        info!("✅ Login exitoso: {}", user.email);

        Ok(ApiResponse::success_with_message(
            LoginResponse {
                token: issued.token,
                expires_at: issued.expires_at,
                user: current_user,
            },
            "Login exitoso",
        ))
    }

    /// Perfil del usuario autenticado con su rol, permisos y sucursal
    pub async fn current_user(&self, authenticated: &AuthenticatedUser) -> Result<CurrentUser, AppError> {
        let user = self
            .users
            .find_by_id(authenticated.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

        let branch_name = BranchRepository::new(self.state.pool.clone())
            .find_by_id(user.branch_id)
            .await?
            .map(|branch| branch.name)
            .unwrap_or_default();

        Ok(CurrentUser {
            id: user.id,
            name: user.name,
            email: user.email,
            branch_id: user.branch_id,
            branch_name,
            role_id: authenticated.role_id,
            role_name: authenticated.role_name.clone(),
            is_admin: authenticated.is_admin,
            permissions: authenticated.permissions.clone(),
        })
    }

    /// Crear el administrador inicial cuando la base no tiene usuarios
    pub async fn bootstrap_admin(&self) -> Result<(), AppError> {
        let (Some(email), Some(password)) = (
            self.state.config.admin_email.clone(),
            self.state.config.admin_password.clone(),
        ) else {
            return Ok(());
        };

        if self.users.count().await? > 0 {
            return Ok(());
        }

        let role = RoleRepository::new(self.state.pool.clone())
            .find_by_name(ADMIN_ROLE_NAME)
            .await?
            .ok_or_else(|| AppError::Internal("No existe el rol de administrador".to_string()))?;
        let branch = BranchRepository::new(self.state.pool.clone())
            .first_or_create(DEFAULT_BRANCH_NAME)
            .await?;

        let password_hash = hash(&password, DEFAULT_COST)?;
        self.users
            .create(branch.id, role.id, "Administrador", &email, &password_hash)
            .await?;

        info!("👤 Administrador inicial creado: {}", email);
        Ok(())
    }
}
