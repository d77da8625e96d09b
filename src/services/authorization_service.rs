//! Servicio de autorización
//!
//! Verifica permisos por recurso y acción contra el mapa de permisos del
//! rol, y resuelve el alcance de sucursal de cada usuario.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::role::PermissionMap;
use crate::utils::errors::AppError;

/// Comodín: cualquier recurso o acción
pub const WILDCARD: &str = "*";

/// Recursos protegidos de la API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Branches,
    Users,
    Roles,
    Clients,
    Vehicles,
    Mechanics,
    Services,
    Appointments,
    Opportunities,
    Reception,
}

impl Resource {
    pub const ALL: [Resource; 10] = [
        Resource::Branches,
        Resource::Users,
        Resource::Roles,
        Resource::Clients,
        Resource::Vehicles,
        Resource::Mechanics,
        Resource::Services,
        Resource::Appointments,
        Resource::Opportunities,
        Resource::Reception,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Branches => "branches",
            Resource::Users => "users",
            Resource::Roles => "roles",
            Resource::Clients => "clients",
            Resource::Vehicles => "vehicles",
            Resource::Mechanics => "mechanics",
            Resource::Services => "services",
            Resource::Appointments => "appointments",
            Resource::Opportunities => "opportunities",
            Resource::Reception => "reception",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::View, Action::Create, Action::Edit, Action::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

/// Verifica si el mapa de permisos permite `action` sobre `resource`
pub fn allows(permissions: &PermissionMap, resource: Resource, action: Action) -> bool {
    [resource.as_str(), WILDCARD]
        .iter()
        .filter_map(|key| permissions.get(*key))
        .flatten()
        .any(|allowed| allowed == action.as_str() || allowed == WILDCARD)
}

/// Validar que un mapa de permisos solo use recursos y acciones conocidos
pub fn validate_permission_map(permissions: &PermissionMap) -> Result<(), AppError> {
    for (resource, actions) in permissions {
        let known_resource =
            resource == WILDCARD || Resource::ALL.iter().any(|r| r.as_str() == resource);
        if !known_resource {
            return Err(AppError::BadRequest(format!("Recurso desconocido: {}", resource)));
        }

        if let Some(action) = actions
            .iter()
            .find(|a| a.as_str() != WILDCARD && !Action::ALL.iter().any(|k| k.as_str() == a.as_str()))
        {
            return Err(AppError::BadRequest(format!(
                "Acción desconocida '{}' para el recurso {}",
                action, resource
            )));
        }
    }
    Ok(())
}

impl AuthenticatedUser {
    /// Exigir un permiso; 403 si el rol no lo concede
    pub fn require(&self, resource: Resource, action: Action) -> Result<(), AppError> {
        if self.is_admin || allows(&self.permissions, resource, action) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "No tienes permiso para {} en {}",
                action.as_str(),
                resource.as_str()
            )))
        }
    }

    /// Exigir rol de administrador
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("Se requieren permisos de administrador".to_string()))
        }
    }

    /// Sucursal a la que se limitan las consultas; `None` para administradores
    pub fn branch_scope(&self) -> Option<Uuid> {
        if self.is_admin {
            None
        } else {
            Some(self.branch_id)
        }
    }

    /// Sucursal en la que se crea un registro: un administrador puede elegirla
    pub fn target_branch(&self, requested: Option<Uuid>) -> Uuid {
        match requested {
            Some(branch_id) if self.is_admin => branch_id,
            _ => self.branch_id,
        }
    }

    /// Verificar que un registro pertenece a la sucursal visible
    pub fn ensure_branch_access(&self, branch_id: Uuid) -> Result<(), AppError> {
        match self.branch_scope() {
            Some(own) if own != branch_id => Err(AppError::Forbidden(
                "El registro pertenece a otra sucursal".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &[&str])]) -> PermissionMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|a| a.to_string()).collect()))
            .collect()
    }

    fn user(is_admin: bool, permissions: PermissionMap) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            branch_id: Uuid::new_v4(),
            role_id: Uuid::new_v4(),
            role_name: if is_admin { "Administrador" } else { "Recepcionista" }.to_string(),
            is_admin,
            permissions,
        }
    }

    #[test]
    fn test_allows_exact_and_wildcards() {
        let perms = map(&[("clients", &["view", "create"]), ("services", &["*"])]);
        assert!(allows(&perms, Resource::Clients, Action::Create));
        assert!(!allows(&perms, Resource::Clients, Action::Delete));
        assert!(allows(&perms, Resource::Services, Action::Delete));
        assert!(!allows(&perms, Resource::Branches, Action::View));

        let all = map(&[("*", &["*"])]);
        assert!(allows(&all, Resource::Roles, Action::Edit));
    }

    #[test]
    fn test_validate_permission_map() {
        assert!(validate_permission_map(&map(&[("clients", &["view"]), ("*", &["*"])])).is_ok());
        assert!(validate_permission_map(&map(&[("invoices", &["view"])])).is_err());
        assert!(validate_permission_map(&map(&[("clients", &["approve"])])).is_err());
    }

    #[test]
    fn test_require_returns_forbidden() {
        let receptionist = user(false, map(&[("clients", &["view"])]));
        assert!(receptionist.require(Resource::Clients, Action::View).is_ok());
        assert!(matches!(
            receptionist.require(Resource::Clients, Action::Delete),
            Err(AppError::Forbidden(_))
        ));
        assert!(receptionist.require_admin().is_err());

        let admin = user(true, PermissionMap::new());
        assert!(admin.require(Resource::Branches, Action::Delete).is_ok());
    }

    #[test]
    fn test_branch_scoping() {
        let receptionist = user(false, PermissionMap::new());
        let other_branch = Uuid::new_v4();

        assert_eq!(receptionist.branch_scope(), Some(receptionist.branch_id));
        assert_eq!(receptionist.target_branch(Some(other_branch)), receptionist.branch_id);
        assert!(receptionist.ensure_branch_access(other_branch).is_err());
        assert!(receptionist.ensure_branch_access(receptionist.branch_id).is_ok());

        let admin = user(true, PermissionMap::new());
        assert_eq!(admin.branch_scope(), None);
        assert_eq!(admin.target_branch(Some(other_branch)), other_branch);
        assert!(admin.ensure_branch_access(other_branch).is_ok());
    }
}
