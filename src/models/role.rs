//! Modelo de Role
//!
//! Un rol agrupa permisos por recurso. El mapa de permisos se guarda como
//! JSONB: `{ "clients": ["view", "create"], "*": ["*"] }`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Recurso → acciones permitidas
pub type PermissionMap = BTreeMap<String, Vec<String>>;

/// Nombre del rol con acceso total
pub const ADMIN_ROLE_NAME: &str = "Administrador";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Json<PermissionMap>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        self.name == ADMIN_ROLE_NAME
    }
}
