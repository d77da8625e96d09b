//! Lecturas cacheadas de catálogos
//!
//! El catálogo de estados de trabajo y los roles se leen en casi todas las
//! requests. Con Redis disponible se guardan con TTL; sin Redis se consulta
//! siempre la base.

use tracing::warn;
use uuid::Uuid;

use crate::cache::CacheOperations;
use crate::models::role::Role;
use crate::models::work_status::WorkStatus;
use crate::repositories::role_repository::RoleRepository;
use crate::repositories::work_status_repository::WorkStatusRepository;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Catálogo de estados ordenado por `orderIndex`
pub async fn work_statuses(state: &AppState) -> Result<Vec<WorkStatus>, AppError> {
    if let Some(cache) = &state.cache {
        if let Ok(Some(statuses)) = cache.get::<Vec<WorkStatus>>(&cache.work_statuses_key()).await {
            return Ok(statuses);
        }
    }

    let statuses = WorkStatusRepository::new(state.pool.clone()).list().await?;

    if let Some(cache) = &state.cache {
        if let Err(e) = cache.set(&cache.work_statuses_key(), &statuses, cache.default_ttl()).await {
            warn!("⚠️ No se pudo cachear el catálogo de estados: {}", e);
        }
    }

    Ok(statuses)
}

/// Rol con su mapa de permisos
pub async fn role(state: &AppState, role_id: Uuid) -> Result<Option<Role>, AppError> {
    if let Some(cache) = &state.cache {
        if let Ok(Some(role)) = cache.get::<Role>(&cache.role_permissions_key(role_id)).await {
            return Ok(Some(role));
        }
    }

    let role = RoleRepository::new(state.pool.clone()).find_by_id(role_id).await?;

    if let (Some(cache), Some(role)) = (&state.cache, &role) {
        if let Err(e) = cache.set(&cache.role_permissions_key(role_id), role, cache.default_ttl()).await {
            warn!("⚠️ No se pudo cachear el rol {}: {}", role_id, e);
        }
    }

    Ok(role)
}

/// Descartar el rol cacheado tras modificarlo
pub async fn invalidate_role(state: &AppState, role_id: Uuid) {
    if let Some(cache) = &state.cache {
        if let Err(e) = cache.delete(&cache.role_permissions_key(role_id)).await {
            warn!("⚠️ No se pudo invalidar el rol {} en cache: {}", role_id, e);
        }
    }
}
