//! Configuración de cache
//!
//! Este módulo contiene la configuración para el sistema de cache.

use serde::{Deserialize, Serialize};

use crate::config::EnvironmentConfig;

/// Configuración del cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub redis_url: String,
    pub default_ttl: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_string(),
            default_ttl: 300, // 5 minutos
        }
    }
}

impl CacheConfig {
    /// Configuración de cache a partir del entorno; `None` si Redis no está configurado
    pub fn from_environment(config: &EnvironmentConfig) -> Option<Self> {
        config.redis_url.as_ref().map(|url| Self {
            redis_url: url.clone(),
            default_ttl: config.cache_ttl,
        })
    }
}
