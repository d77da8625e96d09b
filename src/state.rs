//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;

use crate::cache::redis_client::RedisClient;
use crate::config::environment::EnvironmentConfig;
use crate::middleware::rate_limit::RateLimitState;
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub jwt: JwtConfig,
    /// `None` cuando Redis no está configurado o no responde
    pub cache: Option<RedisClient>,
    pub rate_limit: RateLimitState,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, cache: Option<RedisClient>) -> Self {
        Self {
            pool,
            jwt: JwtConfig::from(&config),
            rate_limit: RateLimitState::new(&config),
            config,
            cache,
        }
    }
}
