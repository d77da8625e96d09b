//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use anyhow::{Context, Result};
use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub rate_limit_requests: u32,
    pub rate_limit_window: u64,
    pub redis_url: Option<String>,
    pub cache_ttl: u64,
    pub run_migrations: bool,
    // Administrador inicial (solo si la base no tiene usuarios)
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

/// Leer variable opcional con valor por defecto
fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Leer y parsear variable numérica con valor por defecto
fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} debe ser un número válido", key)),
        Err(_) => Ok(default),
    }
}

impl EnvironmentConfig {
    /// Cargar configuración desde variables de entorno
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        Ok(Self {
            environment: var_or("ENVIRONMENT", "development"),
            port: parse_var("PORT", 3000)?,
            host: var_or("HOST", "0.0.0.0"),
            jwt_secret,
            jwt_expiration: parse_var("JWT_EXPIRATION", 86_400)?,
            cors_origins: var_or("CORS_ORIGINS", "")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            rate_limit_requests: parse_var("RATE_LIMIT_REQUESTS", 10)?,
            rate_limit_window: parse_var("RATE_LIMIT_WINDOW", 60)?,
            redis_url: env::var("REDIS_URL").ok().filter(|s| !s.is_empty()),
            cache_ttl: parse_var("CACHE_TTL", 300)?,
            run_migrations: parse_var("RUN_MIGRATIONS", false)?,
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        })
    }

    /// Configuración fija para tests
    pub fn for_tests() -> Self {
        Self {
            environment: "test".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            jwt_secret: "secreto-de-pruebas".to_string(),
            jwt_expiration: 3600,
            cors_origins: Vec::new(),
            rate_limit_requests: 100,
            rate_limit_window: 60,
            redis_url: None,
            cache_ttl: 60,
            run_migrations: false,
            admin_email: None,
            admin_password: None,
        }
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_url() {
        let mut config = EnvironmentConfig::for_tests();
        config.port = 8080;
        assert_eq!(config.server_url(), "127.0.0.1:8080");
        assert!(!config.is_production());
        assert!(!config.is_development());
    }
}
