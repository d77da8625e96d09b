//! Cache
//!
//! Este módulo contiene el cache opcional en Redis para datos de consulta
//! frecuente (catálogo de estados, permisos de roles).

pub mod cache_config;
pub mod redis_client;

pub use cache_config::CacheConfig;
pub use redis_client::RedisClient;

use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};

/// Operaciones de cache
#[async_trait::async_trait]
pub trait CacheOperations {
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>>;
    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T, ttl: u64) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}
