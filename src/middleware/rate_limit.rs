//! Middleware de Rate Limiting
//!
//! Ventana fija por IP en memoria, usada en el login para frenar
//! ataques de fuerza bruta.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::warn;

use crate::config::EnvironmentConfig;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Estructura para almacenar información de rate limiting por IP
#[derive(Debug, Clone)]
struct RateLimitInfo {
    requests: u32,
    window_start: Instant,
}

/// Estado global del rate limiting
#[derive(Clone)]
pub struct RateLimitState {
    requests: Arc<RwLock<HashMap<String, RateLimitInfo>>>,
    max_requests: u32,
    window_duration: Duration,
}

impl RateLimitState {
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self::with_limits(config.rate_limit_requests, Duration::from_secs(config.rate_limit_window))
    }

    pub fn with_limits(max_requests: u32, window_duration: Duration) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window_duration,
        }
    }

    /// Verificar si una IP ha excedido el límite
    pub async fn check_rate_limit(&self, ip: &str) -> Result<(), AppError> {
        let mut requests = self.requests.write().await;
        let now = Instant::now();

        // Limpiar entradas expiradas
        requests.retain(|_, info| now.duration_since(info.window_start) < self.window_duration);

        let info = requests.entry(ip.to_string()).or_insert(RateLimitInfo {
            requests: 0,
            window_start: now,
        });

        if info.requests >= self.max_requests {
            return Err(AppError::RateLimitExceeded);
        }

        info.requests += 1;
        Ok(())
    }
}

/// IP del cliente: `x-forwarded-for` si viene de un proxy, si no la del socket
fn client_ip(request: &Request) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware de rate limiting
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(&request);

    if let Err(e) = state.rate_limit.check_rate_limit(&ip).await {
        warn!("🚦 Límite de solicitudes excedido para {}", ip);
        return Err(e);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_is_enforced_per_ip() {
        let state = RateLimitState::with_limits(2, Duration::from_secs(60));

        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(matches!(
            state.check_rate_limit("10.0.0.1").await,
            Err(AppError::RateLimitExceeded)
        ));
        assert!(state.check_rate_limit("10.0.0.2").await.is_ok());
    }

    #[test]
    fn test_client_ip_prefers_forwarded_header_then_socket() {
        let socket: SocketAddr = "192.0.2.10:51234".parse().unwrap();

        let mut request = Request::builder().body(axum::body::Body::empty()).unwrap();
        request.extensions_mut().insert(ConnectInfo(socket));
        assert_eq!(client_ip(&request), "192.0.2.10");

        let mut proxied = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(axum::body::Body::empty())
            .unwrap();
        proxied.extensions_mut().insert(ConnectInfo(socket));
        assert_eq!(client_ip(&proxied), "203.0.113.7");

        let bare = Request::builder().body(axum::body::Body::empty()).unwrap();
        assert_eq!(client_ip(&bare), "unknown");
    }

    #[tokio::test]
    async fn test_window_expiration_resets_counter() {
        let state = RateLimitState::with_limits(1, Duration::from_millis(20));

        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(state.check_rate_limit("10.0.0.1").await.is_err());
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
    }
}
