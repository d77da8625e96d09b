//! Rutas HTTP
//!
//! Todas las rutas cuelgan de `/api`. Solo `/health` y `/api/auth/login`
//! son públicas; el resto pasa por el middleware de autenticación.

pub mod appointment_routes;
pub mod auth_routes;
pub mod branch_routes;
pub mod client_routes;
pub mod mechanic_routes;
pub mod opportunity_routes;
pub mod reception_routes;
pub mod role_routes;
pub mod service_routes;
pub mod user_routes;
pub mod vehicle_routes;
pub mod work_status_routes;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing::warn;

use crate::database::connection::health_check;
use crate::middleware::{auth_middleware, cors_middleware, rate_limit_middleware};
use crate::state::AppState;

/// Construir la aplicación completa con estado, CORS y trazas
pub fn create_app(state: AppState) -> Router {
    let public = auth_routes::create_auth_router().route_layer(middleware::from_fn_with_state(
        state.clone(),
        rate_limit_middleware,
    ));

    let protected = Router::new()
        .route("/auth/me", get(auth_routes::me))
        .nest("/branches", branch_routes::create_branch_router())
        .nest("/users", user_routes::create_user_router())
        .nest("/roles", role_routes::create_role_router())
        .nest("/clients", client_routes::create_client_router())
        .nest("/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/mechanics", mechanic_routes::create_mechanic_router())
        .nest("/work-statuses", work_status_routes::create_work_status_router())
        .nest("/services", service_routes::create_service_router())
        .nest("/appointments", appointment_routes::create_appointment_router())
        .nest("/opportunities", opportunity_routes::create_opportunity_router())
        .nest("/reception", reception_routes::create_reception_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health))
        .route("/api/health", get(health))
        .nest("/api", public.merge(protected))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_middleware(&state.config)),
        )
        .with_state(state)
}

/// Health check: estado de la base de datos y del cache
async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let database_ok = match health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            warn!("⚠️ Health check de base de datos falló: {}", e);
            false
        }
    };

    let cache = match &state.cache {
        Some(client) if client.is_connected().await => "connected",
        Some(_) => "disconnected",
        None => "disabled",
    };

    let status = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "success": database_ok,
            "status": if database_ok { "ok" } else { "degraded" },
            "database": if database_ok { "connected" } else { "disconnected" },
            "cache": cache,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}
