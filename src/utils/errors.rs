//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP con el sobre `{ success, message }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Código de PostgreSQL para violación de unicidad
const PG_UNIQUE_VIOLATION: &str = "23505";
/// Código de PostgreSQL para violación de llave foránea
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if matches!(err, sqlx::Error::RowNotFound) {
            return AppError::NotFound("Registro no encontrado".to_string());
        }

        let (code, constraint) = match &err {
            sqlx::Error::Database(db_err) => (
                db_err.code().map(|c| c.into_owned()),
                db_err.constraint().map(str::to_string),
            ),
            _ => (None, None),
        };

        match code.as_deref() {
            Some(PG_UNIQUE_VIOLATION) => AppError::Conflict(format!(
                "Ya existe un registro con ese valor ({})",
                constraint.unwrap_or_else(|| "unique".to_string())
            )),
            Some(PG_FOREIGN_KEY_VIOLATION) => AppError::BadRequest(
                "El registro está referenciado por otros datos o referencia datos inexistentes"
                    .to_string(),
            ),
            _ => AppError::Database(err),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::Hash(err.to_string())
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl AppError {
    /// Status HTTP asociado al error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) | AppError::Hash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::Database(e) => {
                error!("❌ Error de base de datos: {}", e);
                ErrorResponse {
                    success: false,
                    message: "Ocurrió un error al acceder a la base de datos".to_string(),
                    code: "DB_ERROR",
                    details: None,
                }
            }

            AppError::Validation(e) => {
                warn!("⚠️ Error de validación: {}", e);
                ErrorResponse {
                    success: false,
                    message: validation_message(&e),
                    code: "VALIDATION_ERROR",
                    details: Some(json!(e)),
                }
            }

            AppError::Unauthorized(msg) => {
                warn!("🔒 Acceso no autorizado: {}", msg);
                ErrorResponse { success: false, message: msg, code: "UNAUTHORIZED", details: None }
            }

            AppError::Jwt(msg) => {
                warn!("🔒 Error JWT: {}", msg);
                ErrorResponse { success: false, message: msg, code: "UNAUTHORIZED", details: None }
            }

            AppError::Forbidden(msg) => {
                warn!("⛔ Acceso prohibido: {}", msg);
                ErrorResponse { success: false, message: msg, code: "FORBIDDEN", details: None }
            }

            AppError::NotFound(msg) => {
                ErrorResponse { success: false, message: msg, code: "NOT_FOUND", details: None }
            }

            AppError::Conflict(msg) => {
                ErrorResponse { success: false, message: msg, code: "CONFLICT", details: None }
            }

            AppError::BadRequest(msg) => {
                ErrorResponse { success: false, message: msg, code: "BAD_REQUEST", details: None }
            }

            AppError::Internal(msg) => {
                error!("❌ Error interno: {}", msg);
                ErrorResponse {
                    success: false,
                    message: "Ocurrió un error inesperado".to_string(),
                    code: "INTERNAL_ERROR",
                    details: None,
                }
            }

            AppError::Hash(msg) => {
                error!("❌ Error de hash: {}", msg);
                ErrorResponse {
                    success: false,
                    message: "Ocurrió un error procesando las credenciales".to_string(),
                    code: "HASH_ERROR",
                    details: None,
                }
            }

            AppError::RateLimitExceeded => ErrorResponse {
                success: false,
                message: "Demasiadas solicitudes. Intenta de nuevo más tarde".to_string(),
                code: "RATE_LIMIT_EXCEEDED",
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Primer mensaje legible de un conjunto de errores de validación
fn validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .find_map(|(field, errs)| {
            errs.first().map(|e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("Campo inválido: {}", field),
            })
        })
        .unwrap_or_else(|| "Los datos enviados son inválidos".to_string())
}

/// Función helper para crear errores de validación con mensaje
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    let mut error = validator::ValidationError::new("custom");
    error.message = Some(message.into());

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} con id '{}' no encontrado", resource, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} con {} '{}' ya existe", resource, field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            validation_error("phone", "Teléfono requerido").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(not_found_error("Cliente", "1").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            conflict_error("Vehículo", "placa", "ABC123").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::Jwt("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_validation_message_uses_custom_message() {
        if let AppError::Validation(errors) = validation_error("phone", "Teléfono requerido") {
            assert_eq!(validation_message(&errors), "Teléfono requerido");
        } else {
            panic!("se esperaba un error de validación");
        }
    }

    #[tokio::test]
    async fn test_error_envelope_body() {
        let response = AppError::Conflict("La placa ya está registrada".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "La placa ya está registrada");
        assert_eq!(body["code"], "CONFLICT");
    }
}
