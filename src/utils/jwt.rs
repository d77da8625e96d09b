//! Utilidades JWT
//!
//! Este módulo contiene funciones helper para emitir y verificar los tokens
//! de sesión de los usuarios del taller.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::environment::EnvironmentConfig, utils::errors::AppError};

/// Claims del JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtClaims {
    pub sub: String,       // user_id
    pub branch_id: String, // branch_id
    pub role_id: String,   // role_id
    pub exp: usize,        // expiration timestamp
    pub iat: usize,        // issued at timestamp
}

impl JwtClaims {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::Unauthorized("ID de usuario inválido".to_string()))
    }
}

/// Configuración de JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration: u64,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiration: config.jwt_expiration,
        }
    }
}

/// Token emitido junto con su fecha de expiración
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Generar JWT token para un usuario
pub fn generate_token(
    user_id: Uuid,
    branch_id: Uuid,
    role_id: Uuid,
    config: &JwtConfig,
) -> Result<IssuedToken, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.expiration as i64);

    let claims = JwtClaims {
        sub: user_id.to_string(),
        branch_id: branch_id.to_string(),
        role_id: role_id.to_string(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.secret.as_ref());

    let token = encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Error generando token: {}", e)))?;

    Ok(IssuedToken { token, expires_at })
}

/// Verificar y decodificar JWT token
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<JwtClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

    let token_data = decode::<JwtClaims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AppError::Jwt(format!("Token inválido: {}", e)))?;

    Ok(token_data.claims)
}

/// Extraer token del header Authorization
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Header Authorization debe comenzar con 'Bearer '".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AppError::Unauthorized("Token no puede estar vacío".to_string()));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "secreto-de-pruebas".to_string(),
            expiration: 3600,
        }
    }

    #[test]
    fn test_generate_and_verify_token() {
        let user_id = Uuid::new_v4();
        let branch_id = Uuid::new_v4();
        let role_id = Uuid::new_v4();

        let issued = generate_token(user_id, branch_id, role_id, &config()).unwrap();
        let claims = verify_token(&issued.token, &config()).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.branch_id, branch_id.to_string());
        assert!(issued.expires_at > chrono::Utc::now());
    }

    #[test]
    fn test_token_with_other_secret_is_rejected() {
        let issued = generate_token(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), &config()).unwrap();
        let other = JwtConfig {
            secret: "otro-secreto".to_string(),
            expiration: 3600,
        };
        assert!(matches!(verify_token(&issued.token, &other), Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(extract_token_from_header("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_token_from_header("Basic abc").is_err());
        assert!(extract_token_from_header("Bearer ").is_err());
    }
}
