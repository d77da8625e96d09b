use chrono::Utc;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::models::role::{PermissionMap, Role};
use crate::utils::errors::AppError;

pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(roles)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(role)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(role)
    }

    pub async fn create(
        &self,
        name: &str,
        description: Option<String>,
        permissions: PermissionMap,
    ) -> Result<Role, AppError> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (id, name, description, permissions, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(Json(permissions))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(role)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
        permissions: Option<PermissionMap>,
    ) -> Result<Role, AppError> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            UPDATE roles
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                permissions = COALESCE($4, permissions),
                updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(permissions.map(Json))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(role)
    }
}
