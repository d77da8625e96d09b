use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::branch_dto::{CreateBranchRequest, UpdateBranchRequest};
use crate::models::branch::Branch;
use crate::utils::errors::AppError;

pub struct BranchRepository {
    pool: PgPool,
}

impl BranchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, include_inactive: bool) -> Result<Vec<Branch>, AppError> {
        let branches = sqlx::query_as::<_, Branch>(
            "SELECT * FROM branches WHERE ($1 OR is_active) ORDER BY name",
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        Ok(branches)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Branch>, AppError> {
        let branch = sqlx::query_as::<_, Branch>("SELECT * FROM branches WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(branch)
    }

    pub async fn create(&self, request: CreateBranchRequest) -> Result<Branch, AppError> {
        let branch = sqlx::query_as::<_, Branch>(
            r#"
            INSERT INTO branches (id, name, address, phone, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, TRUE, $5, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.name.trim())
        .bind(request.address)
        .bind(request.phone)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(branch)
    }

    pub async fn update(&self, id: Uuid, request: UpdateBranchRequest) -> Result<Branch, AppError> {
        let branch = sqlx::query_as::<_, Branch>(
            r#"
            UPDATE branches
            SET name = COALESCE($2, name),
                address = COALESCE($3, address),
                phone = COALESCE($4, phone),
                is_active = COALESCE($5, is_active),
                updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.name.as_deref().map(str::trim))
        .bind(request.address)
        .bind(request.phone)
        .bind(request.is_active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(branch)
    }

    pub async fn deactivate(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE branches SET is_active = FALSE, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn count_active_users(&self, id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE branch_id = $1 AND is_active",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Sucursal inicial del arranque; reutiliza la primera si ya existe alguna
    pub async fn first_or_create(&self, name: &str) -> Result<Branch, AppError> {
        if let Some(branch) = sqlx::query_as::<_, Branch>(
            "SELECT * FROM branches ORDER BY created_at LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?
        {
            return Ok(branch);
        }

        self.create(CreateBranchRequest {
            name: name.to_string(),
            address: None,
            phone: None,
        })
        .await
    }
}
