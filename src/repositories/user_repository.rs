use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common_dto::Pagination;
use crate::models::user::{User, UserListItem};
use crate::utils::errors::AppError;

pub struct UserRepository {
    pool: PgPool,
}

/// Campos a modificar de un usuario; `None` deja el valor actual
#[derive(Debug, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub branch_id: Option<Uuid>,
    pub role_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        branch_id: Option<Uuid>,
        search: Option<&str>,
        pagination: Pagination,
    ) -> Result<(Vec<UserListItem>, i64), AppError> {
        let pattern = search.map(|s| format!("%{}%", s.trim()));

        let users = sqlx::query_as::<_, UserListItem>(
            r#"
            SELECT u.id, u.branch_id, b.name AS branch_name, u.role_id, r.name AS role_name,
                   u.name, u.email, u.is_active, u.last_login_at, u.created_at
            FROM users u
            JOIN branches b ON b.id = u.branch_id
            JOIN roles r ON r.id = u.role_id
            WHERE ($1::uuid IS NULL OR u.branch_id = $1)
              AND ($2::text IS NULL OR u.name ILIKE $2 OR u.email ILIKE $2)
            ORDER BY u.name
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(branch_id)
        .bind(pattern.as_deref())
        .bind(pagination.limit)
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users u
            WHERE ($1::uuid IS NULL OR u.branch_id = $1)
              AND ($2::text IS NULL OR u.name ILIKE $2 OR u.email ILIKE $2)
            "#,
        )
        .bind(branch_id)
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok((users, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn email_exists(&self, email: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(email.trim())
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn create(
        &self,
        branch_id: Uuid,
        role_id: Uuid,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, branch_id, role_id, name, email, password_hash, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(branch_id)
        .bind(role_id)
        .bind(name.trim())
        .bind(email.trim().to_lowercase())
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn update(&self, id: Uuid, changes: UserChanges) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                branch_id = COALESCE($5, branch_id),
                role_id = COALESCE($6, role_id),
                is_active = COALESCE($7, is_active),
                updated_at = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref().map(str::trim))
        .bind(changes.email.map(|e| e.trim().to_lowercase()))
        .bind(changes.password_hash)
        .bind(changes.branch_id)
        .bind(changes.role_id)
        .bind(changes.is_active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn deactivate(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET is_active = FALSE, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn touch_last_login(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login_at = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
