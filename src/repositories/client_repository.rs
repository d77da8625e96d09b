use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::client_dto::{ContactInfo, CreateClientRequest, UpdateClientRequest};
use crate::dto::common_dto::Pagination;
use crate::models::appointment::AppointmentStatus;
use crate::models::client::{Client, ClientListItem};
use crate::utils::errors::AppError;
use crate::utils::validation::{merge_optional, normalize_optional};

pub struct ClientRepository {
    pool: PgPool,
}

/// Registros que impiden dar de baja a un cliente
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientDependencies {
    pub active_appointments: i64,
    pub open_services: i64,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        branch_id: Option<Uuid>,
        search: Option<&str>,
        pagination: Pagination,
    ) -> Result<(Vec<ClientListItem>, i64), AppError> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let clients = sqlx::query_as::<_, ClientListItem>(
            r#"
            SELECT c.id, c.branch_id, c.name, c.phone, c.whatsapp, c.email,
                   (SELECT COUNT(*) FROM vehicles v WHERE v.client_id = c.id) AS vehicle_count,
                   c.created_at
            FROM clients c
            WHERE c.is_active
              AND ($1::uuid IS NULL OR c.branch_id = $1)
              AND ($2::text IS NULL OR c.name ILIKE $2 OR c.phone ILIKE $2
                   OR c.whatsapp ILIKE $2 OR c.document_number ILIKE $2
                   OR EXISTS (SELECT 1 FROM vehicles v WHERE v.client_id = c.id AND v.plate ILIKE $2))
            ORDER BY c.name
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
            SELECT COUNT(*) FROM clients c
            WHERE c.is_active
              AND ($1::uuid IS NULL OR c.branch_id = $1)
              AND ($2::text IS NULL OR c.name ILIKE $2 OR c.phone ILIKE $2
                   OR c.whatsapp ILIKE $2 OR c.document_number ILIKE $2
                   OR EXISTS (SELECT 1 FROM vehicles v WHERE v.client_id = c.id AND v.plate ILIKE $2))
            "#,
        )
        .bind(branch_id)
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok((clients, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Self::find_by_id_in(&mut conn, id).await
    }

    pub async fn find_by_id_in(conn: &mut PgConnection, id: Uuid) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(client)
    }

    pub async fn create(
        &self,
        branch_id: Uuid,
        request: CreateClientRequest,
        contact: ContactInfo,
    ) -> Result<Client, AppError> {
        let mut conn = self.pool.acquire().await?;
        Self::create_in(&mut conn, branch_id, request, contact).await
    }

    pub async fn create_in(
        conn: &mut PgConnection,
        branch_id: Uuid,
        request: CreateClientRequest,
        contact: ContactInfo,
    ) -> Result<Client, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (id, branch_id, name, phone, whatsapp, email, address,
                                 document_number, notes, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, TRUE, $10, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(branch_id)
        .bind(request.name.trim())
        .bind(contact.phone)
        .bind(contact.whatsapp)
        .bind(normalize_optional(request.email))
        .bind(normalize_optional(request.address))
        .bind(normalize_optional(request.document_number))
        .bind(normalize_optional(request.notes))
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(client)
    }

    /// Reemplaza los campos enviados; un string vacío deja el campo en NULL
    pub async fn update(
        &self,
        current: &Client,
        request: UpdateClientRequest,
        contact: ContactInfo,
    ) -> Result<Client, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET name = $2, phone = $3, whatsapp = $4, email = $5, address = $6,
                document_number = $7, notes = $8, updated_at = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(request.name.as_deref().map(str::trim).unwrap_or(&current.name))
        .bind(contact.phone)
        .bind(contact.whatsapp)
        .bind(merge_optional(request.email, current.email.clone()))
        .bind(merge_optional(request.address, current.address.clone()))
        .bind(merge_optional(request.document_number, current.document_number.clone()))
        .bind(merge_optional(request.notes, current.notes.clone()))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(client)
    }

    pub async fn dependencies(
        &self,
        id: Uuid,
        closed_status_ids: &[i32],
    ) -> Result<ClientDependencies, AppError> {
        let blocking: Vec<&str> = AppointmentStatus::blocking().iter().map(|s| s.as_str()).collect();

        let (active_appointments, open_services) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM appointments WHERE client_id = $1 AND status = ANY($2)),
                (SELECT COUNT(*) FROM services WHERE client_id = $1 AND NOT (status_id = ANY($3)))
            "#,
        )
        .bind(id)
        .bind(&blocking)
        .bind(closed_status_ids)
        .fetch_one(&self.pool)
        .await?;

        Ok(ClientDependencies { active_appointments, open_services })
    }

    pub async fn deactivate(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE clients SET is_active = FALSE, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
