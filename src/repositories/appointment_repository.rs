use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::appointment_dto::{AppointmentQuery, CreateAppointmentRequest, UpdateAppointmentRequest};
use crate::dto::common_dto::Pagination;
use crate::models::appointment::{Appointment, AppointmentListItem, AppointmentStatus};
use crate::utils::errors::AppError;

/// Duración por defecto de una cita en minutos
pub const DEFAULT_DURATION_MINUTES: i32 = 60;

const LIST_FILTER: &str = r#"
    WHERE ($1::uuid IS NULL OR a.branch_id = $1)
      AND ($2::timestamptz IS NULL OR a.scheduled_date >= $2)
      AND ($3::timestamptz IS NULL OR a.scheduled_date <= $3)
      AND ($4::text IS NULL OR a.status = $4)
      AND ($5::uuid IS NULL OR a.client_id = $5)
"#;

pub struct AppointmentRepository {
    pool: PgPool,
}

impl AppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        branch_id: Option<Uuid>,
        query: &AppointmentQuery,
        pagination: Pagination,
    ) -> Result<(Vec<AppointmentListItem>, i64), AppError> {
        let status = query.status.map(|s| s.as_str());

        let appointments = sqlx::query_as::<_, AppointmentListItem>(&format!(
            r#"
            SELECT a.id, a.branch_id, a.client_id, c.name AS client_name,
                   COALESCE(c.phone, c.whatsapp) AS client_phone,
                   a.vehicle_id, v.plate AS vehicle_plate, a.scheduled_date, a.duration_minutes,
                   a.status, a.service_type, a.notes, a.service_id
            FROM appointments a
            JOIN clients c ON c.id = a.client_id
            JOIN vehicles v ON v.id = a.vehicle_id
            {}
            ORDER BY a.scheduled_date
            LIMIT $6 OFFSET $7
            "#,
            LIST_FILTER
        ))
        .bind(branch_id)
        .bind(query.from)
        .bind(query.to)
        .bind(status)
        .bind(query.client_id)
        .bind(pagination.limit)
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM appointments a {}",
            LIST_FILTER
        ))
        .bind(branch_id)
        .bind(query.from)
        .bind(query.to)
        .bind(status)
        .bind(query.client_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((appointments, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Self::find_by_id_in(&mut conn, id).await
    }

    pub async fn find_by_id_in(conn: &mut PgConnection, id: Uuid) -> Result<Option<Appointment>, AppError> {
        let appointment = sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(appointment)
    }

    pub async fn create(
        &self,
        branch_id: Uuid,
        created_by: Uuid,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (id, branch_id, client_id, vehicle_id, scheduled_date,
                                      duration_minutes, status, service_type, notes, created_by,
                                      created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(branch_id)
        .bind(request.client_id)
        .bind(request.vehicle_id)
        .bind(request.scheduled_date)
        .bind(request.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES))
        .bind(AppointmentStatus::Scheduled.as_str())
        .bind(request.service_type)
        .bind(request.notes)
        .bind(created_by)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(appointment)
    }

    pub async fn update(&self, id: Uuid, request: UpdateAppointmentRequest) -> Result<Appointment, AppError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET scheduled_date = COALESCE($2, scheduled_date),
                duration_minutes = COALESCE($3, duration_minutes),
                status = COALESCE($4, status),
                service_type = COALESCE($5, service_type),
                notes = COALESCE($6, notes),
                updated_at = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.scheduled_date)
        .bind(request.duration_minutes)
        .bind(request.status.map(|s| s.as_str()))
        .bind(request.service_type)
        .bind(request.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(appointment)
    }

    pub async fn set_status(&self, id: Uuid, status: AppointmentStatus) -> Result<Appointment, AppError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(appointment)
    }

    /// Enlazar la cita con la orden generada y fijar su estado
    pub async fn link_service_in(
        conn: &mut PgConnection,
        id: Uuid,
        service_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET service_id = $2, status = $3, updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(service_id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(appointment)
    }
}
