use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::mechanic_dto::{CreateMechanicRequest, UpdateMechanicRequest};
use crate::models::mechanic::{CommissionEntry, Mechanic};
use crate::utils::errors::AppError;
use crate::utils::validation::normalize_optional;

pub struct MechanicRepository {
    pool: PgPool,
}

impl MechanicRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, branch_id: Option<Uuid>, include_inactive: bool) -> Result<Vec<Mechanic>, AppError> {
        let mechanics = sqlx::query_as::<_, Mechanic>(
            r#"
            SELECT * FROM mechanics
            WHERE ($1::uuid IS NULL OR branch_id = $1) AND ($2 OR is_active)
            ORDER BY name
            "#,
        )
        .bind(branch_id)
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        Ok(mechanics)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Mechanic>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Self::find_by_id_in(&mut conn, id).await
    }

    pub async fn find_by_id_in(conn: &mut PgConnection, id: Uuid) -> Result<Option<Mechanic>, AppError> {
        let mechanic = sqlx::query_as::<_, Mechanic>("SELECT * FROM mechanics WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(mechanic)
    }

    pub async fn create(&self, branch_id: Uuid, request: CreateMechanicRequest) -> Result<Mechanic, AppError> {
        let mechanic = sqlx::query_as::<_, Mechanic>(
            r#"
            INSERT INTO mechanics (id, branch_id, name, phone, specialty, commission_percentage,
                                   is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(branch_id)
        .bind(request.name.trim())
        .bind(normalize_optional(request.phone))
        .bind(normalize_optional(request.specialty))
        .bind(request.commission_percentage.round_dp(2))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(mechanic)
    }

    pub async fn update(&self, id: Uuid, request: UpdateMechanicRequest) -> Result<Mechanic, AppError> {
        let mechanic = sqlx::query_as::<_, Mechanic>(
            r#"
            UPDATE mechanics
            SET name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                specialty = COALESCE($4, specialty),
                commission_percentage = COALESCE($5, commission_percentage),
                is_active = COALESCE($6, is_active),
                updated_at = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.name.as_deref().map(str::trim))
        .bind(request.phone)
        .bind(request.specialty)
        .bind(request.commission_percentage.map(|p: Decimal| p.round_dp(2)))
        .bind(request.is_active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(mechanic)
    }

    pub async fn deactivate(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE mechanics SET is_active = FALSE, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn count_open_services(&self, id: Uuid, closed_status_ids: &[i32]) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM services WHERE mechanic_id = $1 AND NOT (status_id = ANY($2))",
        )
        .bind(id)
        .bind(closed_status_ids)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Servicios terminados del mecánico en el periodo (fechas inclusivas)
    pub async fn commissions(
        &self,
        id: Uuid,
        completed_status_ids: &[i32],
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<CommissionEntry>, AppError> {
        let entries = sqlx::query_as::<_, CommissionEntry>(
            r#"
            SELECT s.id AS service_id, v.plate AS vehicle_plate, c.name AS client_name,
                   s.total_amount, s.mechanic_commission, s.completed_at
            FROM services s
            JOIN vehicles v ON v.id = s.vehicle_id
            JOIN clients c ON c.id = s.client_id
            WHERE s.mechanic_id = $1
              AND s.status_id = ANY($2)
              AND ($3::date IS NULL OR COALESCE(s.completed_at, s.updated_at)::date >= $3)
              AND ($4::date IS NULL OR COALESCE(s.completed_at, s.updated_at)::date <= $4)
            ORDER BY COALESCE(s.completed_at, s.updated_at) DESC
            "#,
        )
        .bind(id)
        .bind(completed_status_ids)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
