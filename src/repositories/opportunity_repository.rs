use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common_dto::Pagination;
use crate::dto::opportunity_dto::{CreateOpportunityRequest, OpportunityQuery, UpdateOpportunityRequest};
use crate::models::opportunity::{Opportunity, OpportunityListItem, OpportunityStatus};
use crate::utils::errors::AppError;

const LIST_FILTER: &str = r#"
    WHERE o.is_active
      AND ($1::uuid IS NULL OR o.branch_id = $1)
      AND ($2::text IS NULL OR o.status = $2)
      AND ($3::uuid IS NULL OR o.client_id = $3)
      AND ($4::date IS NULL OR o.follow_up_date <= $4)
"#;

pub struct OpportunityRepository {
    pool: PgPool,
}

impl OpportunityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        branch_id: Option<Uuid>,
        query: &OpportunityQuery,
        pagination: Pagination,
    ) -> Result<(Vec<OpportunityListItem>, i64), AppError> {
        let status = query.status.map(|s| s.as_str());

        let opportunities = sqlx::query_as::<_, OpportunityListItem>(&format!(
            r#"
            SELECT o.id, o.client_id, c.name AS client_name,
                   COALESCE(c.phone, c.whatsapp) AS client_phone,
                   o.vehicle_id, v.plate AS vehicle_plate, o.service_id, o.opportunity_type,
                   o.description, o.estimated_amount, o.follow_up_date, o.status, o.created_at
            FROM opportunities o
            JOIN clients c ON c.id = o.client_id
            JOIN vehicles v ON v.id = o.vehicle_id
            {}
            ORDER BY o.follow_up_date NULLS LAST, o.created_at DESC
            LIMIT $5 OFFSET $6
            "#,
            LIST_FILTER
        ))
        .bind(branch_id)
        .bind(status)
        .bind(query.client_id)
        .bind(query.due_before)
        .bind(pagination.limit)
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM opportunities o {}",
            LIST_FILTER
        ))
        .bind(branch_id)
        .bind(status)
        .bind(query.client_id)
        .bind(query.due_before)
        .fetch_one(&self.pool)
        .await?;

        Ok((opportunities, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Opportunity>, AppError> {
        let opportunity = sqlx::query_as::<_, Opportunity>(
            "SELECT * FROM opportunities WHERE id = $1 AND is_active",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(opportunity)
    }

    pub async fn create(
        &self,
        branch_id: Uuid,
        created_by: Uuid,
        request: CreateOpportunityRequest,
    ) -> Result<Opportunity, AppError> {
        let opportunity = sqlx::query_as::<_, Opportunity>(
            r#"
            INSERT INTO opportunities (id, branch_id, client_id, vehicle_id, service_id,
                                       opportunity_type, description, estimated_amount,
                                       follow_up_date, status, notes, is_active, created_by,
                                       created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, TRUE, $12, $13, $13)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(branch_id)
        .bind(request.client_id)
        .bind(request.vehicle_id)
        .bind(request.service_id)
        .bind(request.opportunity_type.as_str())
        .bind(request.description.trim())
        .bind(request.estimated_amount)
        .bind(request.follow_up_date)
        .bind(OpportunityStatus::Pending.as_str())
        .bind(request.notes)
        .bind(created_by)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(opportunity)
    }

    pub async fn update(&self, id: Uuid, request: UpdateOpportunityRequest) -> Result<Opportunity, AppError> {
        let opportunity = sqlx::query_as::<_, Opportunity>(
            r#"
            UPDATE opportunities
            SET opportunity_type = COALESCE($2, opportunity_type),
                description = COALESCE($3, description),
                estimated_amount = COALESCE($4, estimated_amount),
                follow_up_date = COALESCE($5, follow_up_date),
                status = COALESCE($6, status),
                notes = COALESCE($7, notes),
                updated_at = $8
            WHERE id = $1 AND is_active
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.opportunity_type.map(|t| t.as_str()))
        .bind(request.description.as_deref().map(str::trim))
        .bind(request.estimated_amount)
        .bind(request.follow_up_date)
        .bind(request.status.map(|s| s.as_str()))
        .bind(request.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(opportunity)
    }

    pub async fn deactivate(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE opportunities SET is_active = FALSE, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
