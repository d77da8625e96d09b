use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::common_dto::Pagination;
use crate::dto::reception_dto::ReceptionChecklist;
use crate::dto::service_dto::{HistoryType, ServiceQuery};
use crate::models::service::{Service, ServiceStatusLog, ServiceSummary, StatusLogEntry};
use crate::services::status_rules::TransitionTimestamps;
use crate::utils::errors::AppError;

const SUMMARY_SELECT: &str = r#"
    SELECT s.id, s.branch_id, s.client_id, c.name AS client_name,
           s.vehicle_id, v.plate AS vehicle_plate, v.brand AS vehicle_brand, v.model AS vehicle_model,
           s.mechanic_id, m.name AS mechanic_name,
           s.status_id, ws.name AS status_name, ws.color AS status_color,
           s.problem_description, s.total_amount, s.mechanic_commission,
           s.received_at, s.started_at, s.completed_at, s.created_at
    FROM services s
    JOIN clients c ON c.id = s.client_id
    JOIN vehicles v ON v.id = s.vehicle_id
    JOIN work_statuses ws ON ws.id = s.status_id
    LEFT JOIN mechanics m ON m.id = s.mechanic_id
"#;

const LIST_FILTER: &str = r#"
    WHERE ($1::uuid IS NULL OR s.branch_id = $1)
      AND ($2::int IS NULL OR s.status_id = $2)
      AND ($3::uuid IS NULL OR s.client_id = $3)
      AND ($4::uuid IS NULL OR s.vehicle_id = $4)
      AND ($5::uuid IS NULL OR s.mechanic_id = $5)
      AND ($6::text IS NULL OR v.plate ILIKE $6 OR c.name ILIKE $6 OR s.problem_description ILIKE $6)
"#;

/// Datos de una orden nueva
#[derive(Debug, Clone)]
pub struct NewService {
    pub branch_id: Uuid,
    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    pub mechanic_id: Option<Uuid>,
    pub status_id: i32,
    pub appointment_id: Option<Uuid>,
    pub problem_description: String,
    pub diagnosis: Option<String>,
    pub quotation_details: Option<String>,
    pub total_amount: Decimal,
    pub mechanic_commission: Decimal,
    pub timestamps: TransitionTimestamps,
}

/// Valores finales de una edición de la orden
#[derive(Debug, Clone)]
pub struct ServiceEdit {
    pub mechanic_id: Option<Uuid>,
    pub problem_description: String,
    pub diagnosis: Option<String>,
    pub quotation_details: Option<String>,
    pub total_amount: Decimal,
    pub mechanic_commission: Decimal,
}

/// Datos capturados al recibir el vehículo
#[derive(Debug, Clone)]
pub struct ReceptionData {
    pub received_by: Uuid,
    pub kilometraje: Option<i32>,
    pub nivel_combustible: Option<i32>,
    pub checklist: ReceptionChecklist,
    pub carroceria_notes: Option<String>,
    pub observaciones: Option<String>,
    pub signature_data: String,
    pub signed_by: Option<String>,
}

pub struct ServiceRepository {
    pool: PgPool,
}

impl ServiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        branch_id: Option<Uuid>,
        query: &ServiceQuery,
        pagination: Pagination,
    ) -> Result<(Vec<ServiceSummary>, i64), AppError> {
        let pattern = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let services = sqlx::query_as::<_, ServiceSummary>(&format!(
            "{} {} ORDER BY s.created_at DESC LIMIT $7 OFFSET $8",
            SUMMARY_SELECT, LIST_FILTER
        ))
        .bind(branch_id)
        .bind(query.status_id)
        .bind(query.client_id)
        .bind(query.vehicle_id)
        .bind(query.mechanic_id)
        .bind(pattern.as_deref())
        .bind(pagination.limit)
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            r#"
            SELECT COUNT(*) FROM services s
            JOIN clients c ON c.id = s.client_id
            JOIN vehicles v ON v.id = s.vehicle_id
            {}
            "#,
            LIST_FILTER
        ))
        .bind(branch_id)
        .bind(query.status_id)
        .bind(query.client_id)
        .bind(query.vehicle_id)
        .bind(query.mechanic_id)
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok((services, total))
    }

    /// Servicios para el tablero: abiertos, más los cerrados en los últimos `closed_days`
    pub async fn board(
        &self,
        branch_id: Option<Uuid>,
        closed_status_ids: &[i32],
        closed_days: i32,
    ) -> Result<Vec<ServiceSummary>, AppError> {
        let services = sqlx::query_as::<_, ServiceSummary>(&format!(
            r#"
            {}
            WHERE ($1::uuid IS NULL OR s.branch_id = $1)
              AND (NOT (s.status_id = ANY($2))
                   OR s.updated_at >= NOW() - make_interval(days => $3))
            ORDER BY s.created_at
            "#,
            SUMMARY_SELECT
        ))
        .bind(branch_id)
        .bind(closed_status_ids)
        .bind(closed_days)
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, AppError> {
        let service = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(service)
    }

    /// Leer la orden bloqueando la fila hasta el fin de la transacción
    pub async fn lock_in(conn: &mut PgConnection, id: Uuid) -> Result<Option<Service>, AppError> {
        let service = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(service)
    }

    pub async fn create_in(conn: &mut PgConnection, service: NewService) -> Result<Service, AppError> {
        let created = sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (id, branch_id, client_id, vehicle_id, mechanic_id, status_id,
                                  appointment_id, problem_description, diagnosis, quotation_details,
                                  total_amount, mechanic_commission, started_at, completed_at,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(service.branch_id)
        .bind(service.client_id)
        .bind(service.vehicle_id)
        .bind(service.mechanic_id)
        .bind(service.status_id)
        .bind(service.appointment_id)
        .bind(service.problem_description.trim())
        .bind(service.diagnosis)
        .bind(service.quotation_details)
        .bind(service.total_amount)
        .bind(service.mechanic_commission)
        .bind(service.timestamps.started_at)
        .bind(service.timestamps.completed_at)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(created)
    }

    pub async fn update(&self, id: Uuid, edit: ServiceEdit) -> Result<Service, AppError> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            UPDATE services
            SET mechanic_id = $2, problem_description = $3, diagnosis = $4,
                quotation_details = $5, total_amount = $6, mechanic_commission = $7,
                updated_at = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(edit.mechanic_id)
        .bind(edit.problem_description.trim())
        .bind(edit.diagnosis)
        .bind(edit.quotation_details)
        .bind(edit.total_amount)
        .bind(edit.mechanic_commission)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(service)
    }

    pub async fn update_status_in(
        conn: &mut PgConnection,
        id: Uuid,
        status_id: i32,
        timestamps: TransitionTimestamps,
    ) -> Result<Service, AppError> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            UPDATE services
            SET status_id = $2, started_at = $3, completed_at = $4, updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status_id)
        .bind(timestamps.started_at)
        .bind(timestamps.completed_at)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(service)
    }

    pub async fn insert_status_log_in(
        conn: &mut PgConnection,
        service_id: Uuid,
        old_status_id: Option<i32>,
        new_status_id: i32,
        changed_by: Option<Uuid>,
        notes: Option<String>,
    ) -> Result<ServiceStatusLog, AppError> {
        let log = sqlx::query_as::<_, ServiceStatusLog>(
            r#"
            INSERT INTO service_status_logs (id, service_id, old_status_id, new_status_id,
                                             changed_by, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(service_id)
        .bind(old_status_id)
        .bind(new_status_id)
        .bind(changed_by)
        .bind(notes)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(log)
    }

    /// Guardar checklist, kilometraje y firma de la recepción
    pub async fn apply_reception_in(
        conn: &mut PgConnection,
        id: Uuid,
        reception: ReceptionData,
        received_at: DateTime<Utc>,
    ) -> Result<Service, AppError> {
        let checklist = reception.checklist;

        let service = sqlx::query_as::<_, Service>(
            r#"
            UPDATE services
            SET received_at = $2, received_by = $3, kilometraje = $4, nivel_combustible = $5,
                luces_ok = $6, llantas_ok = $7, frenos_ok = $8, espejos_ok = $9,
                parabrisas_ok = $10, documentos_ok = $11, herramientas_ok = $12,
                llanta_repuesto_ok = $13, carroceria_notes = $14, observaciones = $15,
                signature_data = $16, signed_by = $17, updated_at = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(received_at)
        .bind(reception.received_by)
        .bind(reception.kilometraje)
        .bind(reception.nivel_combustible)
        .bind(checklist.luces_ok)
        .bind(checklist.llantas_ok)
        .bind(checklist.frenos_ok)
        .bind(checklist.espejos_ok)
        .bind(checklist.parabrisas_ok)
        .bind(checklist.documentos_ok)
        .bind(checklist.herramientas_ok)
        .bind(checklist.llanta_repuesto_ok)
        .bind(reception.carroceria_notes)
        .bind(reception.observaciones)
        .bind(reception.signature_data)
        .bind(reception.signed_by)
        .fetch_one(conn)
        .await?;

        Ok(service)
    }

    /// Historial de cambios de estado, el más reciente primero
    pub async fn status_history(&self, service_id: Uuid) -> Result<Vec<StatusLogEntry>, AppError> {
        let entries = sqlx::query_as::<_, StatusLogEntry>(
            r#"
            SELECT l.id, l.old_status_id, os.name AS old_status_name,
                   l.new_status_id, ns.name AS new_status_name,
                   l.changed_by, u.name AS changed_by_name, l.notes, l.created_at
            FROM service_status_logs l
            JOIN work_statuses ns ON ns.id = l.new_status_id
            LEFT JOIN work_statuses os ON os.id = l.old_status_id
            LEFT JOIN users u ON u.id = l.changed_by
            WHERE l.service_id = $1
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(service_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Todos los servicios de un cliente o de un vehículo
    pub async fn history(
        &self,
        history_type: HistoryType,
        id: Uuid,
        branch_id: Option<Uuid>,
    ) -> Result<Vec<ServiceSummary>, AppError> {
        let column = match history_type {
            HistoryType::Client => "s.client_id",
            HistoryType::Vehicle => "s.vehicle_id",
        };

        let services = sqlx::query_as::<_, ServiceSummary>(&format!(
            "{} WHERE {} = $1 AND ($2::uuid IS NULL OR s.branch_id = $2) ORDER BY s.created_at DESC",
            SUMMARY_SELECT, column
        ))
        .bind(id)
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    /// Vehículos recibidos en la fecha indicada
    pub async fn received_on(&self, branch_id: Option<Uuid>, day: NaiveDate) -> Result<Vec<ServiceSummary>, AppError> {
        let services = sqlx::query_as::<_, ServiceSummary>(&format!(
            r#"
            {}
            WHERE ($1::uuid IS NULL OR s.branch_id = $1)
              AND s.received_at IS NOT NULL
              AND (s.received_at AT TIME ZONE 'UTC')::date = $2
            ORDER BY s.received_at DESC
            "#,
            SUMMARY_SELECT
        ))
        .bind(branch_id)
        .bind(day)
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }
}
