//! Modelo de Service (orden de trabajo)
//!
//! Una orden de servicio sigue un trabajo de reparación desde la recepción
//! del vehículo hasta su cierre. Incluye los campos del checklist de
//! recepción y la firma del cliente.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Service - mapea exactamente a la tabla services
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
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
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    // Recepción
    pub received_at: Option<DateTime<Utc>>,
    pub received_by: Option<Uuid>,
    pub kilometraje: Option<i32>,
    pub nivel_combustible: Option<i32>,
    pub luces_ok: Option<bool>,
    pub llantas_ok: Option<bool>,
    pub frenos_ok: Option<bool>,
    pub espejos_ok: Option<bool>,
    pub parabrisas_ok: Option<bool>,
    pub documentos_ok: Option<bool>,
    pub herramientas_ok: Option<bool>,
    pub llanta_repuesto_ok: Option<bool>,
    pub carroceria_notes: Option<String>,
    pub observaciones: Option<String>,
    pub signature_data: Option<String>,
    pub signed_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Servicio con los nombres de sus relaciones, para listados y tablero
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub vehicle_id: Uuid,
    pub vehicle_plate: String,
    pub vehicle_brand: String,
    pub vehicle_model: String,
    pub mechanic_id: Option<Uuid>,
    pub mechanic_name: Option<String>,
    pub status_id: i32,
    pub status_name: String,
    pub status_color: String,
    pub problem_description: String,
    pub total_amount: Decimal,
    pub mechanic_commission: Decimal,
    pub received_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Registro del historial de cambios de estado
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatusLog {
    pub id: Uuid,
    pub service_id: Uuid,
    pub old_status_id: Option<i32>,
    pub new_status_id: i32,
    pub changed_by: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Entrada del historial con nombres de estado y usuario
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StatusLogEntry {
    pub id: Uuid,
    pub old_status_id: Option<i32>,
    pub old_status_name: Option<String>,
    pub new_status_id: i32,
    pub new_status_name: String,
    pub changed_by: Option<Uuid>,
    pub changed_by_name: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
