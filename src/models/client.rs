//! Modelo de Client
//!
//! Cliente del taller. Debe tener teléfono o WhatsApp; es dueño de
//! vehículos, citas, servicios y oportunidades.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub document_number: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cliente con conteo de vehículos, para listados
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ClientListItem {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub vehicle_count: i64,
    pub created_at: DateTime<Utc>,
}
