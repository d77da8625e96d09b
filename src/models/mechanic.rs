//! Modelo de Mechanic

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Mechanic {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub specialty: Option<String>,
    pub commission_percentage: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Servicio terminado que genera comisión
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CommissionEntry {
    pub service_id: Uuid,
    pub vehicle_plate: String,
    pub client_name: String,
    pub total_amount: Decimal,
    pub mechanic_commission: Decimal,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Resumen de comisiones de un mecánico en un periodo
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionSummary {
    pub mechanic_id: Uuid,
    pub mechanic_name: String,
    pub commission_percentage: Decimal,
    pub services_count: usize,
    pub total_amount: Decimal,
    pub total_commission: Decimal,
    pub services: Vec<CommissionEntry>,
}

impl CommissionSummary {
    pub fn from_entries(mechanic: &Mechanic, services: Vec<CommissionEntry>) -> Self {
        let total_amount = services.iter().map(|s| s.total_amount).sum();
        let total_commission = services.iter().map(|s| s.mechanic_commission).sum();

        Self {
            mechanic_id: mechanic.id,
            mechanic_name: mechanic.name.clone(),
            commission_percentage: mechanic.commission_percentage,
            services_count: services.len(),
            total_amount,
            total_commission,
            services,
        }
    }
}
