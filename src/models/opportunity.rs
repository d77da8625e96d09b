//! Modelo de Opportunity
//!
//! Oportunidad de venta o servicio futuro para un cliente/vehículo,
//! opcionalmente originada en un servicio.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpportunityType {
    Maintenance,
    Repair,
    Upgrade,
    Inspection,
    Other,
}

impl OpportunityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityType::Maintenance => "MAINTENANCE",
            OpportunityType::Repair => "REPAIR",
            OpportunityType::Upgrade => "UPGRADE",
            OpportunityType::Inspection => "INSPECTION",
            OpportunityType::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpportunityStatus {
    Pending,
    Contacted,
    Interested,
    NotInterested,
    Converted,
    Lost,
}

impl OpportunityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityStatus::Pending => "PENDING",
            OpportunityStatus::Contacted => "CONTACTED",
            OpportunityStatus::Interested => "INTERESTED",
            OpportunityStatus::NotInterested => "NOT_INTERESTED",
            OpportunityStatus::Converted => "CONVERTED",
            OpportunityStatus::Lost => "LOST",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    pub service_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub opportunity_type: String,
    pub description: String,
    pub estimated_amount: Option<Decimal>,
    pub follow_up_date: Option<NaiveDate>,
    pub status: String,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Oportunidad con cliente y vehículo, para seguimiento
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityListItem {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub client_phone: Option<String>,
    pub vehicle_id: Uuid,
    pub vehicle_plate: String,
    pub service_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub opportunity_type: String,
    pub description: String,
    pub estimated_amount: Option<Decimal>,
    pub follow_up_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names() {
        let t: OpportunityType = serde_json::from_str("\"MAINTENANCE\"").unwrap();
        assert_eq!(t.as_str(), "MAINTENANCE");
        let s: OpportunityStatus = serde_json::from_str("\"NOT_INTERESTED\"").unwrap();
        assert_eq!(s, OpportunityStatus::NotInterested);
        assert_eq!(s.as_str(), "NOT_INTERESTED");
    }
}
