use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::opportunity::{OpportunityStatus, OpportunityType};
use crate::utils::validation::validate_amount;

// Request para registrar una oportunidad
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOpportunityRequest {
    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    pub service_id: Option<Uuid>,

    #[serde(rename = "type")]
    pub opportunity_type: OpportunityType,

    #[validate(length(min = 3, message = "La descripción es requerida"))]
    pub description: String,

    #[validate(custom = "validate_amount")]
    pub estimated_amount: Option<Decimal>,

    pub follow_up_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub branch_id: Option<Uuid>,
}

// Request para actualizar una oportunidad
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOpportunityRequest {
    #[serde(rename = "type")]
    pub opportunity_type: Option<OpportunityType>,

    #[validate(length(min = 3, message = "La descripción es requerida"))]
    pub description: Option<String>,

    #[validate(custom = "validate_amount")]
    pub estimated_amount: Option<Decimal>,

    pub follow_up_date: Option<NaiveDate>,
    pub status: Option<OpportunityStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityQuery {
    pub status: Option<OpportunityStatus>,
    pub client_id: Option<Uuid>,
    pub branch_id: Option<Uuid>,
    /// Seguimientos con fecha hasta este día (inclusive)
    pub due_before: Option<NaiveDate>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
