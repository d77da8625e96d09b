use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::appointment::AppointmentStatus;

// Request para agendar una cita
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    pub scheduled_date: DateTime<Utc>,

    #[validate(range(min = 15, max = 480, message = "La duración debe estar entre 15 y 480 minutos"))]
    pub duration_minutes: Option<i32>,

    #[validate(length(max = 80))]
    pub service_type: Option<String>,

    pub notes: Option<String>,
    pub branch_id: Option<Uuid>,
}

// Request para actualizar una cita
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    pub scheduled_date: Option<DateTime<Utc>>,

    #[validate(range(min = 15, max = 480, message = "La duración debe estar entre 15 y 480 minutos"))]
    pub duration_minutes: Option<i32>,

    pub status: Option<AppointmentStatus>,

    #[validate(length(max = 80))]
    pub service_type: Option<String>,

    pub notes: Option<String>,
}

// Request para generar una orden de servicio a partir de una cita
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConvertAppointmentRequest {
    #[validate(length(min = 3, message = "La descripción del problema es requerida"))]
    pub problem_description: Option<String>,
    pub mechanic_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub status: Option<AppointmentStatus>,
    pub client_id: Option<Uuid>,
    pub branch_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
