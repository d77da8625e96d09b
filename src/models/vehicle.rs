//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle. La placa es única en todo el
//! sistema y se guarda normalizada (mayúsculas, sin separadores).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub client_id: Uuid,
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub vin: Option<String>,
    pub mileage: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Vehículo con datos de contacto del dueño (búsqueda por placa)
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VehicleWithOwner {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub client_phone: Option<String>,
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub mileage: Option<i32>,
    pub created_at: DateTime<Utc>,
}
