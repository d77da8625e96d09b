//! Modelo de Appointment (cita)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Estado de la cita - se guarda como texto en appointments.status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::InProgress => "IN_PROGRESS",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::NoShow => "NO_SHOW",
        }
    }

    /// Estados que bloquean el borrado del cliente
    pub fn blocking() -> [AppointmentStatus; 2] {
        [AppointmentStatus::Scheduled, AppointmentStatus::InProgress]
    }

    /// Una cita cerrada ya no puede generar un servicio
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::NoShow
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SCHEDULED" => Ok(AppointmentStatus::Scheduled),
            "CONFIRMED" => Ok(AppointmentStatus::Confirmed),
            "IN_PROGRESS" => Ok(AppointmentStatus::InProgress),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            "CANCELLED" => Ok(AppointmentStatus::Cancelled),
            "NO_SHOW" => Ok(AppointmentStatus::NoShow),
            other => Err(format!("Estado de cita desconocido: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    pub scheduled_date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: String,
    pub service_type: Option<String>,
    pub notes: Option<String>,
    pub service_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn parsed_status(&self) -> Option<AppointmentStatus> {
        self.status.parse().ok()
    }
}

/// Cita con cliente y vehículo, para la agenda
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentListItem {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub client_phone: Option<String>,
    pub vehicle_id: Uuid,
    pub vehicle_plate: String,
    pub scheduled_date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: String,
    pub service_type: Option<String>,
    pub notes: Option<String>,
    pub service_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!("in_progress".parse::<AppointmentStatus>().unwrap(), AppointmentStatus::InProgress);
        assert_eq!(AppointmentStatus::NoShow.to_string(), "NO_SHOW");
        assert!("LATER".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn test_status_serde_matches_storage() {
        let json = serde_json::to_string(&AppointmentStatus::InProgress).unwrap();
        assert_eq!(json, format!("\"{}\"", AppointmentStatus::InProgress.as_str()));
    }

    #[test]
    fn test_blocking_and_closed_states() {
        assert!(AppointmentStatus::blocking().contains(&AppointmentStatus::Scheduled));
        assert!(!AppointmentStatus::blocking().contains(&AppointmentStatus::Confirmed));
        assert!(AppointmentStatus::Cancelled.is_closed());
        assert!(!AppointmentStatus::Confirmed.is_closed());
    }
}
