//! Clasificación de estados de trabajo
//!
//! Único punto donde se decide si un servicio está en proceso, terminado o
//! cerrado. Los nombres se comparan sin mayúsculas ni acentos; los alias
//! históricos COMPLETADO y ENTREGADO cuentan como terminado.

use chrono::{DateTime, Utc};

use crate::models::work_status::WorkStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Received,
    Quoted,
    InProgress,
    Completed,
    Rejected,
    Other,
}

impl StatusKind {
    /// Clasificar un estado por su nombre
    pub fn from_name(name: &str) -> Self {
        match normalize(name).as_str() {
            "RECIBIDO" => StatusKind::Received,
            "COTIZADO" => StatusKind::Quoted,
            "EN PROCESO" | "EN_PROCESO" | "EN REPARACION" => StatusKind::InProgress,
            "TERMINADO" | "COMPLETADO" | "ENTREGADO" => StatusKind::Completed,
            "RECHAZADO" | "CANCELADO" => StatusKind::Rejected,
            _ => StatusKind::Other,
        }
    }

    pub fn of(status: &WorkStatus) -> Self {
        Self::from_name(&status.name)
    }

    /// Terminado o rechazado: ya no hay trabajo pendiente
    pub fn is_closed(&self) -> bool {
        matches!(self, StatusKind::Completed | StatusKind::Rejected)
    }
}

/// Mayúsculas, sin acentos y con espacios colapsados
fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .map(|c| match c {
            'á' | 'Á' => 'A',
            'é' | 'É' => 'E',
            'í' | 'Í' => 'I',
            'ó' | 'Ó' => 'O',
            'ú' | 'Ú' | 'ü' | 'Ü' => 'U',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// Marcas de tiempo resultantes de un cambio de estado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTimestamps {
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Calcular startedAt/completedAt al entrar al estado `target`.
///
/// Entrar a EN PROCESO fija startedAt si no existía; entrar a TERMINADO fija
/// completedAt; salir de TERMINADO lo limpia. No se valida el grafo de
/// transiciones: cualquier estado puede pasar a cualquier otro.
pub fn transition_timestamps(
    target: StatusKind,
    started_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> TransitionTimestamps {
    let started_at = match target {
        StatusKind::InProgress | StatusKind::Completed => started_at.or(Some(now)),
        _ => started_at,
    };

    let completed_at = match target {
        StatusKind::Completed => Some(now),
        _ => None,
    };

    TransitionTimestamps { started_at, completed_at }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_name_is_case_and_accent_insensitive() {
        assert_eq!(StatusKind::from_name("En Proceso"), StatusKind::InProgress);
        assert_eq!(StatusKind::from_name("  en   proceso "), StatusKind::InProgress);
        assert_eq!(StatusKind::from_name("Terminado"), StatusKind::Completed);
        assert_eq!(StatusKind::from_name("Completado"), StatusKind::Completed);
        assert_eq!(StatusKind::from_name("ENTREGADO"), StatusKind::Completed);
        assert_eq!(StatusKind::from_name("Reparación"), StatusKind::Other);
        assert_eq!(StatusKind::from_name("en reparación"), StatusKind::InProgress);
    }

    #[test]
    fn test_closed_states() {
        assert!(StatusKind::Completed.is_closed());
        assert!(StatusKind::Rejected.is_closed());
        assert!(!StatusKind::Quoted.is_closed());
        assert!(!StatusKind::Received.is_closed());
    }

    #[test]
    fn test_entering_in_progress_keeps_first_start() {
        let first = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 2, 9, 0, 0).unwrap();

        let ts = transition_timestamps(StatusKind::InProgress, None, now);
        assert_eq!(ts.started_at, Some(now));

        let ts = transition_timestamps(StatusKind::InProgress, Some(first), now);
        assert_eq!(ts.started_at, Some(first));
    }

    #[test]
    fn test_completion_is_set_and_cleared() {
        let now = Utc.with_ymd_and_hms(2025, 3, 2, 9, 0, 0).unwrap();

        let done = transition_timestamps(StatusKind::Completed, None, now);
        assert_eq!(done.completed_at, Some(now));
        assert_eq!(done.started_at, Some(now));

        // volver atrás desde TERMINADO está permitido y limpia completedAt
        let reopened = transition_timestamps(StatusKind::Quoted, done.started_at, now);
        assert_eq!(reopened.completed_at, None);
        assert_eq!(reopened.started_at, Some(now));
    }
}
