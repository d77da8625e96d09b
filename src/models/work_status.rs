//! Modelo de WorkStatus
//!
//! Tabla fija de etapas del flujo de una orden de servicio.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Ids sembrados por la migración inicial
pub const STATUS_RECIBIDO: i32 = 1;
pub const STATUS_COTIZADO: i32 = 2;
pub const STATUS_EN_PROCESO: i32 = 3;
pub const STATUS_TERMINADO: i32 = 4;
pub const STATUS_RECHAZADO: i32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkStatus {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub order_index: i32,
}
