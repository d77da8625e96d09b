//! DTOs de entrada y salida de la API
//!
//! Requests validados con `validator` y el sobre de respuesta común.

pub mod appointment_dto;
pub mod auth_dto;
pub mod branch_dto;
pub mod client_dto;
pub mod common_dto;
pub mod mechanic_dto;
pub mod opportunity_dto;
pub mod reception_dto;
pub mod role_dto;
pub mod service_dto;
pub mod user_dto;
pub mod vehicle_dto;

pub use common_dto::{ApiResponse, Pagination, PaginationMeta};
