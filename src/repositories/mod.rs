//! Repositorios: acceso a PostgreSQL por entidad
//!
//! Los métodos `*_in` reciben una conexión para poder componerse dentro de
//! una transacción.

pub mod appointment_repository;
pub mod branch_repository;
pub mod client_repository;
pub mod mechanic_repository;
pub mod opportunity_repository;
pub mod role_repository;
pub mod service_repository;
pub mod user_repository;
pub mod vehicle_repository;
pub mod work_status_repository;
