//! Controladores: reglas de negocio por recurso
//!
//! Cada controlador se construye por request a partir del pool o del estado
//! y delega el acceso a datos en los repositorios.

pub mod appointment_controller;
pub mod auth_controller;
pub mod branch_controller;
pub mod client_controller;
pub mod mechanic_controller;
pub mod opportunity_controller;
pub mod reception_controller;
pub mod role_controller;
pub mod service_controller;
pub mod user_controller;
pub mod vehicle_controller;
pub mod work_status_controller;
