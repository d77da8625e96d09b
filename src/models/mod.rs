//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean al schema
//! PostgreSQL. Los campos se exponen en camelCase hacia el frontend.

pub mod appointment;
pub mod branch;
pub mod client;
pub mod mechanic;
pub mod opportunity;
pub mod role;
pub mod service;
pub mod user;
pub mod vehicle;
pub mod work_status;
