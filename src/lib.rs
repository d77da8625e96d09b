//! Backend de taller mecánico multi-sucursal
//!
//! Expone la API REST de clientes, vehículos, mecánicos, órdenes de servicio,
//! citas, oportunidades y recepción de vehículos.

pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app;
pub use state::AppState;
