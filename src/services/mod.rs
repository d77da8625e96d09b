//! Services module
//!
//! Este módulo contiene la lógica de negocio compartida por los controllers:
//! permisos por rol, reglas del flujo de estados, cálculo de comisiones y
//! el cache de catálogos.

pub mod authorization_service;
pub mod commission;
pub mod lookup_cache;
pub mod status_rules;
