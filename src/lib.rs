//! Cold-chain fleet risk monitoring backend
//!
//! Motor de scoring de riesgo para vehículos refrigerados y sus viajes:
//! factores deterministas y explicables sobre telemetría, alertas y GPS,
//! con snapshot de auditoría por cada cómputo.

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
