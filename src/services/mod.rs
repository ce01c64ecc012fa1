//! Services module
//!
//! Este módulo contiene la lógica de negocio del motor de riesgo.
//! Los factores son funciones puras; los servicios orquestan las consultas,
//! suman puntos, clasifican y persisten el snapshot de auditoría.

pub mod risk_factors;
pub mod risk_scoring_service;
pub mod trip_forecast_service;

pub use risk_factors::*;
pub use risk_scoring_service::*;
pub use trip_forecast_service::*;
