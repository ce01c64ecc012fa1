//! Repositories module
//!
//! Acceso a datos del motor de riesgo. El trait `RiskDataAccess` es la
//! frontera inyectable que consumen los servicios de scoring; la
//! implementación sqlx vive en `risk_repository`.

pub mod risk_repository;

pub use risk_repository::{RiskDataAccess, SqlxRiskRepository};
