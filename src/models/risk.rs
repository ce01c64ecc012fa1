//! Modelos del motor de riesgo
//!
//! Nivel de riesgo, agregados de telemetría y snapshots de auditoría.
//! Cada invocación del motor crea un snapshot nuevo; nunca se actualizan
//! ni se borran desde este servicio.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

/// Nivel de riesgo - mapea al ENUM risk_level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "risk_level", rename_all = "lowercase")]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Clasificación por umbrales fijos sobre el score ya acotado a [0, 100].
    /// LOW < 34, MEDIUM en [34, 67), HIGH >= 67.
    pub fn from_score(score: i32) -> Self {
        if score >= 67 {
            RiskLevel::High
        } else if score >= 34 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

/// Agregado de lecturas de sensor en una ventana de tiempo.
/// stddev es la desviación estándar POBLACIONAL (STDDEV_POP en SQL).
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct SensorStats {
    pub avg_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub stddev_temp: Option<f64>,
    pub reading_count: i64,
}

/// Conteo de alertas de vehículo por severidad en una ventana
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertCounts {
    pub critical: i64,
    pub warning: i64,
    pub info: i64,
}

impl AlertCounts {
    pub fn total(&self) -> i64 {
        self.critical + self.warning + self.info
    }
}

/// Conteo de violaciones de viaje, separadas por resolución
#[derive(Debug, Clone, Copy, Default)]
pub struct TripAlertCounts {
    pub unresolved: i64,
    pub resolved: i64,
}

impl TripAlertCounts {
    pub fn total(&self) -> i64 {
        self.unresolved + self.resolved
    }
}

/// Snapshot de riesgo de un vehículo (append-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleRiskSnapshot {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub risk_score: i32,
    pub risk_level: RiskLevel,
    pub reasons: Vec<String>,
    pub calculated_at: DateTime<Utc>,
}

impl VehicleRiskSnapshot {
    pub fn new(vehicle_id: Uuid, risk_score: i32, risk_level: RiskLevel, reasons: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_id,
            risk_score,
            risk_level,
            reasons,
            calculated_at: Utc::now(),
        }
    }
}

/// Snapshot de riesgo de un viaje, con proyección de llegada (append-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRiskSnapshot {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub risk_score: i32,
    pub risk_level: RiskLevel,
    pub reasons: Vec<String>,
    pub predicted_completion: Option<DateTime<Utc>>,
    pub expected_delay_minutes: i64,
    pub calculated_at: DateTime<Utc>,
}

impl TripRiskSnapshot {
    pub fn new(
        trip_id: Uuid,
        risk_score: i32,
        risk_level: RiskLevel,
        reasons: Vec<String>,
        predicted_completion: Option<DateTime<Utc>>,
        expected_delay_minutes: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            trip_id,
            risk_score,
            risk_level,
            reasons,
            predicted_completion,
            expected_delay_minutes,
            calculated_at: Utc::now(),
        }
    }
}
