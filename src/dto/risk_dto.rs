//! DTOs del motor de riesgo
//!
//! Respuestas de la API para las evaluaciones de riesgo de vehículos
//! y viajes.

use serde::Serialize;

use crate::services::{TripRiskForecast, VehicleRiskScore};

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }
}

/// Response de riesgo de vehículo
#[derive(Debug, Serialize)]
pub struct VehicleRiskResponse {
    pub vehicle_id: String,
    pub risk_score: i32,
    pub risk_level: String,
    pub reasons: Vec<String>,
    pub calculated_at: String,
}

impl From<VehicleRiskScore> for VehicleRiskResponse {
    fn from(score: VehicleRiskScore) -> Self {
        Self {
            vehicle_id: score.vehicle_id.to_string(),
            risk_score: score.risk_score,
            risk_level: score.risk_level.as_str().to_string(),
            reasons: score.reasons,
            calculated_at: score.calculated_at.to_rfc3339(),
        }
    }
}

/// Response de riesgo de viaje con proyección de llegada
#[derive(Debug, Serialize)]
pub struct TripRiskResponse {
    pub trip_id: String,
    pub risk_score: i32,
    pub risk_level: String,
    pub reasons: Vec<String>,
    pub predicted_completion: Option<String>,
    pub expected_delay_minutes: i64,
    pub calculated_at: String,
}

impl From<TripRiskForecast> for TripRiskResponse {
    fn from(forecast: TripRiskForecast) -> Self {
        Self {
            trip_id: forecast.trip_id.to_string(),
            risk_score: forecast.risk_score,
            risk_level: forecast.risk_level.as_str().to_string(),
            reasons: forecast.reasons,
            predicted_completion: forecast.predicted_completion.map(|t| t.to_rfc3339()),
            expected_delay_minutes: forecast.expected_delay_minutes,
            calculated_at: forecast.calculated_at.to_rfc3339(),
        }
    }
}
