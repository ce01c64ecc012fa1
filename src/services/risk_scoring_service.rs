//! Servicio de scoring de riesgo de vehículos
//!
//! Orquesta los cuatro factores de vehículo: varianza de temperatura,
//! densidad de alertas, antigüedad de telemetría y anomalía de movimiento.
//! Cada invocación persiste un snapshot nuevo y devuelve score, nivel y
//! razones. Si cualquier consulta falla, el scoring completo se aborta y
//! no se escribe nada.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{RiskLevel, VehicleRiskSnapshot};
use crate::repositories::RiskDataAccess;
use crate::services::risk_factors::{
    alert_density_factor, data_staleness_factor, movement_anomaly_factor, temperature_variance_factor,
    total_score, FactorScore, DEFAULT_REASON,
};
use crate::utils::errors::{not_found_error, AppError};

/// Ventana de telemetría para varianza y movimiento
const TELEMETRY_WINDOW_HOURS: i64 = 6;
/// Ventana de alertas
const ALERT_WINDOW_HOURS: i64 = 24;
/// Máximo de puntos GPS considerados por invocación
const MAX_SENSOR_READINGS: i64 = 500;

/// Resultado de una evaluación de riesgo de vehículo
#[derive(Debug, Clone, Serialize)]
pub struct VehicleRiskScore {
    pub vehicle_id: Uuid,
    pub risk_score: i32,
    pub risk_level: RiskLevel,
    pub reasons: Vec<String>,
    pub calculated_at: DateTime<Utc>,
}

pub struct RiskScoringService {
    repo: Arc<dyn RiskDataAccess>,
}

impl RiskScoringService {
    /// El acceso a datos se inyecta explícitamente; el servicio no guarda
    /// ningún otro estado.
    pub fn new(repo: Arc<dyn RiskDataAccess>) -> Self {
        Self { repo }
    }

    /// Evalúa el riesgo actual de un vehículo y persiste el snapshot.
    pub async fn compute_vehicle_risk(&self, vehicle_id: Uuid) -> Result<VehicleRiskScore, AppError> {
        let vehicle = self
            .repo
            .get_vehicle(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))?;

        let now = Utc::now();
        let telemetry_since = now - Duration::hours(TELEMETRY_WINDOW_HOURS);
        let alerts_since = now - Duration::hours(ALERT_WINDOW_HOURS);

        // Las tres consultas son independientes entre sí: fan-out
        let (stats, alert_counts, readings) = tokio::try_join!(
            self.repo.sensor_stats(vehicle_id, telemetry_since),
            self.repo.count_alerts_by_severity(vehicle_id, alerts_since),
            self.repo
                .list_sensor_readings(vehicle_id, telemetry_since, MAX_SENSOR_READINGS),
        )?;

        let variance = temperature_variance_factor(&stats);
        let alerts = alert_density_factor(&alert_counts);
        let staleness = data_staleness_factor(vehicle.last_telemetry_at, now);
        let movement = movement_anomaly_factor(&readings);

        let factors = [&variance, &alerts, &staleness, &movement];
        let risk_score = total_score(&factors);
        let risk_level = RiskLevel::from_score(risk_score);
        let reasons = collect_reasons(&factors);

        log::info!(
            "🧊 Vehicle {} scored {} ({}) - variance {} / alerts {} / staleness {} / movement {}",
            vehicle_id,
            risk_score,
            risk_level.as_str(),
            variance.points,
            alerts.points,
            staleness.points,
            movement.points
        );

        let snapshot =
            VehicleRiskSnapshot::new(vehicle_id, risk_score, risk_level, reasons.clone());
        self.repo.append_vehicle_snapshot(&snapshot).await?;

        Ok(VehicleRiskScore {
            vehicle_id,
            risk_score,
            risk_level,
            reasons,
            calculated_at: snapshot.calculated_at,
        })
    }
}

/// Recolecta las razones en el orden fijo de los factores; si ninguno
/// aportó una, se sintetiza la razón por defecto.
pub(crate) fn collect_reasons(factors: &[&FactorScore]) -> Vec<String> {
    let reasons: Vec<String> = factors
        .iter()
        .filter_map(|f| f.reason.clone())
        .collect();

    if reasons.is_empty() {
        vec![DEFAULT_REASON.to_string()]
    } else {
        reasons
    }
}
