//! Servicio de pronóstico de riesgo de viajes
//!
//! Orquesta los cuatro factores de viaje (desviación de temperatura,
//! violaciones, retraso y spikes) y proyecta la hora de llegada a partir
//! del retraso observado. Persiste un snapshot por invocación.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{RiskLevel, TripRiskSnapshot};
use crate::repositories::RiskDataAccess;
use crate::services::risk_factors::{
    delay_factor, temperature_deviation_factor, temperature_spike_factor, total_score,
    violation_count_factor,
};
use crate::services::risk_scoring_service::collect_reasons;
use crate::utils::errors::{not_found_error, AppError};

/// Rango aceptable por defecto cuando el vehículo del viaje no existe
const DEFAULT_ACCEPTABLE_RANGE: (f64, f64) = (-25.0, -15.0);
/// Máximo de lecturas de viaje consideradas por invocación
const MAX_TRIP_READINGS: i64 = 5000;

/// Resultado de una evaluación de riesgo de viaje con proyección de llegada
#[derive(Debug, Clone, Serialize)]
pub struct TripRiskForecast {
    pub trip_id: Uuid,
    pub risk_score: i32,
    pub risk_level: RiskLevel,
    pub reasons: Vec<String>,
    pub predicted_completion: Option<DateTime<Utc>>,
    pub expected_delay_minutes: i64,
    pub calculated_at: DateTime<Utc>,
}

pub struct TripForecastService {
    repo: Arc<dyn RiskDataAccess>,
}

impl TripForecastService {
    pub fn new(repo: Arc<dyn RiskDataAccess>) -> Self {
        Self { repo }
    }

    /// Evalúa el riesgo de un viaje, proyecta su hora de llegada y
    /// persiste el snapshot.
    pub async fn compute_trip_risk(&self, trip_id: Uuid) -> Result<TripRiskForecast, AppError> {
        let trip = self
            .repo
            .get_trip(trip_id)
            .await?
            .ok_or_else(|| not_found_error("Trip", &trip_id.to_string()))?;

        // El vehículo se consulta best-effort: si no existe se usa el
        // rango aceptable por defecto.
        let acceptable_range = self
            .repo
            .get_vehicle(trip.vehicle_id)
            .await?
            .map(|v| v.acceptable_range())
            .unwrap_or(DEFAULT_ACCEPTABLE_RANGE);

        let now = Utc::now();

        let (readings, violation_counts) = tokio::try_join!(
            self.repo.list_trip_readings(trip_id, MAX_TRIP_READINGS),
            self.repo.count_trip_alerts(trip_id),
        )?;

        let deviation = temperature_deviation_factor(trip.avg_temp_recorded, acceptable_range);
        let violations = violation_count_factor(&violation_counts);
        let (delay, delay_minutes) = delay_factor(&trip, now);
        let spikes = temperature_spike_factor(&readings);

        let factors = [&deviation, &violations, &delay, &spikes];
        let risk_score = total_score(&factors);
        let risk_level = RiskLevel::from_score(risk_score);
        let reasons = collect_reasons(&factors);

        // Proyección de llegada: viajes activos arrastran el retraso
        // observado sobre el fin planificado; los demás usan el fin real
        // si existe.
        let predicted_completion = if trip.is_active() {
            trip.planned_end
                .map(|planned| planned + Duration::minutes(delay_minutes))
        } else {
            trip.actual_end.or(trip.planned_end)
        };

        log::info!(
            "🚚 Trip {} scored {} ({}) - delay {} min, predicted completion {:?}",
            trip_id,
            risk_score,
            risk_level.as_str(),
            delay_minutes,
            predicted_completion
        );

        let snapshot = TripRiskSnapshot::new(
            trip_id,
            risk_score,
            risk_level,
            reasons.clone(),
            predicted_completion,
            delay_minutes,
        );
        self.repo.append_trip_snapshot(&snapshot).await?;

        Ok(TripRiskForecast {
            trip_id,
            risk_score,
            risk_level,
            reasons,
            predicted_completion,
            expected_delay_minutes: delay_minutes,
            calculated_at: snapshot.calculated_at,
        })
    }
}
