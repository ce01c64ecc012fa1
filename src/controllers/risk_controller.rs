//! Controller del motor de riesgo
//!
//! Capa fina entre las rutas HTTP y los servicios de scoring: construye
//! los servicios con el repositorio sqlx y convierte los resultados a DTOs.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::risk_dto::{TripRiskResponse, VehicleRiskResponse};
use crate::repositories::SqlxRiskRepository;
use crate::services::{RiskScoringService, TripForecastService};
use crate::utils::errors::AppResult;

pub struct RiskController {
    scoring: RiskScoringService,
    forecast: TripForecastService,
}

impl RiskController {
    pub fn new(pool: PgPool) -> Self {
        let repo = Arc::new(SqlxRiskRepository::new(pool));
        Self {
            scoring: RiskScoringService::new(repo.clone()),
            forecast: TripForecastService::new(repo),
        }
    }

    pub async fn vehicle_risk(&self, vehicle_id: Uuid) -> AppResult<VehicleRiskResponse> {
        let score = self.scoring.compute_vehicle_risk(vehicle_id).await?;
        Ok(score.into())
    }

    pub async fn trip_risk(&self, trip_id: Uuid) -> AppResult<TripRiskResponse> {
        let forecast = self.forecast.compute_trip_risk(trip_id).await?;
        Ok(forecast.into())
    }
}
