//! Rutas del motor de riesgo
//!
//! GET /vehicle/:id - evaluar riesgo actual de un vehículo
//! GET /trip/:id    - evaluar riesgo y proyección de llegada de un viaje

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::risk_controller::RiskController;
use crate::dto::risk_dto::{ApiResponse, TripRiskResponse, VehicleRiskResponse};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_risk_router() -> Router<AppState> {
    Router::new()
        .route("/vehicle/:id", get(vehicle_risk))
        .route("/trip/:id", get(trip_risk))
}

async fn vehicle_risk(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<VehicleRiskResponse>>> {
    let controller = RiskController::new(state.pool.clone());
    let response = controller.vehicle_risk(id).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn trip_risk(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<TripRiskResponse>>> {
    let controller = RiskController::new(state.pool.clone());
    let response = controller.trip_risk(id).await?;
    Ok(Json(ApiResponse::success(response)))
}
