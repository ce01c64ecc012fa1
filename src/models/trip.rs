//! Modelo de Trip
//!
//! Un viaje refrigerado asociado a un vehículo. Los agregados de temperatura
//! (avg/min/max_temp_recorded) los mantiene el proceso de ciclo de vida del
//! viaje, no este servicio: aquí solo se leen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del viaje - mapea al ENUM trip_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "trip_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Planned,
    Active,
    Completed,
    Failed,
}

/// Trip principal - mapea exactamente a la tabla trips
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub trip_status: TripStatus,
    pub cargo_type: Option<String>,
    pub planned_start: Option<DateTime<Utc>>,
    pub planned_end: Option<DateTime<Utc>>,
    pub actual_start: Option<DateTime<Utc>>,
    pub actual_end: Option<DateTime<Utc>>,
    pub avg_temp_recorded: Option<f64>,
    pub min_temp_recorded: Option<f64>,
    pub max_temp_recorded: Option<f64>,
    pub temp_violation_count: i32,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    pub fn is_active(&self) -> bool {
        self.trip_status == TripStatus::Active
    }
}
