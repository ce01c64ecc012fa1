//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle del monitoreo de cadena de frío.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq)]
#[sqlx(type_name = "vehicle_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Active,
    Idle,
    Maintenance,
    Retired,
}

/// Vehicle refrigerado - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub license_plate: String,
    pub vehicle_status: VehicleStatus,
    /// Última temperatura reportada por el sensor de carga
    pub current_temp: Option<f64>,
    /// Rango aceptable de temperatura para la carga actual
    pub min_temp: f64,
    pub max_temp: f64,
    pub last_telemetry_at: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    /// Rango aceptable `[min_temp, max_temp]`. Invariante: min_temp <= max_temp.
    pub fn acceptable_range(&self) -> (f64, f64) {
        (self.min_temp, self.max_temp)
    }
}
