//! Modelos de telemetría
//!
//! Lecturas de sensores y alertas, a nivel de vehículo y a nivel de viaje.
//! Todas las tablas de lecturas son append-only: nunca se mutan desde aquí.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Severidad de alerta - mapea al ENUM alert_severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "alert_severity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    Warning,
    Info,
}

/// Lectura de sensor de un vehículo (temperatura + humedad + GPS)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SensorReading {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub temperature: f64,
    pub humidity: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

impl SensorReading {
    /// Coordenadas GPS si la lectura las trae completas
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Alerta a nivel de vehículo
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Alert {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub severity: AlertSeverity,
    pub message: Option<String>,
    pub is_resolved: bool,
    pub created_at: DateTime<Utc>,
}

/// Lectura de temperatura registrada durante un viaje
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TripReading {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub vehicle_id: Uuid,
    pub temperature: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Violación registrada durante un viaje (distinta de Alert de vehículo)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TripAlert {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub severity: AlertSeverity,
    pub message: Option<String>,
    pub is_resolved: bool,
    pub created_at: DateTime<Utc>,
}
