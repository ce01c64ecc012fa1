//! Calculadoras de factores de riesgo
//!
//! Cada factor es una función pura y sin estado: recibe datos ya
//! consultados más parámetros y devuelve puntos acotados por un cap fijo
//! junto con una razón legible (o ninguna). Cada punto del score total
//! tiene que poder explicarse con una de estas razones.

use chrono::{DateTime, Utc};

use crate::models::{AlertCounts, SensorReading, SensorStats, Trip, TripAlertCounts, TripReading};
use crate::utils::geo::cumulative_distance_km;

/// Caps por factor (vehículo)
pub const TEMP_VARIANCE_CAP: f64 = 25.0;
pub const ALERT_DENSITY_CAP: f64 = 30.0;
pub const STALENESS_CAP: f64 = 20.0;
pub const MOVEMENT_CAP: f64 = 25.0;

/// Caps por factor (viaje)
pub const TEMP_DEVIATION_CAP: f64 = 30.0;
pub const VIOLATION_CAP: f64 = 25.0;
pub const DELAY_CAP: f64 = 25.0;
pub const SPIKE_CAP: f64 = 20.0;

/// Salto entre lecturas consecutivas que cuenta como spike (°C)
pub const SPIKE_THRESHOLD_C: f64 = 3.0;

/// Contribución de un factor al score total
#[derive(Debug, Clone, PartialEq)]
pub struct FactorScore {
    pub points: f64,
    pub reason: Option<String>,
}

impl FactorScore {
    fn silent(points: f64) -> Self {
        Self {
            points,
            reason: None,
        }
    }

    fn with_reason(points: f64, reason: String) -> Self {
        Self {
            points,
            reason: Some(reason),
        }
    }
}

// ---------------------------------------------------------------------------
// Factores de vehículo
// ---------------------------------------------------------------------------

/// Varianza de temperatura sobre la ventana de 6h (cap 25).
///
/// Sin lecturas devuelve un score bajo deliberado de 5: es un default de
/// baja confianza, no un error. Las dos ramas de escala se encuentran con
/// un escalón en range=5; se conserva tal cual (ver tests).
pub fn temperature_variance_factor(stats: &SensorStats) -> FactorScore {
    if stats.reading_count == 0 {
        return FactorScore::with_reason(
            5.0,
            "No recent telemetry in the last 6 hours".to_string(),
        );
    }

    let min = stats.min_temp.unwrap_or(0.0);
    let max = stats.max_temp.unwrap_or(0.0);
    let stddev = stats.stddev_temp.unwrap_or(0.0);
    let range = max - min;

    let mut points = if range > 10.0 {
        TEMP_VARIANCE_CAP
    } else if range > 5.0 {
        (range / 10.0 * 25.0).round()
    } else {
        (range / 10.0 * 15.0).round()
    };

    if stddev > 3.0 {
        points = (points + 5.0).min(TEMP_VARIANCE_CAP);
    }

    let reason = if points >= 15.0 {
        Some(format!(
            "High temperature variance: {:.1}°C range over the last 6h (stddev {:.2}°C)",
            range, stddev
        ))
    } else if points >= 8.0 {
        Some(format!(
            "Moderate temperature variance: {:.1}°C range over the last 6h",
            range
        ))
    } else {
        None
    };

    FactorScore { points, reason }
}

/// Densidad de alertas en la ventana de 24h (cap 30).
/// Cuentan todas las alertas, resueltas o no.
pub fn alert_density_factor(counts: &AlertCounts) -> FactorScore {
    let points = ((counts.critical * 6 + counts.warning * 3) as f64).min(ALERT_DENSITY_CAP);

    if counts.total() == 0 {
        return FactorScore::silent(points);
    }

    FactorScore::with_reason(
        points,
        format!(
            "{} alert(s) in the last 24h: {} critical, {} warning, {} info",
            counts.total(),
            counts.critical,
            counts.warning,
            counts.info
        ),
    )
}

/// Antigüedad de la última telemetría (cap 20).
pub fn data_staleness_factor(
    last_telemetry_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> FactorScore {
    let last = match last_telemetry_at {
        Some(ts) => ts,
        None => {
            return FactorScore::with_reason(
                STALENESS_CAP,
                "No telemetry has ever been received from this vehicle".to_string(),
            )
        }
    };

    let minutes = (now - last).num_minutes().max(0);

    let points = if minutes > 60 {
        20.0
    } else if minutes > 30 {
        15.0
    } else if minutes > 15 {
        10.0
    } else if minutes > 5 {
        5.0
    } else {
        0.0
    };

    let reason = if points >= 10.0 {
        Some(format!("No telemetry updates for {} minutes", minutes))
    } else {
        None
    };

    FactorScore { points, reason }
}

/// Anomalía de movimiento sobre puntos GPS de la ventana de 6h (cap 25).
///
/// `readings` llega ordenado ascendente por tiempo; la distancia se acumula
/// por pares consecutivos con Haversine.
pub fn movement_anomaly_factor(readings: &[SensorReading]) -> FactorScore {
    let coords: Vec<(f64, f64)> = readings.iter().filter_map(|r| r.coordinates()).collect();

    if coords.len() < 2 {
        if coords.is_empty() {
            return FactorScore::with_reason(5.0, "No GPS data in the last 6 hours".to_string());
        }
        return FactorScore::silent(5.0);
    }

    let distance_km = cumulative_distance_km(&coords);

    if distance_km > 500.0 {
        return FactorScore::with_reason(
            MOVEMENT_CAP,
            format!(
                "Unusual distance covered: {:.1} km in the last 6 hours",
                distance_km
            ),
        );
    }

    if distance_km > 300.0 {
        return FactorScore::with_reason(
            15.0,
            format!(
                "Unusual distance covered: {:.1} km in the last 6 hours",
                distance_km
            ),
        );
    }

    if distance_km < 1.0 && readings.len() > 10 {
        return FactorScore::with_reason(
            10.0,
            format!(
                "Vehicle stationary ({:.2} km) despite {} active sensor readings",
                distance_km,
                readings.len()
            ),
        );
    }

    FactorScore::silent((distance_km / 500.0 * 10.0).round())
}

// ---------------------------------------------------------------------------
// Factores de viaje
// ---------------------------------------------------------------------------

/// Desviación de la temperatura media del viaje fuera del rango aceptable
/// (cap 30). `range` es `(min_temp, max_temp)` del vehículo o el rango por
/// defecto si el vehículo no está disponible.
pub fn temperature_deviation_factor(
    avg_temp_recorded: Option<f64>,
    range: (f64, f64),
) -> FactorScore {
    let avg = match avg_temp_recorded {
        Some(v) => v,
        None => {
            return FactorScore::with_reason(5.0, "No trip readings recorded yet".to_string())
        }
    };

    let (min_temp, max_temp) = range;

    if avg >= min_temp && avg <= max_temp {
        // Dentro de rango: solo se puntúa la cercanía al borde
        let width = max_temp - min_temp;
        let edge_distance = (avg - min_temp).min(max_temp - avg);

        if width > 0.0 && edge_distance < width * 0.10 {
            return FactorScore::with_reason(
                10.0,
                format!(
                    "Average temperature {:.1}°C is within {:.1}°C of the acceptable limit",
                    avg, edge_distance
                ),
            );
        }
        return FactorScore::silent(0.0);
    }

    let (deviation, bound_desc, bound) = if avg > max_temp {
        (avg - max_temp, "above the maximum", max_temp)
    } else {
        (min_temp - avg, "below the minimum", min_temp)
    };

    let points = if deviation > 5.0 {
        TEMP_DEVIATION_CAP
    } else if deviation > 2.0 {
        (deviation / 5.0 * 30.0).round()
    } else {
        (deviation / 5.0 * 15.0).round()
    };

    FactorScore::with_reason(
        points,
        format!(
            "Average temperature {:.1}°C is {:.1}°C {} of {:.1}°C",
            avg, deviation, bound_desc, bound
        ),
    )
}

/// Conteo de violaciones del viaje (cap 25). Las no resueltas pesan más.
pub fn violation_count_factor(counts: &TripAlertCounts) -> FactorScore {
    let points = ((counts.unresolved * 5 + counts.resolved * 2) as f64).min(VIOLATION_CAP);

    if counts.total() == 0 {
        return FactorScore::silent(points);
    }

    FactorScore::with_reason(
        points,
        format!(
            "{} temperature violation(s) on this trip ({} unresolved, {} resolved)",
            counts.total(),
            counts.unresolved,
            counts.resolved
        ),
    )
}

/// Retraso del viaje frente a su fin planificado (cap 25).
///
/// Devuelve también los minutos de retraso en bruto, que el forecaster
/// usa para proyectar la hora de llegada.
pub fn delay_factor(trip: &Trip, now: DateTime<Utc>) -> (FactorScore, i64) {
    let delay_minutes = if trip.is_active() {
        trip.planned_end
            .map(|planned| (now - planned).num_minutes().max(0))
            .unwrap_or(0)
    } else {
        match (trip.actual_end, trip.planned_end) {
            (Some(actual), Some(planned)) if actual > planned => {
                (actual - planned).num_minutes()
            }
            _ => 0,
        }
    };

    let points = if delay_minutes > 120 {
        DELAY_CAP
    } else if delay_minutes > 60 {
        20.0
    } else if delay_minutes > 30 {
        15.0
    } else if delay_minutes > 10 {
        (delay_minutes as f64 / 60.0 * 15.0).round()
    } else {
        0.0
    };

    let score = if delay_minutes > 0 {
        FactorScore::with_reason(
            points,
            format!("Trip is delayed by {} minutes", delay_minutes),
        )
    } else {
        FactorScore::silent(points)
    };

    (score, delay_minutes)
}

/// Spikes de temperatura entre lecturas consecutivas del viaje (cap 20).
pub fn temperature_spike_factor(readings: &[TripReading]) -> FactorScore {
    let mut spike_count: u32 = 0;
    let mut max_jump: f64 = 0.0;

    for pair in readings.windows(2) {
        let jump = (pair[1].temperature - pair[0].temperature).abs();
        if jump > SPIKE_THRESHOLD_C {
            spike_count += 1;
            if jump > max_jump {
                max_jump = jump;
            }
        }
    }

    if spike_count == 0 {
        return FactorScore::silent(0.0);
    }

    let mut points = if spike_count > 10 {
        SPIKE_CAP
    } else if spike_count > 5 {
        15.0
    } else {
        (spike_count as f64 / 5.0 * 10.0).round()
    };

    if max_jump > 10.0 {
        points = (points + 5.0).min(SPIKE_CAP);
    }

    FactorScore::with_reason(
        points,
        format!(
            "{} temperature spike(s) detected (max jump {:.1}°C)",
            spike_count, max_jump
        ),
    )
}

// ---------------------------------------------------------------------------
// Agregación
// ---------------------------------------------------------------------------

/// Suma de factores, redondeada y acotada a [0, 100]
pub fn total_score(factors: &[&FactorScore]) -> i32 {
    let sum: f64 = factors.iter().map(|f| f.points).sum();
    (sum.round() as i32).clamp(0, 100)
}

/// Razón por defecto cuando ningún factor aportó ninguna
pub const DEFAULT_REASON: &str = "All metrics within normal range";
