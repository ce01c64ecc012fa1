//! Tests de integración del motor de riesgo
//!
//! Ejercitan los servicios de scoring contra un repositorio en memoria,
//! verificando determinismo, semántica NotFound (sin escrituras) y los
//! escenarios extremo a extremo.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use coldchain_monitor::models::{
    AlertCounts, RiskLevel, SensorReading, SensorStats, Trip, TripAlertCounts, TripReading,
    TripRiskSnapshot, TripStatus, Vehicle, VehicleRiskSnapshot, VehicleStatus,
};
use coldchain_monitor::repositories::RiskDataAccess;
use coldchain_monitor::services::{RiskScoringService, TripForecastService};
use coldchain_monitor::utils::errors::AppError;

/// Repositorio en memoria con contadores de escritura
#[derive(Default)]
struct MockRepository {
    vehicle: Option<Vehicle>,
    trip: Option<Trip>,
    stats: SensorStats,
    alert_counts: AlertCounts,
    readings: Vec<SensorReading>,
    trip_readings: Vec<TripReading>,
    trip_alert_counts: TripAlertCounts,
    vehicle_snapshots: Mutex<Vec<VehicleRiskSnapshot>>,
    trip_snapshots: Mutex<Vec<TripRiskSnapshot>>,
    write_count: AtomicUsize,
}

impl MockRepository {
    fn writes(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RiskDataAccess for MockRepository {
    async fn get_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        Ok(self.vehicle.clone().filter(|v| v.id == id))
    }

    async fn get_trip(&self, id: Uuid) -> Result<Option<Trip>, AppError> {
        Ok(self.trip.clone().filter(|t| t.id == id))
    }

    async fn sensor_stats(
        &self,
        _vehicle_id: Uuid,
        _since: DateTime<Utc>,
    ) -> Result<SensorStats, AppError> {
        Ok(self.stats.clone())
    }

    async fn list_sensor_readings(
        &self,
        _vehicle_id: Uuid,
        _since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<SensorReading>, AppError> {
        Ok(self
            .readings
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_alerts_by_severity(
        &self,
        _vehicle_id: Uuid,
        _since: DateTime<Utc>,
    ) -> Result<AlertCounts, AppError> {
        Ok(self.alert_counts)
    }

    async fn list_trip_readings(
        &self,
        _trip_id: Uuid,
        limit: i64,
    ) -> Result<Vec<TripReading>, AppError> {
        Ok(self
            .trip_readings
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_trip_alerts(&self, _trip_id: Uuid) -> Result<TripAlertCounts, AppError> {
        Ok(self.trip_alert_counts)
    }

    async fn append_vehicle_snapshot(
        &self,
        snapshot: &VehicleRiskSnapshot,
    ) -> Result<(), AppError> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        self.vehicle_snapshots.lock().unwrap().push(snapshot.clone());
        Ok(())
    }

    async fn append_trip_snapshot(&self, snapshot: &TripRiskSnapshot) -> Result<(), AppError> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        self.trip_snapshots.lock().unwrap().push(snapshot.clone());
        Ok(())
    }
}

fn frozen_vehicle(id: Uuid, last_telemetry_minutes_ago: i64) -> Vehicle {
    Vehicle {
        id,
        license_plate: "AB-123-CD".to_string(),
        vehicle_status: VehicleStatus::Active,
        current_temp: Some(-18.0),
        min_temp: -25.0,
        max_temp: -15.0,
        last_telemetry_at: Some(Utc::now() - Duration::minutes(last_telemetry_minutes_ago)),
        latitude: Some(48.8566),
        longitude: Some(2.3522),
        created_at: Utc::now() - Duration::days(30),
    }
}

fn trip_for(vehicle_id: Uuid, status: TripStatus) -> Trip {
    Trip {
        id: Uuid::new_v4(),
        vehicle_id,
        trip_status: status,
        cargo_type: Some("frozen".to_string()),
        planned_start: Some(Utc::now() - Duration::hours(6)),
        planned_end: Some(Utc::now() + Duration::hours(2)),
        actual_start: Some(Utc::now() - Duration::hours(6)),
        actual_end: None,
        avg_temp_recorded: Some(-20.0),
        min_temp_recorded: Some(-22.0),
        max_temp_recorded: Some(-17.0),
        temp_violation_count: 0,
        created_at: Utc::now() - Duration::days(1),
    }
}

fn gps_reading(vehicle_id: Uuid, lat: f64, lon: f64, minutes_ago: i64) -> SensorReading {
    SensorReading {
        id: Uuid::new_v4(),
        vehicle_id,
        temperature: -18.0,
        humidity: Some(60.0),
        latitude: Some(lat),
        longitude: Some(lon),
        recorded_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

// ---------------------------------------------------------------------------
// Riesgo de vehículo
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_unknown_vehicle_not_found_and_nothing_persisted() {
    let repo = Arc::new(MockRepository::default());
    let service = RiskScoringService::new(repo.clone());

    let result = service.compute_vehicle_risk(Uuid::new_v4()).await;

    match result {
        Err(AppError::NotFound(msg)) => {
            assert!(msg.contains("Vehicle"));
            assert!(msg.contains("not found"));
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert_eq!(repo.writes(), 0);
}

#[tokio::test]
async fn test_healthy_vehicle_scores_low_with_default_reason() {
    let vehicle_id = Uuid::new_v4();
    let mut repo = MockRepository::default();
    repo.vehicle = Some(frozen_vehicle(vehicle_id, 2));
    repo.stats = SensorStats {
        avg_temp: Some(-18.0),
        min_temp: Some(-19.0),
        max_temp: Some(-17.0),
        stddev_temp: Some(0.5),
        reading_count: 24,
    };
    // Recorrido normal de reparto: ~39 km en la ventana
    repo.readings = vec![
        gps_reading(vehicle_id, 48.8566, 2.3522, 120),
        gps_reading(vehicle_id, 49.2083, 2.3522, 10),
    ];
    let repo = Arc::new(repo);
    let service = RiskScoringService::new(repo.clone());

    let score = service.compute_vehicle_risk(vehicle_id).await.unwrap();

    assert!(score.risk_score < 34, "score was {}", score.risk_score);
    assert_eq!(score.risk_level, RiskLevel::Low);
    assert_eq!(score.reasons, vec!["All metrics within normal range"]);
    assert_eq!(repo.writes(), 1);
}

#[tokio::test]
async fn test_degraded_vehicle_scores_high_end_to_end() {
    // Vehículo con rango [-25, -15]: telemetría de hace 2 horas, 3 alertas
    // críticas en 24h, lecturas cubriendo un rango de 12°C en 6h y GPS
    // estacionario con 11 lecturas.
    let vehicle_id = Uuid::new_v4();
    let mut repo = MockRepository::default();
    repo.vehicle = Some(frozen_vehicle(vehicle_id, 120));
    repo.stats = SensorStats {
        avg_temp: Some(-16.0),
        min_temp: Some(-22.0),
        max_temp: Some(-10.0),
        stddev_temp: Some(4.0),
        reading_count: 40,
    };
    repo.alert_counts = AlertCounts {
        critical: 3,
        warning: 0,
        info: 0,
    };
    let mut readings: Vec<SensorReading> = (0..10)
        .map(|i| gps_reading(vehicle_id, 48.8566, 2.3522, 300 - i * 20))
        .collect();
    readings.push(gps_reading(vehicle_id, 48.8570, 2.3522, 5));
    repo.readings = readings;
    let repo = Arc::new(repo);
    let service = RiskScoringService::new(repo.clone());

    let score = service.compute_vehicle_risk(vehicle_id).await.unwrap();

    // variance 25 + alerts 18 + staleness 20 + movement 10 = 73
    assert_eq!(score.risk_score, 73);
    assert_eq!(score.risk_level, RiskLevel::High);
    assert_eq!(score.reasons.len(), 4);

    let snapshots = repo.vehicle_snapshots.lock().unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].risk_score, 73);
    assert_eq!(snapshots[0].vehicle_id, vehicle_id);
    assert_eq!(snapshots[0].reasons, score.reasons);
}

#[tokio::test]
async fn test_vehicle_scoring_is_deterministic() {
    let vehicle_id = Uuid::new_v4();
    let mut repo = MockRepository::default();
    repo.vehicle = Some(frozen_vehicle(vehicle_id, 45));
    repo.stats = SensorStats {
        avg_temp: Some(-18.0),
        min_temp: Some(-21.0),
        max_temp: Some(-13.0),
        stddev_temp: Some(2.1),
        reading_count: 30,
    };
    repo.alert_counts = AlertCounts {
        critical: 1,
        warning: 2,
        info: 0,
    };
    let repo = Arc::new(repo);
    let service = RiskScoringService::new(repo.clone());

    let first = service.compute_vehicle_risk(vehicle_id).await.unwrap();
    let second = service.compute_vehicle_risk(vehicle_id).await.unwrap();

    assert_eq!(first.risk_score, second.risk_score);
    assert_eq!(first.risk_level, second.risk_level);
    assert_eq!(first.reasons, second.reasons);

    // Dos invocaciones = dos snapshots independientes
    let snapshots = repo.vehicle_snapshots.lock().unwrap();
    assert_eq!(snapshots.len(), 2);
    assert_ne!(snapshots[0].id, snapshots[1].id);
    assert_eq!(snapshots[0].risk_score, snapshots[1].risk_score);
}

#[tokio::test]
async fn test_vehicle_score_always_bounded() {
    // Todos los factores al máximo: la suma de caps es 100 y el score
    // queda acotado ahí.
    let vehicle_id = Uuid::new_v4();
    let mut repo = MockRepository::default();
    let mut vehicle = frozen_vehicle(vehicle_id, 600);
    vehicle.last_telemetry_at = None;
    repo.vehicle = Some(vehicle);
    repo.stats = SensorStats {
        avg_temp: Some(-10.0),
        min_temp: Some(-25.0),
        max_temp: Some(-5.0),
        stddev_temp: Some(6.0),
        reading_count: 100,
    };
    repo.alert_counts = AlertCounts {
        critical: 20,
        warning: 10,
        info: 5,
    };
    // Madrid -> Paris, muy por encima de 500 km
    repo.readings = vec![
        gps_reading(vehicle_id, 40.4168, -3.7038, 350),
        gps_reading(vehicle_id, 48.8566, 2.3522, 5),
    ];
    let repo = Arc::new(repo);
    let service = RiskScoringService::new(repo.clone());

    let score = service.compute_vehicle_risk(vehicle_id).await.unwrap();

    assert_eq!(score.risk_score, 100);
    assert_eq!(score.risk_level, RiskLevel::High);
}

// ---------------------------------------------------------------------------
// Riesgo de viaje
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_unknown_trip_not_found_and_nothing_persisted() {
    let repo = Arc::new(MockRepository::default());
    let service = TripForecastService::new(repo.clone());

    let result = service.compute_trip_risk(Uuid::new_v4()).await;

    match result {
        Err(AppError::NotFound(msg)) => {
            assert!(msg.contains("Trip"));
            assert!(msg.contains("not found"));
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert_eq!(repo.writes(), 0);
}

#[tokio::test]
async fn test_on_time_completed_trip_scores_zero() {
    let vehicle_id = Uuid::new_v4();
    let mut repo = MockRepository::default();
    repo.vehicle = Some(frozen_vehicle(vehicle_id, 10));

    let mut trip = trip_for(vehicle_id, TripStatus::Completed);
    let end = Utc::now() - Duration::hours(3);
    trip.planned_end = Some(end);
    trip.actual_end = Some(end);
    let trip_id = trip.id;
    repo.trip = Some(trip);
    let repo = Arc::new(repo);
    let service = TripForecastService::new(repo.clone());

    let forecast = service.compute_trip_risk(trip_id).await.unwrap();

    assert_eq!(forecast.risk_score, 0);
    assert_eq!(forecast.risk_level, RiskLevel::Low);
    assert_eq!(forecast.expected_delay_minutes, 0);
    assert_eq!(forecast.predicted_completion, Some(end));
    assert_eq!(forecast.reasons, vec!["All metrics within normal range"]);
    assert_eq!(repo.writes(), 1);
}

#[tokio::test]
async fn test_delayed_active_trip_projects_completion() {
    let vehicle_id = Uuid::new_v4();
    let mut repo = MockRepository::default();
    repo.vehicle = Some(frozen_vehicle(vehicle_id, 10));

    let mut trip = trip_for(vehicle_id, TripStatus::Active);
    let planned_end = Utc::now() - Duration::minutes(90);
    trip.planned_end = Some(planned_end);
    trip.avg_temp_recorded = Some(-12.0); // 3°C por encima del máximo
    let trip_id = trip.id;
    repo.trip = Some(trip);
    repo.trip_alert_counts = TripAlertCounts {
        unresolved: 2,
        resolved: 0,
    };
    let repo = Arc::new(repo);
    let service = TripForecastService::new(repo.clone());

    let forecast = service.compute_trip_risk(trip_id).await.unwrap();

    // deviation 18 + violations 10 + delay 20 + spikes 0 = 48
    assert_eq!(forecast.risk_score, 48);
    assert_eq!(forecast.risk_level, RiskLevel::Medium);
    assert_eq!(forecast.expected_delay_minutes, 90);
    assert_eq!(
        forecast.predicted_completion,
        Some(planned_end + Duration::minutes(90))
    );
    assert_eq!(forecast.reasons.len(), 3);

    let snapshots = repo.trip_snapshots.lock().unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].expected_delay_minutes, 90);
    assert_eq!(snapshots[0].predicted_completion, forecast.predicted_completion);
}

#[tokio::test]
async fn test_trip_without_vehicle_uses_default_range() {
    // El vehículo del viaje no existe: el rango aceptable cae al
    // [-25, -15] por defecto y la desviación se mide contra él.
    let mut repo = MockRepository::default();
    let mut trip = trip_for(Uuid::new_v4(), TripStatus::Active);
    trip.planned_end = Some(Utc::now() + Duration::hours(1));
    trip.avg_temp_recorded = Some(-10.0); // 5°C por encima del máximo por defecto
    let trip_id = trip.id;
    repo.trip = Some(trip);
    let repo = Arc::new(repo);
    let service = TripForecastService::new(repo.clone());

    let forecast = service.compute_trip_risk(trip_id).await.unwrap();

    // deviation 5 -> no > 5 -> round(5/5*30) = 30
    assert_eq!(forecast.risk_score, 30);
    assert!(forecast.reasons[0].contains("above the maximum"));
}

#[tokio::test]
async fn test_trip_spikes_feed_score_and_reasons() {
    let vehicle_id = Uuid::new_v4();
    let mut repo = MockRepository::default();
    repo.vehicle = Some(frozen_vehicle(vehicle_id, 10));

    let mut trip = trip_for(vehicle_id, TripStatus::Active);
    trip.planned_end = Some(Utc::now() + Duration::hours(2));
    let trip_id = trip.id;
    repo.trip = Some(trip);

    // 7 saltos de 6°C entre lecturas consecutivas
    let mut temps = Vec::new();
    for i in 0..8 {
        temps.push(if i % 2 == 0 { -20.0 } else { -14.0 });
    }
    repo.trip_readings = temps
        .iter()
        .enumerate()
        .map(|(i, &t)| TripReading {
            id: Uuid::new_v4(),
            trip_id,
            vehicle_id,
            temperature: t,
            recorded_at: Utc::now() - Duration::minutes(80 - (i as i64) * 10),
        })
        .collect();
    let repo = Arc::new(repo);
    let service = TripForecastService::new(repo.clone());

    let forecast = service.compute_trip_risk(trip_id).await.unwrap();

    // 7 spikes > 5 -> 15 puntos, sin bonus (salto máximo 6°C)
    assert_eq!(forecast.risk_score, 15);
    assert!(forecast
        .reasons
        .iter()
        .any(|r| r.contains("temperature spike")));
}
