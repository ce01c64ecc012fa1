//! Repositorio del motor de riesgo
//!
//! Este módulo define la interfaz de acceso a datos que consume el motor
//! (lecturas acotadas por ventana de tiempo + escritura append-only de
//! snapshots) y su implementación sobre PostgreSQL con sqlx.
//!
//! Los snapshots solo se insertan: nunca UPDATE ni DELETE desde aquí.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    AlertCounts, AlertSeverity, SensorReading, SensorStats, Trip, TripAlertCounts, TripReading,
    TripRiskSnapshot, Vehicle, VehicleRiskSnapshot,
};
use crate::utils::errors::AppError;

/// Interfaz de acceso a datos del motor de riesgo.
///
/// Los servicios de scoring reciben esta interfaz por inyección explícita
/// (`Arc<dyn RiskDataAccess>`); no hay estado global.
#[async_trait]
pub trait RiskDataAccess: Send + Sync {
    async fn get_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, AppError>;

    async fn get_trip(&self, id: Uuid) -> Result<Option<Trip>, AppError>;

    /// Agregado de lecturas de sensor desde `since`. La desviación estándar
    /// es poblacional (STDDEV_POP), no muestral.
    async fn sensor_stats(
        &self,
        vehicle_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<SensorStats, AppError>;

    /// Lecturas de sensor desde `since`, ascendentes por recorded_at,
    /// acotadas a `limit` para acotar el coste de cómputo.
    async fn list_sensor_readings(
        &self,
        vehicle_id: Uuid,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<SensorReading>, AppError>;

    /// Conteo de alertas del vehículo por severidad desde `since`,
    /// resueltas o no.
    async fn count_alerts_by_severity(
        &self,
        vehicle_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<AlertCounts, AppError>;

    /// Lecturas del viaje ascendentes por recorded_at, acotadas a `limit`.
    async fn list_trip_readings(
        &self,
        trip_id: Uuid,
        limit: i64,
    ) -> Result<Vec<TripReading>, AppError>;

    /// Conteo de violaciones del viaje, separadas por resolución.
    async fn count_trip_alerts(&self, trip_id: Uuid) -> Result<TripAlertCounts, AppError>;

    /// Inserta un snapshot de riesgo de vehículo (append-only).
    async fn append_vehicle_snapshot(
        &self,
        snapshot: &VehicleRiskSnapshot,
    ) -> Result<(), AppError>;

    /// Inserta un snapshot de riesgo de viaje (append-only).
    async fn append_trip_snapshot(&self, snapshot: &TripRiskSnapshot) -> Result<(), AppError>;
}

/// Implementación PostgreSQL del acceso a datos
pub struct SqlxRiskRepository {
    pool: PgPool,
}

impl SqlxRiskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RiskDataAccess for SqlxRiskRepository {
    async fn get_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn get_trip(&self, id: Uuid) -> Result<Option<Trip>, AppError> {
        let trip = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(trip)
    }

    async fn sensor_stats(
        &self,
        vehicle_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<SensorStats, AppError> {
        let stats = sqlx::query_as::<_, SensorStats>(
            r#"
            SELECT
                AVG(temperature)        AS avg_temp,
                MIN(temperature)        AS min_temp,
                MAX(temperature)        AS max_temp,
                STDDEV_POP(temperature) AS stddev_temp,
                COUNT(*)                AS reading_count
            FROM sensor_readings
            WHERE vehicle_id = $1 AND recorded_at >= $2
            "#,
        )
        .bind(vehicle_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    async fn list_sensor_readings(
        &self,
        vehicle_id: Uuid,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<SensorReading>, AppError> {
        let readings = sqlx::query_as::<_, SensorReading>(
            r#"
            SELECT * FROM sensor_readings
            WHERE vehicle_id = $1 AND recorded_at >= $2
            ORDER BY recorded_at ASC
            LIMIT $3
            "#,
        )
        .bind(vehicle_id)
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(readings)
    }

    async fn count_alerts_by_severity(
        &self,
        vehicle_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<AlertCounts, AppError> {
        let rows: Vec<(AlertSeverity, i64)> = sqlx::query_as(
            r#"
            SELECT severity, COUNT(*)
            FROM alerts
            WHERE vehicle_id = $1 AND created_at >= $2
            GROUP BY severity
            "#,
        )
        .bind(vehicle_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        let mut counts = AlertCounts::default();
        for (severity, count) in rows {
            match severity {
                AlertSeverity::Critical => counts.critical = count,
                AlertSeverity::Warning => counts.warning = count,
                AlertSeverity::Info => counts.info = count,
            }
        }

        Ok(counts)
    }

    async fn list_trip_readings(
        &self,
        trip_id: Uuid,
        limit: i64,
    ) -> Result<Vec<TripReading>, AppError> {
        let readings = sqlx::query_as::<_, TripReading>(
            r#"
            SELECT * FROM trip_readings
            WHERE trip_id = $1
            ORDER BY recorded_at ASC
            LIMIT $2
            "#,
        )
        .bind(trip_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(readings)
    }

    async fn count_trip_alerts(&self, trip_id: Uuid) -> Result<TripAlertCounts, AppError> {
        let rows: Vec<(bool, i64)> = sqlx::query_as(
            r#"
            SELECT is_resolved, COUNT(*)
            FROM trip_alerts
            WHERE trip_id = $1
            GROUP BY is_resolved
            "#,
        )
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await?;

        let mut counts = TripAlertCounts::default();
        for (is_resolved, count) in rows {
            if is_resolved {
                counts.resolved = count;
            } else {
                counts.unresolved = count;
            }
        }

        Ok(counts)
    }

    async fn append_vehicle_snapshot(
        &self,
        snapshot: &VehicleRiskSnapshot,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO vehicle_risk_snapshots
                (id, vehicle_id, risk_score, risk_level, reasons, calculated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(snapshot.id)
        .bind(snapshot.vehicle_id)
        .bind(snapshot.risk_score)
        .bind(snapshot.risk_level)
        .bind(serde_json::json!(snapshot.reasons))
        .bind(snapshot.calculated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn append_trip_snapshot(&self, snapshot: &TripRiskSnapshot) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO trip_risk_snapshots
                (id, trip_id, risk_score, risk_level, reasons,
                 predicted_completion, expected_delay_minutes, calculated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(snapshot.id)
        .bind(snapshot.trip_id)
        .bind(snapshot.risk_score)
        .bind(snapshot.risk_level)
        .bind(serde_json::json!(snapshot.reasons))
        .bind(snapshot.predicted_completion)
        .bind(snapshot.expected_delay_minutes)
        .bind(snapshot.calculated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
