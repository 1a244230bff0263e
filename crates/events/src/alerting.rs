//! Threshold-alert evaluation pipeline.
//!
//! [`AlertEngine`] decides whether a reading should raise alerts for any
//! subscribed user. The crossing/severity decision itself is pure logic in
//! [`urbansense_core::severity`]; this module owns the orchestration:
//! resolve the sensor's neighborhood, gate on active subscribers, fetch
//! their thresholds, suppress duplicates, and persist alert + notification
//! pairs.

use chrono::Utc;
use urbansense_core::severity::{classify_crossing, Crossing, CrossingKind};
use urbansense_db::models::alert::CreateAlert;
use urbansense_db::models::reading::Reading;
use urbansense_db::models::sensor::SensorContext;
use urbansense_db::repositories::{
    AlertRepo, NotificationRepo, SensorRepo, SubscriptionRepo, ThresholdRepo,
};
use urbansense_db::DbPool;

/// Suppression window: no second alert for the same (sensor, user) pair
/// within this many minutes of an open one.
const DEDUP_WINDOW_MINS: i64 = 30;

/// Evaluates readings against subscriber thresholds.
pub struct AlertEngine {
    pool: DbPool,
}

impl AlertEngine {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Evaluate one reading. Never raises: every database error is caught
    /// and logged here, so a persistence failure drops the alert silently
    /// (no retry) without disturbing the delivery path.
    pub async fn evaluate(&self, reading: &Reading) {
        match self.evaluate_inner(reading).await {
            Ok(created) if created > 0 => {
                tracing::info!(
                    reading_id = reading.id,
                    sensor_id = reading.sensor_id,
                    alerts = created,
                    "Threshold alerts created"
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    reading_id = reading.id,
                    sensor_id = reading.sensor_id,
                    "Alert evaluation failed"
                );
            }
        }
    }

    /// The evaluation pipeline proper. Returns the number of alerts created.
    async fn evaluate_inner(&self, reading: &Reading) -> Result<u32, sqlx::Error> {
        // Step 1: resolve the sensor's neighborhood and type.
        let Some(sensor) = SensorRepo::find_context(&self.pool, reading.sensor_id).await? else {
            tracing::warn!(sensor_id = reading.sensor_id, "Reading for unknown sensor");
            return Ok(0);
        };

        // Step 2: gate on active subscribers; no subscribers, no work.
        let subscriber_ids =
            SubscriptionRepo::active_user_ids(&self.pool, sensor.neighborhood_id).await?;
        if subscriber_ids.is_empty() {
            return Ok(0);
        }

        // Step 3: active thresholds for this sensor type among those users.
        let thresholds =
            ThresholdRepo::active_for_users(&self.pool, &subscriber_ids, sensor.sensor_type_id)
                .await?;

        let mut created = 0;
        for threshold in &thresholds {
            // Step 4: pure crossing/severity decision.
            let Some(crossing) =
                classify_crossing(reading.value, threshold.min_value, threshold.max_value)
            else {
                continue;
            };

            // Step 5: suppress duplicates inside the 30-minute window.
            let since = Utc::now() - chrono::Duration::minutes(DEDUP_WINDOW_MINS);
            let duplicate =
                AlertRepo::open_exists_since(&self.pool, reading.sensor_id, threshold.user_id, since)
                    .await?;
            if duplicate {
                tracing::debug!(
                    sensor_id = reading.sensor_id,
                    user_id = threshold.user_id,
                    "Duplicate alert suppressed"
                );
                continue;
            }

            let alert = AlertRepo::create(
                &self.pool,
                &CreateAlert {
                    sensor_id: reading.sensor_id,
                    user_id: threshold.user_id,
                    measured_value: reading.value,
                    triggered_threshold: crossing.limit,
                    severity: crossing.severity.as_str(),
                },
            )
            .await?;

            let (title, message) = notification_copy(&sensor, reading, &crossing);
            NotificationRepo::create(&self.pool, alert.id, threshold.user_id, &title, &message)
                .await?;

            created += 1;
        }

        Ok(created)
    }
}

/// Compose the user-facing notification title and message for a crossing.
fn notification_copy(
    sensor: &SensorContext,
    reading: &Reading,
    crossing: &Crossing,
) -> (String, String) {
    let title = format!(
        "{} alert in {}",
        sensor.sensor_type.replace('_', " "),
        sensor.neighborhood
    );
    let direction = match crossing.kind {
        CrossingKind::AboveMax => "above",
        CrossingKind::BelowMin => "below",
    };
    let message = format!(
        "{} reported {} {}, {} your limit of {} {} (severity: {})",
        sensor.name,
        reading.value,
        reading.unit,
        direction,
        crossing.limit,
        sensor.unit,
        crossing.severity.as_str()
    );
    (title, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use urbansense_core::severity::AlertSeverity;

    fn sensor() -> SensorContext {
        SensorContext {
            id: 3,
            name: "Riverside AQ-1".to_string(),
            sensor_type_id: 1,
            sensor_type: "air_quality".to_string(),
            unit: "AQI".to_string(),
            neighborhood_id: 2,
            neighborhood: "Riverside".to_string(),
            is_active: true,
            installed_at: Utc::now(),
        }
    }

    fn reading(value: f64) -> Reading {
        Reading {
            id: 100,
            sensor_id: 3,
            value,
            unit: "AQI".to_string(),
            recorded_at: Utc::now(),
            validated: true,
        }
    }

    #[test]
    fn notification_copy_names_sensor_and_direction() {
        let crossing = Crossing {
            kind: CrossingKind::AboveMax,
            severity: AlertSeverity::Critical,
            limit: 100.0,
        };
        let (title, message) = notification_copy(&sensor(), &reading(151.0), &crossing);

        assert_eq!(title, "air quality alert in Riverside");
        assert!(message.contains("Riverside AQ-1"));
        assert!(message.contains("above your limit of 100"));
        assert!(message.contains("severity: critical"));
    }

    #[test]
    fn notification_copy_reports_undershoot() {
        let crossing = Crossing {
            kind: CrossingKind::BelowMin,
            severity: AlertSeverity::Medium,
            limit: 10.0,
        };
        let (_, message) = notification_copy(&sensor(), &reading(4.0), &crossing);
        assert!(message.contains("below your limit of 10"));
    }
}
