//! Demo reading generator.
//!
//! Periodically inserts plausible readings for a random subset of the
//! active sensors so the broadcast loop has data to move. This stands in
//! for the real ingestion path; the loop has no contract with it beyond
//! polling the same table.

use std::time::Duration;

use rand::Rng;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use urbansense_db::models::reading::CreateReading;
use urbansense_db::repositories::{ReadingRepo, SensorRepo};

/// Default interval between generation passes.
const DEFAULT_INTERVAL_SECS: u64 = 10;

/// Probability that a given sensor emits a reading on a pass.
const EMIT_PROBABILITY: f64 = 0.4;

/// Run the generation loop until `cancel` is triggered.
///
/// The interval can be overridden with `SIMULATOR_INTERVAL_SECS`.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    let interval_secs: u64 = std::env::var("SIMULATOR_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_INTERVAL_SECS);

    tracing::info!(interval_secs, "Reading simulator started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Reading simulator stopping");
                break;
            }
            _ = interval.tick() => {
                match generate_once(&pool).await {
                    Ok(0) => {}
                    Ok(inserted) => {
                        tracing::debug!(inserted, "Simulator inserted readings");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Simulator pass failed");
                    }
                }
            }
        }
    }
}

/// One generation pass: roll the dice per active sensor and insert a
/// synthetic reading for the winners.
async fn generate_once(pool: &PgPool) -> Result<usize, sqlx::Error> {
    let sensors = SensorRepo::list_active(pool).await?;

    let mut inserted = 0;
    for sensor in &sensors {
        if !rand::rng().random_bool(EMIT_PROBABILITY) {
            continue;
        }

        ReadingRepo::create(
            pool,
            &CreateReading {
                sensor_id: sensor.id,
                value: synth_value(&sensor.sensor_type),
                unit: sensor.unit.clone(),
                validated: true,
            },
        )
        .await?;
        inserted += 1;
    }

    Ok(inserted)
}

/// A plausible value for a sensor type: a per-type baseline plus uniform
/// jitter, rounded to one decimal.
fn synth_value(sensor_type: &str) -> f64 {
    let (base, spread) = match sensor_type {
        "air_quality" => (60.0, 50.0),
        "temperature" => (22.0, 9.0),
        "humidity" => (55.0, 25.0),
        "sound" => (55.0, 20.0),
        "traffic" => (40.0, 35.0),
        _ => (50.0, 10.0),
    };
    let jitter: f64 = rand::rng().random_range(-1.0..1.0);
    let value: f64 = base + jitter * spread;
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synth_values_stay_in_plausible_range() {
        for _ in 0..200 {
            let aqi = synth_value("air_quality");
            assert!((10.0..=110.0).contains(&aqi), "AQI out of range: {aqi}");

            let temp = synth_value("temperature");
            assert!((13.0..=31.0).contains(&temp), "temp out of range: {temp}");
        }
    }

    #[test]
    fn unknown_type_gets_generic_baseline() {
        let v = synth_value("seismic");
        assert!((40.0..=60.0).contains(&v));
    }
}
