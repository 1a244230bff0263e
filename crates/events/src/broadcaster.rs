//! Timer-driven broadcast loop over the reading store.
//!
//! The [`Broadcaster`] owns the shared cursor (highest reading id delivered
//! to all channels), the [`ChannelRegistry`], and the two feed timers:
//!
//! - a data tick (default 5 s) that queries rows above the cursor, runs the
//!   [`AlertEngine`] on each, pushes the batch to every channel, and
//!   advances the cursor to the max id seen;
//! - a keep-alive tick (default 30 s) that emits a `heartbeat` event with
//!   the current channel count, independent of data activity.
//!
//! Timers start when the first channel registers (the cursor is initialized
//! to the current max reading id, so no historical backlog is replayed) and
//! are cancelled when the last channel is removed.
//!
//! The cursor is shared across channels, not per-channel: a client that
//! connects between ticks can miss rows the cursor already passed. That gap
//! is inherited product behavior; cross-channel delivery is only monotonic
//! per channel, never linearizable.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use urbansense_core::types::DbId;
use urbansense_db::models::reading::Reading;
use urbansense_db::repositories::ReadingRepo;
use urbansense_db::DbPool;

use crate::alerting::AlertEngine;
use crate::feed::FeedEvent;
use crate::registry::ChannelRegistry;

/// Default data tick interval in seconds.
const DEFAULT_TICK_SECS: u64 = 5;
/// Default keep-alive interval in seconds.
const DEFAULT_KEEPALIVE_SECS: u64 = 30;
/// Default cap on rows fetched per tick.
const DEFAULT_BATCH_SIZE: i64 = 200;

/// Tunable feed parameters, loaded from the environment by the API layer.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub tick_interval: Duration,
    pub keepalive_interval: Duration,
    pub batch_size: i64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(DEFAULT_TICK_SECS),
            keepalive_interval: Duration::from_secs(DEFAULT_KEEPALIVE_SECS),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Snapshot of the loop state, served by the admin `status` action.
#[derive(Debug, Serialize)]
pub struct FeedStatus {
    pub connections: usize,
    pub cursor: DbId,
    pub running: bool,
}

/// Cancellation handle for the two running timers.
struct FeedTimers {
    cancel: CancellationToken,
}

/// The broadcast loop context object. Shared behind `Arc`; injected into
/// the HTTP layer via application state.
pub struct Broadcaster {
    pool: DbPool,
    registry: ChannelRegistry,
    engine: AlertEngine,
    config: FeedConfig,
    /// Highest reading id delivered to all channels.
    cursor: Mutex<DbId>,
    /// Present while the timers are running (at least one channel open).
    timers: Mutex<Option<FeedTimers>>,
}

impl Broadcaster {
    pub fn new(pool: DbPool, config: FeedConfig) -> Arc<Self> {
        Arc::new(Self {
            engine: AlertEngine::new(pool.clone()),
            pool,
            registry: ChannelRegistry::new(),
            config,
            cursor: Mutex::new(0),
            timers: Mutex::new(None),
        })
    }

    /// Register a new feed channel.
    ///
    /// On the first registration the cursor is initialized to the current
    /// maximum reading id and both timers start. Every new channel receives
    /// a `connection` welcome event carrying the latest reading per sensor.
    ///
    /// Returns the connection id and the receiver the transport forwards
    /// frames from.
    pub async fn connect(
        self: &Arc<Self>,
        user_id: Option<DbId>,
    ) -> (String, mpsc::UnboundedReceiver<String>) {
        let conn_id = uuid::Uuid::new_v4().to_string();

        // Hold the timer guard across registration so concurrent first
        // connections initialize the cursor exactly once.
        let mut timers = self.timers.lock().await;
        if timers.is_none() {
            let max_id = match ReadingRepo::max_id(&self.pool).await {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(error = %e, "Cursor init query failed, starting at 0");
                    0
                }
            };
            *self.cursor.lock().await = max_id;
            tracing::info!(cursor = max_id, "First feed channel, starting timers");
        }

        let cursor = *self.cursor.lock().await;
        let rx = self.registry.add(conn_id.clone(), user_id, cursor).await;

        if timers.is_none() {
            *timers = Some(self.spawn_timers());
        }
        drop(timers);

        // One-time welcome with the latest known reading per sensor.
        let latest = match ReadingRepo::latest_per_sensor(&self.pool).await {
            Ok(latest) => latest,
            Err(e) => {
                tracing::warn!(error = %e, "Snapshot query failed, sending empty welcome");
                Vec::new()
            }
        };
        let welcome = FeedEvent::connection(conn_id.clone(), latest).to_frame();
        self.registry.send_to(&conn_id, &welcome).await;

        tracing::info!(conn_id = %conn_id, user_id, "Feed channel connected");
        (conn_id, rx)
    }

    /// Remove a channel. Cancels both timers when the last one goes.
    pub async fn disconnect(&self, conn_id: &str) {
        self.registry.remove(conn_id).await;
        tracing::info!(conn_id, "Feed channel disconnected");

        let mut timers = self.timers.lock().await;
        if self.registry.count().await == 0 {
            if let Some(running) = timers.take() {
                running.cancel.cancel();
                tracing::info!("Last feed channel removed, timers cancelled");
            }
        }
    }

    /// Force an immediate poll/delivery pass (the admin `broadcast` action).
    ///
    /// Returns the number of readings delivered.
    pub async fn flush(&self) -> Result<usize, sqlx::Error> {
        self.data_tick().await
    }

    /// The manual point-update path: evaluate the reading synchronously,
    /// then push it to every channel as a `sensor-update` event.
    ///
    /// The cursor is not advanced, so the same reading is also delivered by
    /// the next polled `sensor-data` batch; the duplicate is the accepted
    /// cost of keeping the cursor strictly tied to the poll loop.
    pub async fn publish_update(&self, reading: &Reading) {
        self.engine.evaluate(reading).await;
        let frame = FeedEvent::sensor_update(reading.clone()).to_frame();
        let reached = self.registry.broadcast(&frame, Some(reading.id)).await;
        tracing::debug!(reading_id = reading.id, reached, "Point update pushed");
    }

    /// Loop state for the admin `status` action.
    pub async fn status(&self) -> FeedStatus {
        FeedStatus {
            connections: self.registry.count().await,
            cursor: *self.cursor.lock().await,
            running: self.timers.lock().await.is_some(),
        }
    }

    /// Cancel timers and drop every channel. Used during graceful shutdown.
    pub async fn shutdown(&self) {
        if let Some(running) = self.timers.lock().await.take() {
            running.cancel.cancel();
        }
        self.registry.shutdown_all().await;
    }

    /// Spawn the data and keep-alive loops, returning their cancel handle.
    fn spawn_timers(self: &Arc<Self>) -> FeedTimers {
        let cancel = CancellationToken::new();

        let data_self = Arc::clone(self);
        let data_cancel = cancel.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(data_self.config.tick_interval);
            loop {
                tokio::select! {
                    _ = data_cancel.cancelled() => break,
                    _ = interval.tick() => {
                        match data_self.data_tick().await {
                            Ok(0) => {}
                            Ok(delivered) => {
                                tracing::debug!(delivered, "Feed tick delivered readings");
                            }
                            Err(e) => {
                                // Transient failure: no-op this tick, the next
                                // one retries naturally.
                                tracing::warn!(error = %e, "Feed tick query failed");
                            }
                        }
                    }
                }
            }
        });

        let ka_self = Arc::clone(self);
        let ka_cancel = cancel.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(ka_self.config.keepalive_interval);
            loop {
                tokio::select! {
                    _ = ka_cancel.cancelled() => break,
                    _ = interval.tick() => {
                        let connections = ka_self.registry.count().await;
                        let frame = FeedEvent::heartbeat(connections).to_frame();
                        ka_self.registry.broadcast(&frame, None).await;
                        tracing::debug!(connections, "Feed heartbeat");
                    }
                }
            }
        });

        FeedTimers { cancel }
    }

    /// One poll/deliver pass: fetch rows above the cursor in ascending id
    /// order (capped at the batch size), evaluate thresholds for each, push
    /// the batch, and advance the cursor to the max id seen.
    async fn data_tick(&self) -> Result<usize, sqlx::Error> {
        let cursor = *self.cursor.lock().await;
        let batch = ReadingRepo::list_after(&self.pool, cursor, self.config.batch_size).await?;

        let Some(last) = batch.last() else {
            return Ok(0);
        };
        let max_id = last.id;

        // Alert evaluation sits on the delivery path: each row is evaluated
        // before the batch goes out. Evaluation never raises.
        for reading in &batch {
            self.engine.evaluate(reading).await;
        }

        let delivered = batch.len();
        let frame = FeedEvent::sensor_data(batch).to_frame();
        self.registry.broadcast(&frame, Some(max_id)).await;

        *self.cursor.lock().await = max_id;
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_cadence() {
        let config = FeedConfig::default();
        assert_eq!(config.tick_interval, Duration::from_secs(5));
        assert_eq!(config.keepalive_interval, Duration::from_secs(30));
        assert_eq!(config.batch_size, 200);
    }

    #[test]
    fn status_serializes_for_the_admin_endpoint() {
        let status = FeedStatus {
            connections: 2,
            cursor: 512,
            running: true,
        };
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["connections"], 2);
        assert_eq!(value["cursor"], 512);
        assert_eq!(value["running"], true);
    }
}
