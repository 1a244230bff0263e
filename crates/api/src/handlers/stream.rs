//! Handlers for the live feed: the SSE endpoint and the admin companion
//! endpoint for manual triggering/testing.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::{Query, State};
use axum::response::sse::{Event, Sse};
use axum::Json;
use futures::Stream;
use serde::Deserialize;
use tokio::sync::mpsc::UnboundedReceiver;
use urbansense_core::error::CoreError;
use urbansense_core::types::DbId;
use urbansense_db::models::reading::CreateReading;
use urbansense_db::repositories::{ReadingRepo, SensorRepo};
use urbansense_events::Broadcaster;

use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// SSE endpoint
// ---------------------------------------------------------------------------

/// Query parameters for `GET /stream`.
///
/// `EventSource` cannot set request headers, so the access token rides in
/// the query string. An invalid or absent token degrades to an anonymous
/// channel rather than rejecting the connection.
#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub token: Option<String>,
}

/// GET /api/v1/stream
///
/// Open a feed channel. The response is a server-sent event stream whose
/// `data:` frames carry the JSON events produced by the broadcast loop.
pub async fn stream(
    State(state): State<AppState>,
    Query(params): Query<StreamQuery>,
) -> Sse<FeedStream> {
    let user_id = params
        .token
        .as_deref()
        .and_then(|t| validate_token(t, &state.config.jwt).ok())
        .map(|claims| claims.sub);

    let (conn_id, rx) = state.broadcaster.connect(user_id).await;

    Sse::new(FeedStream {
        conn_id,
        rx,
        broadcaster: Arc::clone(&state.broadcaster),
    })
}

/// Adapter from the registry's frame channel to an SSE event stream.
///
/// Dropping the stream (client disconnect) deregisters the channel, which
/// also cancels the broadcast timers when it was the last one.
pub struct FeedStream {
    conn_id: String,
    rx: UnboundedReceiver<String>,
    broadcaster: Arc<Broadcaster>,
}

impl Stream for FeedStream {
    type Item = Result<Event, Infallible>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.rx.poll_recv(cx) {
            Poll::Ready(Some(frame)) => Poll::Ready(Some(Ok(Event::default().data(frame)))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for FeedStream {
    fn drop(&mut self) {
        let broadcaster = Arc::clone(&self.broadcaster);
        let conn_id = std::mem::take(&mut self.conn_id);
        tokio::spawn(async move {
            broadcaster.disconnect(&conn_id).await;
        });
    }
}

// ---------------------------------------------------------------------------
// Admin companion endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /stream/admin`.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum AdminAction {
    /// Report connection count, cursor position, and loop state.
    Status,
    /// Force an immediate poll/delivery pass.
    Broadcast,
    /// Insert one reading, evaluate it synchronously, and push it as a
    /// `sensor-update` event.
    SensorUpdate { sensor_id: DbId, value: f64 },
}

/// POST /api/v1/stream/admin
///
/// Manual triggering/testing actions for the broadcast loop. Admin only.
pub async fn admin_action(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Json(action): Json<AdminAction>,
) -> AppResult<Json<serde_json::Value>> {
    match action {
        AdminAction::Status => {
            let status = state.broadcaster.status().await;
            Ok(Json(serde_json::json!({ "data": status })))
        }

        AdminAction::Broadcast => {
            let delivered = state.broadcaster.flush().await?;
            Ok(Json(serde_json::json!({ "data": { "delivered": delivered } })))
        }

        AdminAction::SensorUpdate { sensor_id, value } => {
            let sensor = SensorRepo::find_context(&state.pool, sensor_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Sensor",
                    id: sensor_id,
                }))?;

            // Manual readings are unvalidated until a review pass confirms
            // them.
            let reading = ReadingRepo::create(
                &state.pool,
                &CreateReading {
                    sensor_id,
                    value,
                    unit: sensor.unit,
                    validated: false,
                },
            )
            .await?;

            state.broadcaster.publish_update(&reading).await;

            Ok(Json(serde_json::json!({ "data": reading })))
        }
    }
}
