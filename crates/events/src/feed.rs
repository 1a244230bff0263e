//! Wire format for the server-sent event feed.
//!
//! Every pushed message is a JSON object with a `type` discriminator, a
//! `timestamp`, and a type-specific payload. The SSE `data: ` framing is
//! applied by the transport layer; this module only produces the JSON.

use chrono::Utc;
use serde::Serialize;
use urbansense_core::types::Timestamp;
use urbansense_db::models::reading::Reading;

/// A single event on the client feed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FeedEvent {
    /// Sent once when a channel connects: a greeting plus a snapshot of the
    /// latest known reading per sensor.
    Connection {
        connection_id: String,
        message: String,
        latest: Vec<Reading>,
        timestamp: Timestamp,
    },

    /// A batch of newly observed readings, in ascending id order.
    SensorData {
        readings: Vec<Reading>,
        timestamp: Timestamp,
    },

    /// A single reading pushed outside the polling cadence (the manual
    /// point-update path).
    SensorUpdate {
        reading: Reading,
        timestamp: Timestamp,
    },

    /// Periodic keep-alive carrying the current channel count.
    Heartbeat {
        connections: usize,
        timestamp: Timestamp,
    },
}

impl FeedEvent {
    pub fn connection(connection_id: String, latest: Vec<Reading>) -> Self {
        FeedEvent::Connection {
            connection_id,
            message: "Connected to the UrbanSense live feed".to_string(),
            latest,
            timestamp: Utc::now(),
        }
    }

    pub fn sensor_data(readings: Vec<Reading>) -> Self {
        FeedEvent::SensorData {
            readings,
            timestamp: Utc::now(),
        }
    }

    pub fn sensor_update(reading: Reading) -> Self {
        FeedEvent::SensorUpdate {
            reading,
            timestamp: Utc::now(),
        }
    }

    pub fn heartbeat(connections: usize) -> Self {
        FeedEvent::Heartbeat {
            connections,
            timestamp: Utc::now(),
        }
    }

    /// Serialize to the JSON text carried in one SSE data frame.
    pub fn to_frame(&self) -> String {
        serde_json::to_string(self).expect("feed event serializes to JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_reading(id: i64) -> Reading {
        Reading {
            id,
            sensor_id: 7,
            value: 42.5,
            unit: "AQI".to_string(),
            recorded_at: Utc::now(),
            validated: true,
        }
    }

    #[test]
    fn heartbeat_uses_kebab_case_discriminator() {
        let frame = FeedEvent::heartbeat(3).to_frame();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["type"], "heartbeat");
        assert_eq!(value["connections"], 3);
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn sensor_data_carries_reading_array() {
        let frame = FeedEvent::sensor_data(vec![sample_reading(1), sample_reading(2)]).to_frame();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["type"], "sensor-data");
        assert_eq!(value["readings"].as_array().unwrap().len(), 2);
        assert_eq!(value["readings"][0]["id"], 1);
    }

    #[test]
    fn sensor_update_carries_single_reading() {
        let frame = FeedEvent::sensor_update(sample_reading(9)).to_frame();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["type"], "sensor-update");
        assert_eq!(value["reading"]["id"], 9);
        assert_eq!(value["reading"]["value"], 42.5);
    }

    #[test]
    fn connection_event_includes_snapshot() {
        let frame =
            FeedEvent::connection("conn-abc".to_string(), vec![sample_reading(5)]).to_frame();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["type"], "connection");
        assert_eq!(value["connection_id"], "conn-abc");
        assert_eq!(value["latest"].as_array().unwrap().len(), 1);
    }
}
