//! Real-time feed infrastructure for the UrbanSense platform.
//!
//! This crate implements the temporal heart of the system:
//!
//! - [`FeedEvent`] -- the JSON wire envelope pushed to connected clients.
//! - [`ChannelRegistry`] -- tracks live output channels and their
//!   last-delivered reading id.
//! - [`Broadcaster`] -- the timer-driven loop that polls the reading store
//!   above a shared cursor and fans new rows out to every channel.
//! - [`AlertEngine`] -- evaluates each new reading against subscriber
//!   thresholds and persists alerts + notifications.
//!
//! All state lives in the [`Broadcaster`] context object injected into the
//! HTTP layer; there are no module-level globals. The design is explicitly
//! single-instance: a multi-instance deployment would need a shared broker
//! in place of the in-memory registry.

pub mod alerting;
pub mod broadcaster;
pub mod feed;
pub mod registry;

pub use alerting::AlertEngine;
pub use broadcaster::{Broadcaster, FeedConfig, FeedStatus};
pub use feed::FeedEvent;
pub use registry::ChannelRegistry;
