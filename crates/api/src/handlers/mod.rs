//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers delegate to the repositories in `urbansense_db` (or to the
//! [`Broadcaster`](urbansense_events::Broadcaster) for the feed) and map
//! errors via [`AppError`](crate::error::AppError).

pub mod alerts;
pub mod auth;
pub mod neighborhoods;
pub mod notifications;
pub mod readings;
pub mod sensors;
pub mod stream;
pub mod subscriptions;
pub mod thresholds;
