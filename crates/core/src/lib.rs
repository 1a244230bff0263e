//! Domain logic for the UrbanSense monitoring platform.
//!
//! This crate is pure: no database access, no HTTP. It provides the shared
//! primitive types, the domain error taxonomy, role/permission rules, and the
//! threshold-crossing classification used by the alert pipeline. The caller
//! (the `urbansense-events` engine) is responsible for fetching readings,
//! subscriptions, and thresholds from the database and passing them in.

pub mod access;
pub mod error;
pub mod roles;
pub mod severity;
pub mod status;
pub mod types;

pub use error::CoreError;
