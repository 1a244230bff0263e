//! Request extractors for authentication and authorization.

pub mod access;
pub mod auth;
pub mod rbac;
