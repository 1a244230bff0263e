//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the inserts/patches the API accepts

pub mod alert;
pub mod neighborhood;
pub mod notification;
pub mod reading;
pub mod role;
pub mod sensor;
pub mod session;
pub mod subscription;
pub mod threshold;
pub mod user;
