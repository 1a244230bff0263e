//! Well-known role name constants.
//!
//! These must match the seed data in the `roles` table migration.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_RESEARCHER: &str = "researcher";
pub const ROLE_CITIZEN: &str = "citizen";
