//! Role/permission matrix for the protected API surface.
//!
//! A single pure function, [`allowed`], maps `(role, path)` to allow/deny.
//! The access-guard middleware consults it for every request under the
//! protected route tree; paths are matched by prefix against the tree as
//! mounted under `/api/v1`.

use crate::roles::{ROLE_ADMIN, ROLE_CITIZEN, ROLE_MANAGER, ROLE_RESEARCHER};

/// Prefixes every authenticated role may access: the data-display surface
/// plus the caller's own settings and notifications.
const COMMON_PREFIXES: &[&str] = &[
    "/readings",
    "/sensors",
    "/neighborhoods",
    "/stream",
    "/thresholds",
    "/subscriptions",
    "/notifications",
    "/alerts",
];

/// Decide whether `role` may access `path`.
///
/// Policy is deny-by-default: unknown roles and unmatched paths are denied.
///
/// - `admin` passes everywhere, including `/admin` and `/stream/admin`.
/// - `manager` additionally manages alert status transitions.
/// - `researcher` and `citizen` get the common read/self-service surface.
pub fn allowed(role: &str, path: &str) -> bool {
    if role == ROLE_ADMIN {
        return true;
    }

    // Admin-only subtrees for everyone else.
    if path.starts_with("/admin") || path.starts_with("/stream/admin") {
        return false;
    }

    match role {
        ROLE_MANAGER => {
            common_allowed(path) || is_alert_status_path(path)
        }
        ROLE_RESEARCHER | ROLE_CITIZEN => {
            if is_alert_status_path(path) {
                return false;
            }
            common_allowed(path)
        }
        _ => false,
    }
}

fn common_allowed(path: &str) -> bool {
    COMMON_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Matches `/alerts/{id}/status`, the manager-only transition endpoint.
fn is_alert_status_path(path: &str) -> bool {
    path.starts_with("/alerts/") && path.ends_with("/status")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_passes_everywhere() {
        assert!(allowed(ROLE_ADMIN, "/admin/anything"));
        assert!(allowed(ROLE_ADMIN, "/stream/admin"));
        assert!(allowed(ROLE_ADMIN, "/readings"));
        assert!(allowed(ROLE_ADMIN, "/alerts/42/status"));
    }

    #[test]
    fn citizen_gets_common_surface() {
        assert!(allowed(ROLE_CITIZEN, "/readings"));
        assert!(allowed(ROLE_CITIZEN, "/sensors/7"));
        assert!(allowed(ROLE_CITIZEN, "/stream"));
        assert!(allowed(ROLE_CITIZEN, "/thresholds"));
        assert!(allowed(ROLE_CITIZEN, "/subscriptions"));
        assert!(allowed(ROLE_CITIZEN, "/notifications/unread-count"));
        assert!(allowed(ROLE_CITIZEN, "/alerts"));
    }

    #[test]
    fn citizen_denied_admin_and_status_transitions() {
        assert!(!allowed(ROLE_CITIZEN, "/admin/users"));
        assert!(!allowed(ROLE_CITIZEN, "/stream/admin"));
        assert!(!allowed(ROLE_CITIZEN, "/alerts/42/status"));
    }

    #[test]
    fn manager_gets_alert_status_but_not_admin() {
        assert!(allowed(ROLE_MANAGER, "/alerts/42/status"));
        assert!(allowed(ROLE_MANAGER, "/readings"));
        assert!(!allowed(ROLE_MANAGER, "/stream/admin"));
        assert!(!allowed(ROLE_MANAGER, "/admin/users"));
    }

    #[test]
    fn researcher_matches_citizen_surface() {
        assert!(allowed(ROLE_RESEARCHER, "/readings"));
        assert!(!allowed(ROLE_RESEARCHER, "/alerts/42/status"));
    }

    #[test]
    fn unknown_role_denied_everywhere() {
        assert!(!allowed("intruder", "/readings"));
        assert!(!allowed("", "/sensors"));
    }

    #[test]
    fn unmatched_path_denied() {
        assert!(!allowed(ROLE_CITIZEN, "/suggestions"));
        assert!(!allowed(ROLE_MANAGER, "/profile/avatar"));
    }
}
