//! Path-based access guard.
//!
//! [`AccessGuard`] wraps [`AuthUser`] and additionally consults the pure
//! role/permission function [`urbansense_core::access::allowed`] with the
//! request path (relative to the `/api/v1` mount). Handlers on the
//! protected surface take this extractor instead of bare `AuthUser`, so the
//! permission matrix is enforced uniformly at the type level.

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::request::Parts;
use urbansense_core::access::allowed;
use urbansense_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Mount point stripped from the request path before matching.
const API_PREFIX: &str = "/api/v1";

/// Requires authentication AND a role allowed for the request path.
///
/// ```ignore
/// async fn list_readings(AccessGuard(user): AccessGuard) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct AccessGuard(pub AuthUser);

impl FromRequestParts<AppState> for AccessGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        // Nested routers see a stripped Uri; OriginalUri keeps the full
        // request path.
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map(|u| u.0.path().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());
        let path = path.strip_prefix(API_PREFIX).unwrap_or(&path);

        if !allowed(&user.role, path) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Role not permitted for this resource".into(),
            )));
        }

        Ok(AccessGuard(user))
    }
}
