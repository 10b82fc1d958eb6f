//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the minimum requirement.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use trailhead_core::error::CoreError;
use trailhead_core::roles::{can_author, can_learn};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires `creator` or `admin` role. Rejects with 403 Forbidden otherwise.
///
/// Role alone grants no access to content: creator handlers still pass
/// every node through the ownership guard.
///
/// ```ignore
/// async fn creator_only(RequireCreator(user): RequireCreator) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireCreator(pub AuthUser);

impl FromRequestParts<AppState> for RequireCreator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_author(&user.role) {
            tracing::warn!(user_id = user.user_id, role = %user.role, "Creator role required");
            return Err(AppError::Core(CoreError::Forbidden(
                "Creator or Admin role required".into(),
            )));
        }
        Ok(RequireCreator(user))
    }
}

/// Requires a role that may enroll and track progress (anything but `guest`).
pub struct RequireLearner(pub AuthUser);

impl FromRequestParts<AppState> for RequireLearner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_learn(&user.role) {
            tracing::warn!(user_id = user.user_id, role = %user.role, "Learner role required");
            return Err(AppError::Core(CoreError::Forbidden(
                "Sign in as a learner to use this endpoint".into(),
            )));
        }
        Ok(RequireLearner(user))
    }
}
