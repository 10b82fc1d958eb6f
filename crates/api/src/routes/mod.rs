pub mod creator;
pub mod health;
pub mod learner;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /creator/...      authoring (creator/admin role, ownership guard)
/// /learn/...        learning (learner role, visibility + gating)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/creator", creator::router())
        .nest("/learn", learner::router())
}
