//! Request-time authorization for content nodes.
//!
//! Creator routes pass every node through [`require_owner`]. Learner routes
//! resolve visibility and gating through [`resolve_path_view`] and
//! [`resolve_lesson_access`].

use sqlx::PgPool;
use trailhead_core::error::CoreError;
use trailhead_core::gating::{
    can_view_path, evaluate_lesson_access, LearnerStanding, LessonAccess, LockReason,
    PublicationState,
};
use trailhead_core::ownership::{ensure_owner, ContentNode, OwnerChain};
use trailhead_core::types::DbId;
use trailhead_db::models::learning_path::LearningPath;
use trailhead_db::models::lesson::LessonPosition;
use trailhead_db::repositories::{EnrollmentRepo, LearningPathRepo, LessonRepo, OwnershipRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

// ---------------------------------------------------------------------------
// Ownership
// ---------------------------------------------------------------------------

/// Resolve `node` to its owning path and check the caller created it.
///
/// A broken chain is NotFound; a chain owned by someone else is Forbidden.
/// There is no admin override.
pub async fn require_owner(
    pool: &PgPool,
    user: &AuthUser,
    node: ContentNode,
) -> AppResult<OwnerChain> {
    let chain = OwnershipRepo::resolve(pool, node).await?;
    ensure_owner(user.user_id, node, chain).map_err(|err| {
        if matches!(err, CoreError::Forbidden(_)) {
            tracing::warn!(
                user_id = user.user_id,
                entity = node.entity(),
                id = node.id(),
                "Ownership check failed"
            );
        }
        err.into()
    })
}

// ---------------------------------------------------------------------------
// Learner visibility and gating
// ---------------------------------------------------------------------------

/// A path the caller is allowed to see, with the facts gating depends on.
pub struct PathView {
    pub path: LearningPath,
    pub state: PublicationState,
    pub standing: LearnerStanding,
}

impl PathView {
    pub fn access_at(&self, position: i64) -> LessonAccess {
        evaluate_lesson_access(&self.state, self.standing, position)
    }
}

/// Load a path for a learner.
///
/// Paths that are neither discoverable, enrolled in, nor owned by the
/// caller are reported as NotFound so their existence does not leak.
pub async fn resolve_path_view(
    pool: &PgPool,
    user: &AuthUser,
    path_id: DbId,
) -> AppResult<PathView> {
    let not_found = CoreError::NotFound {
        entity: "LearningPath",
        id: path_id,
    };
    let Some(path) = LearningPathRepo::find_by_id(pool, path_id).await? else {
        return Err(not_found.into());
    };

    let standing = LearnerStanding {
        is_enrolled: EnrollmentRepo::is_enrolled(pool, user.user_id, path_id).await?,
        is_owner: path.creator_id == user.user_id,
    };
    let state = path.publication()?;
    if !can_view_path(&state, standing) {
        return Err(not_found.into());
    }

    Ok(PathView {
        path,
        state,
        standing,
    })
}

/// Where a lesson sits in its path and whether the caller may open it.
pub struct LessonGate {
    pub position: LessonPosition,
    pub view: PathView,
    pub access: LessonAccess,
}

impl LessonGate {
    /// Turn a locked result into Forbidden.
    pub fn require_accessible(&self) -> AppResult<()> {
        match self.access {
            LessonAccess::Accessible => Ok(()),
            LessonAccess::Locked(reason) => Err(CoreError::Forbidden(format!(
                "Lesson {} is locked ({})",
                self.position.lesson_id,
                lock_reason_text(reason)
            ))
            .into()),
        }
    }
}

/// Resolve a lesson's path, visibility and gating for the caller.
///
/// A lesson in a path the caller cannot see is NotFound.
pub async fn resolve_lesson_access(
    pool: &PgPool,
    user: &AuthUser,
    lesson_id: DbId,
) -> AppResult<LessonGate> {
    let not_found = || CoreError::NotFound {
        entity: "Lesson",
        id: lesson_id,
    };
    let position = LessonRepo::position_in_path(pool, lesson_id)
        .await?
        .ok_or_else(not_found)?;

    let view = resolve_path_view(pool, user, position.path_id)
        .await
        .map_err(|err| match err {
            AppError::Core(CoreError::NotFound { .. }) => not_found().into(),
            other => other,
        })?;
    let access = view.access_at(position.position);

    Ok(LessonGate {
        position,
        view,
        access,
    })
}

fn lock_reason_text(reason: LockReason) -> &'static str {
    match reason {
        LockReason::EnrollmentRequired => "enrollment required",
        LockReason::BeyondFreePreview => "beyond the free preview; enroll to continue",
    }
}
