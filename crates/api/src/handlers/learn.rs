//! Learner-facing reads of paths and lessons.
//!
//! No ownership check here: visibility and gating decide what a learner
//! sees. Locked lessons appear in the path outline without their content.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use trailhead_core::content_block::{sorted_blocks, ContentBlock};
use trailhead_core::error::CoreError;
use trailhead_core::gating::{LessonAccess, LockReason};
use trailhead_core::types::{DbId, OrderIndex};
use trailhead_db::models::learning_path::LearningPath;
use trailhead_db::models::lesson::Lesson;
use trailhead_db::models::module::Module;
use trailhead_db::repositories::{EnrollmentRepo, LearningPathRepo, LessonRepo};

use crate::error::AppResult;
use crate::guard::{resolve_lesson_access, resolve_path_view};
use crate::middleware::rbac::RequireLearner;
use crate::response::DataResponse;
use crate::state::AppState;

/// A lesson as a learner sees it.
#[derive(Debug, Serialize)]
pub struct LearnerLesson {
    pub id: DbId,
    pub module_id: DbId,
    pub title: String,
    pub slug: String,
    pub order_index: OrderIndex,
    pub estimated_minutes: i32,
    pub accessible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_reason: Option<LockReason>,
    /// Ordered blocks; absent when the lesson is locked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_blocks: Option<Vec<ContentBlock>>,
}

impl LearnerLesson {
    fn new(lesson: Lesson, access: LessonAccess) -> Self {
        let (accessible, lock_reason) = match access {
            LessonAccess::Accessible => (true, None),
            LessonAccess::Locked(reason) => (false, Some(reason)),
        };
        let content_blocks = accessible.then(|| sorted_blocks(&lesson.content_blocks.0));
        LearnerLesson {
            id: lesson.id,
            module_id: lesson.module_id,
            title: lesson.title,
            slug: lesson.slug,
            order_index: lesson.order_index,
            estimated_minutes: lesson.estimated_minutes,
            accessible,
            lock_reason,
            content_blocks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LearnerModule {
    #[serde(flatten)]
    pub module: Module,
    pub lessons: Vec<LearnerLesson>,
}

/// A path tree with per-lesson access decided for the caller.
#[derive(Debug, Serialize)]
pub struct LearnerPath {
    #[serde(flatten)]
    pub path: LearningPath,
    pub is_enrolled: bool,
    pub modules: Vec<LearnerModule>,
}

/// GET /api/v1/learn/paths
///
/// Published, public paths. Needs no token.
pub async fn list_paths(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<LearningPath>>>> {
    let paths = LearningPathRepo::list_discoverable(&state.pool).await?;
    Ok(Json(DataResponse { data: paths }))
}

/// GET /api/v1/learn/paths/{id}
pub async fn get_path(
    RequireLearner(user): RequireLearner,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LearnerPath>>> {
    let view = resolve_path_view(&state.pool, &user, id).await?;
    let tree = LearningPathRepo::load_tree(&state.pool, id).await?;
    let Some(tree) = tree else {
        return Err(CoreError::NotFound {
            entity: "LearningPath",
            id,
        }
        .into());
    };

    let mut position: i64 = 0;
    let modules = tree
        .modules
        .into_iter()
        .map(|m| {
            let lessons = m
                .lessons
                .into_iter()
                .map(|lesson| {
                    let access = view.access_at(position);
                    position += 1;
                    LearnerLesson::new(lesson, access)
                })
                .collect();
            LearnerModule {
                module: m.module,
                lessons,
            }
        })
        .collect();

    LearningPathRepo::increment_view_count(&state.pool, id).await?;
    if view.standing.is_enrolled {
        EnrollmentRepo::touch(&state.pool, user.user_id, id).await?;
    }
    tracing::debug!(user_id = user.user_id, path_id = id, "Learner opened path");

    Ok(Json(DataResponse {
        data: LearnerPath {
            path: tree.path,
            is_enrolled: view.standing.is_enrolled,
            modules,
        },
    }))
}

/// GET /api/v1/learn/lessons/{id}
///
/// A locked lesson is Forbidden; a lesson on a path the caller cannot see
/// is NotFound.
pub async fn get_lesson(
    RequireLearner(user): RequireLearner,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LearnerLesson>>> {
    let gate = resolve_lesson_access(&state.pool, &user, id).await?;
    gate.require_accessible()?;

    let lesson = LessonRepo::find_by_id(&state.pool, id).await?.ok_or(
        CoreError::NotFound {
            entity: "Lesson",
            id,
        },
    )?;
    if gate.view.standing.is_enrolled {
        EnrollmentRepo::touch(&state.pool, user.user_id, gate.position.path_id).await?;
    }
    Ok(Json(DataResponse {
        data: LearnerLesson::new(lesson, gate.access),
    }))
}
