//! Handlers for `/learn/progress`.
//!
//! Writes are allowed only on lessons the caller can open under gating.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use trailhead_core::learner::PathCompletion;
use trailhead_core::types::DbId;
use trailhead_db::models::progress::{LessonProgress, Progress, RecordProgress};
use trailhead_db::repositories::ProgressRepo;

use crate::error::AppResult;
use crate::guard::{resolve_lesson_access, resolve_path_view};
use crate::middleware::json::AppJson;
use crate::middleware::rbac::RequireLearner;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProgressParams {
    #[serde(alias = "pathId")]
    pub path_id: DbId,
}

/// Per-lesson progress for one path plus the rolled-up completion.
#[derive(Debug, Serialize)]
pub struct PathProgress {
    pub path_id: DbId,
    pub completion: PathCompletion,
    pub lessons: Vec<LessonProgress>,
}

/// GET /api/v1/learn/progress?path_id=
pub async fn get_for_path(
    RequireLearner(user): RequireLearner,
    State(state): State<AppState>,
    Query(params): Query<ProgressParams>,
) -> AppResult<Json<DataResponse<PathProgress>>> {
    resolve_path_view(&state.pool, &user, params.path_id).await?;
    let lessons = ProgressRepo::list_for_path(&state.pool, user.user_id, params.path_id).await?;
    let completion = PathCompletion::from_statuses(lessons.iter().map(|l| l.status.as_str()));
    Ok(Json(DataResponse {
        data: PathProgress {
            path_id: params.path_id,
            completion,
            lessons,
        },
    }))
}

/// PUT /api/v1/learn/progress/lessons/{id}
pub async fn record(
    RequireLearner(user): RequireLearner,
    State(state): State<AppState>,
    Path(lesson_id): Path<DbId>,
    AppJson(input): AppJson<RecordProgress>,
) -> AppResult<Json<DataResponse<Progress>>> {
    input.validate()?;
    resolve_lesson_access(&state.pool, &user, lesson_id)
        .await?
        .require_accessible()?;

    let progress = ProgressRepo::record(&state.pool, user.user_id, lesson_id, &input).await?;
    tracing::debug!(
        user_id = user.user_id,
        lesson_id,
        status = %progress.status,
        pct = progress.completion_percentage,
        "Progress recorded"
    );
    Ok(Json(DataResponse { data: progress }))
}

/// POST /api/v1/learn/progress/lessons/{id}/complete
pub async fn mark_complete(
    RequireLearner(user): RequireLearner,
    State(state): State<AppState>,
    Path(lesson_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Progress>>> {
    resolve_lesson_access(&state.pool, &user, lesson_id)
        .await?
        .require_accessible()?;

    let progress = ProgressRepo::mark_complete(&state.pool, user.user_id, lesson_id).await?;
    tracing::info!(user_id = user.user_id, lesson_id, "Lesson marked complete");
    Ok(Json(DataResponse { data: progress }))
}

/// POST /api/v1/learn/progress/lessons/{id}/incomplete
///
/// `data` is `null` when the learner never had progress on the lesson.
pub async fn mark_incomplete(
    RequireLearner(user): RequireLearner,
    State(state): State<AppState>,
    Path(lesson_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Option<Progress>>>> {
    resolve_lesson_access(&state.pool, &user, lesson_id)
        .await?
        .require_accessible()?;

    let progress = ProgressRepo::mark_incomplete(&state.pool, user.user_id, lesson_id).await?;
    tracing::info!(user_id = user.user_id, lesson_id, "Lesson marked incomplete");
    Ok(Json(DataResponse { data: progress }))
}
