//! Creator handlers for lessons: listed and created under
//! `/creator/modules/{module_id}/lessons`, addressed directly at
//! `/creator/lessons/{id}`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use trailhead_core::content_block::validate_blocks;
use trailhead_core::error::CoreError;
use trailhead_core::ownership::ContentNode;
use trailhead_core::types::DbId;
use trailhead_db::models::lesson::{AutosaveAck, AutosaveLesson, CreateLesson, Lesson, UpdateLesson};
use trailhead_db::models::module::ReorderRequest;
use trailhead_db::repositories::LessonRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::guard::require_owner;
use crate::middleware::json::AppJson;
use crate::middleware::rbac::RequireCreator;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Lesson",
        id,
    })
}

async fn ensure_slug_free(
    state: &AppState,
    module_id: DbId,
    slug: &str,
    exclude: Option<DbId>,
) -> AppResult<()> {
    if LessonRepo::slug_exists_in_module(&state.pool, module_id, slug, exclude).await? {
        return Err(CoreError::Validation(format!(
            "Slug '{slug}' is already used by another lesson in this module"
        ))
        .into());
    }
    Ok(())
}

/// GET /api/v1/creator/modules/{module_id}/lessons
pub async fn list_by_module(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(module_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Lesson>>>> {
    require_owner(&state.pool, &user, ContentNode::Module(module_id)).await?;
    let lessons = LessonRepo::list_by_module(&state.pool, module_id).await?;
    Ok(Json(DataResponse { data: lessons }))
}

/// POST /api/v1/creator/modules/{module_id}/lessons
pub async fn create(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(module_id): Path<DbId>,
    AppJson(input): AppJson<CreateLesson>,
) -> AppResult<(StatusCode, Json<DataResponse<Lesson>>)> {
    input.validate()?;
    validate_blocks(&input.content_blocks)?;
    require_owner(&state.pool, &user, ContentNode::Module(module_id)).await?;
    ensure_slug_free(&state, module_id, &input.slug, None).await?;

    let lesson = LessonRepo::create(&state.pool, module_id, &input).await?;
    tracing::info!(
        user_id = user.user_id,
        module_id,
        lesson_id = lesson.id,
        order_index = lesson.order_index,
        "Lesson created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: lesson })))
}

/// PUT /api/v1/creator/modules/{module_id}/lessons/reorder
pub async fn reorder(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(module_id): Path<DbId>,
    AppJson(input): AppJson<ReorderRequest>,
) -> AppResult<Json<DataResponse<Vec<Lesson>>>> {
    require_owner(&state.pool, &user, ContentNode::Module(module_id)).await?;
    let lessons = LessonRepo::reorder(&state.pool, module_id, &input.items).await?;
    tracing::info!(user_id = user.user_id, module_id, count = lessons.len(), "Lessons reordered");
    Ok(Json(DataResponse { data: lessons }))
}

/// GET /api/v1/creator/lessons/{id}
pub async fn get_by_id(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Lesson>>> {
    require_owner(&state.pool, &user, ContentNode::Lesson(id)).await?;
    let lesson = LessonRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: lesson }))
}

/// PUT /api/v1/creator/lessons/{id}
pub async fn update(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateLesson>,
) -> AppResult<Json<DataResponse<Lesson>>> {
    input.validate()?;
    if let Some(blocks) = &input.content_blocks {
        validate_blocks(blocks)?;
    }
    require_owner(&state.pool, &user, ContentNode::Lesson(id)).await?;
    if let Some(slug) = &input.slug {
        let current = LessonRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        ensure_slug_free(&state, current.module_id, slug, Some(id)).await?;
    }

    let lesson = LessonRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(user_id = user.user_id, lesson_id = id, "Lesson updated");
    Ok(Json(DataResponse { data: lesson }))
}

/// PATCH /api/v1/creator/lessons/{id}/content
///
/// Autosave: replaces only the content blocks.
pub async fn autosave(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<AutosaveLesson>,
) -> AppResult<Json<DataResponse<AutosaveAck>>> {
    validate_blocks(&input.content_blocks)?;
    require_owner(&state.pool, &user, ContentNode::Lesson(id)).await?;

    let ack = LessonRepo::autosave(&state.pool, id, &input.content_blocks)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::debug!(
        user_id = user.user_id,
        lesson_id = id,
        blocks = input.content_blocks.len(),
        "Lesson content autosaved"
    );
    Ok(Json(DataResponse { data: ack }))
}

/// DELETE /api/v1/creator/lessons/{id}
pub async fn delete(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_owner(&state.pool, &user, ContentNode::Lesson(id)).await?;
    if !LessonRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(user_id = user.user_id, lesson_id = id, "Lesson deleted");
    Ok(StatusCode::NO_CONTENT)
}
