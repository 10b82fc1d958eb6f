//! Creator handlers for the `/creator/paths` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use trailhead_core::error::CoreError;
use trailhead_core::gating::PublishSettings;
use trailhead_core::ownership::ContentNode;
use trailhead_core::types::DbId;
use trailhead_db::models::learning_path::{
    CreateLearningPath, DuplicateMode, LearningPath, PathTree, UpdateLearningPath,
};
use trailhead_db::repositories::LearningPathRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::guard::require_owner;
use crate::middleware::json::AppJson;
use crate::middleware::rbac::RequireCreator;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `POST /creator/paths/{id}/duplicate`.
#[derive(Debug, Deserialize)]
pub struct DuplicateParams {
    #[serde(default)]
    pub mode: DuplicateMode,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "LearningPath",
        id,
    })
}

async fn ensure_slug_free(state: &AppState, slug: &str, exclude: Option<DbId>) -> AppResult<()> {
    if LearningPathRepo::slug_exists(&state.pool, slug, exclude).await? {
        return Err(CoreError::Validation(format!("Slug '{slug}' is already in use")).into());
    }
    Ok(())
}

/// GET /api/v1/creator/paths
pub async fn list(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<LearningPath>>>> {
    let paths = LearningPathRepo::list_by_creator(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: paths }))
}

/// POST /api/v1/creator/paths
pub async fn create(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateLearningPath>,
) -> AppResult<(StatusCode, Json<DataResponse<LearningPath>>)> {
    input.validate()?;
    ensure_slug_free(&state, &input.slug, None).await?;

    let path = LearningPathRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(user_id = user.user_id, path_id = path.id, slug = %path.slug, "Learning path created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: path })))
}

/// GET /api/v1/creator/paths/{id}
pub async fn get_by_id(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PathTree>>> {
    require_owner(&state.pool, &user, ContentNode::Path(id)).await?;
    let tree = LearningPathRepo::load_tree(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: tree }))
}

/// PUT /api/v1/creator/paths/{id}
pub async fn update(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateLearningPath>,
) -> AppResult<Json<DataResponse<LearningPath>>> {
    input.validate()?;
    require_owner(&state.pool, &user, ContentNode::Path(id)).await?;
    if let Some(slug) = &input.slug {
        ensure_slug_free(&state, slug, Some(id)).await?;
    }

    let path = LearningPathRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(user_id = user.user_id, path_id = id, "Learning path updated");
    Ok(Json(DataResponse { data: path }))
}

/// DELETE /api/v1/creator/paths/{id}
pub async fn delete(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_owner(&state.pool, &user, ContentNode::Path(id)).await?;
    if !LearningPathRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(user_id = user.user_id, path_id = id, "Learning path deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/creator/paths/{id}/publish
pub async fn publish(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(settings): AppJson<PublishSettings>,
) -> AppResult<Json<DataResponse<LearningPath>>> {
    require_owner(&state.pool, &user, ContentNode::Path(id)).await?;
    let patch = settings.into_patch()?;
    let path = LearningPathRepo::publish(&state.pool, id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(
        user_id = user.user_id,
        path_id = id,
        is_published = path.is_published,
        is_public = path.is_public,
        gating = %path.gating_strategy,
        "Learning path publication changed"
    );
    Ok(Json(DataResponse { data: path }))
}

/// POST /api/v1/creator/paths/{id}/duplicate?mode=shallow|deep
pub async fn duplicate(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<DuplicateParams>,
) -> AppResult<(StatusCode, Json<DataResponse<LearningPath>>)> {
    require_owner(&state.pool, &user, ContentNode::Path(id)).await?;
    let source = LearningPathRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let copy = LearningPathRepo::duplicate(&state.pool, &source, user.user_id, params.mode).await?;
    tracing::info!(
        user_id = user.user_id,
        source_id = id,
        path_id = copy.id,
        mode = ?params.mode,
        "Learning path duplicated"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: copy })))
}
