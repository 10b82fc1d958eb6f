//! Handlers for `/learn/bookmarks`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use trailhead_core::error::CoreError;
use trailhead_core::learner::{
    validate_bookmark_type, BOOKMARK_CREATOR, BOOKMARK_LESSON, BOOKMARK_MODULE, BOOKMARK_PATH,
};
use trailhead_core::ownership::ContentNode;
use trailhead_core::types::DbId;
use trailhead_db::models::bookmark::{Bookmark, BookmarkFilter, CreateBookmark};
use trailhead_db::repositories::{BookmarkRepo, OwnershipRepo};

use crate::error::{AppError, AppResult};
use crate::guard::resolve_path_view;
use crate::middleware::auth::AuthUser;
use crate::middleware::json::AppJson;
use crate::middleware::rbac::RequireLearner;
use crate::response::DataResponse;
use crate::state::AppState;

fn target_entity(bookmark_type: &str) -> &'static str {
    match bookmark_type {
        BOOKMARK_LESSON => "Lesson",
        BOOKMARK_MODULE => "Module",
        BOOKMARK_CREATOR => "User",
        _ => "LearningPath",
    }
}

/// Check the bookmark target exists and, for content, that the caller may
/// see the path it belongs to. Hidden content is NotFound.
async fn require_visible_target(
    state: &AppState,
    user: &AuthUser,
    input: &CreateBookmark,
) -> AppResult<()> {
    let not_found = || -> AppError {
        CoreError::NotFound {
            entity: target_entity(&input.bookmark_type),
            id: input.target_id,
        }
        .into()
    };

    let node = match input.bookmark_type.as_str() {
        BOOKMARK_PATH => ContentNode::Path(input.target_id),
        BOOKMARK_MODULE => ContentNode::Module(input.target_id),
        BOOKMARK_LESSON => ContentNode::Lesson(input.target_id),
        _ => {
            if !BookmarkRepo::target_exists(&state.pool, &input.bookmark_type, input.target_id)
                .await?
            {
                return Err(not_found());
            }
            return Ok(());
        }
    };

    let chain = OwnershipRepo::resolve(&state.pool, node)
        .await?
        .ok_or_else(not_found)?;
    match resolve_path_view(&state.pool, user, chain.path_id).await {
        Ok(_) => Ok(()),
        Err(AppError::Core(CoreError::NotFound { .. })) => Err(not_found()),
        Err(other) => Err(other),
    }
}

/// GET /api/v1/learn/bookmarks?bookmark_type=
pub async fn list(
    RequireLearner(user): RequireLearner,
    State(state): State<AppState>,
    Query(filter): Query<BookmarkFilter>,
) -> AppResult<Json<DataResponse<Vec<Bookmark>>>> {
    if let Some(bookmark_type) = &filter.bookmark_type {
        validate_bookmark_type(bookmark_type).map_err(CoreError::Validation)?;
    }
    let bookmarks = BookmarkRepo::list_for_user(&state.pool, user.user_id, &filter).await?;
    Ok(Json(DataResponse { data: bookmarks }))
}

/// POST /api/v1/learn/bookmarks
///
/// Idempotent on `(user, bookmark_type, target_id)`: 201 when a bookmark is
/// created, 200 with the existing row otherwise.
pub async fn create(
    RequireLearner(user): RequireLearner,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateBookmark>,
) -> AppResult<(StatusCode, Json<DataResponse<Bookmark>>)> {
    validate_bookmark_type(&input.bookmark_type).map_err(CoreError::Validation)?;
    require_visible_target(&state, &user, &input).await?;

    let (bookmark, created) = BookmarkRepo::create(&state.pool, user.user_id, &input).await?;
    if !created {
        return Ok((StatusCode::OK, Json(DataResponse { data: bookmark })));
    }
    tracing::info!(
        user_id = user.user_id,
        bookmark_id = bookmark.id,
        bookmark_type = %bookmark.bookmark_type,
        target_id = bookmark.target_id,
        "Bookmark saved"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: bookmark })))
}

/// DELETE /api/v1/learn/bookmarks/{id}
pub async fn delete(
    RequireLearner(user): RequireLearner,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let bookmark = BookmarkRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Bookmark",
            id,
        })?;
    if bookmark.user_id != user.user_id {
        tracing::warn!(user_id = user.user_id, bookmark_id = id, "Bookmark belongs to another user");
        return Err(CoreError::Forbidden(format!("Not authorized to modify Bookmark {id}")).into());
    }

    BookmarkRepo::delete(&state.pool, id).await?;
    tracing::info!(user_id = user.user_id, bookmark_id = id, "Bookmark deleted");
    Ok(StatusCode::NO_CONTENT)
}
