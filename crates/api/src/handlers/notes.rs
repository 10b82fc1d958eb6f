//! Handlers for `/learn/notes`. Notes are private to their author.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use trailhead_core::error::CoreError;
use trailhead_core::learner::validate_note_type;
use trailhead_core::types::DbId;
use trailhead_db::models::note::{CreateNote, Note, NoteFilter, UpdateNote};
use trailhead_db::repositories::NoteRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::guard::resolve_lesson_access;
use crate::middleware::auth::AuthUser;
use crate::middleware::json::AppJson;
use crate::middleware::rbac::RequireLearner;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a note and check the caller wrote it.
async fn owned_note(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Note> {
    let note = NoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Note", id }))?;
    if note.user_id != user.user_id {
        tracing::warn!(user_id = user.user_id, note_id = id, "Note belongs to another user");
        return Err(CoreError::Forbidden(format!("Not authorized to modify Note {id}")).into());
    }
    Ok(note)
}

/// GET /api/v1/learn/notes?lesson_id=&note_type=
pub async fn list(
    RequireLearner(user): RequireLearner,
    State(state): State<AppState>,
    Query(filter): Query<NoteFilter>,
) -> AppResult<Json<DataResponse<Vec<Note>>>> {
    if let Some(note_type) = &filter.note_type {
        validate_note_type(note_type).map_err(CoreError::Validation)?;
    }
    let notes = NoteRepo::list_for_user(&state.pool, user.user_id, &filter).await?;
    Ok(Json(DataResponse { data: notes }))
}

/// POST /api/v1/learn/notes
pub async fn create(
    RequireLearner(user): RequireLearner,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateNote>,
) -> AppResult<(StatusCode, Json<DataResponse<Note>>)> {
    input.validate()?;
    resolve_lesson_access(&state.pool, &user, input.lesson_id)
        .await?
        .require_accessible()?;

    let note = NoteRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(user_id = user.user_id, note_id = note.id, lesson_id = note.lesson_id, "Note created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}

/// PUT /api/v1/learn/notes/{id}
pub async fn update(
    RequireLearner(user): RequireLearner,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateNote>,
) -> AppResult<Json<DataResponse<Note>>> {
    input.validate()?;
    owned_note(&state, &user, id).await?;

    let note = NoteRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Note", id }))?;
    tracing::info!(user_id = user.user_id, note_id = id, "Note updated");
    Ok(Json(DataResponse { data: note }))
}

/// DELETE /api/v1/learn/notes/{id}
pub async fn delete(
    RequireLearner(user): RequireLearner,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_note(&state, &user, id).await?;
    NoteRepo::delete(&state.pool, id).await?;
    tracing::info!(user_id = user.user_id, note_id = id, "Note deleted");
    Ok(StatusCode::NO_CONTENT)
}
