//! Creator handlers for modules: listed and created under
//! `/creator/paths/{path_id}/modules`, addressed directly at
//! `/creator/modules/{id}`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use trailhead_core::error::CoreError;
use trailhead_core::ownership::ContentNode;
use trailhead_core::types::DbId;
use trailhead_db::models::module::{
    CreateModule, Module, ModuleWithLessons, ReorderRequest, UpdateModule,
};
use trailhead_db::repositories::ModuleRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::guard::require_owner;
use crate::middleware::json::AppJson;
use crate::middleware::rbac::RequireCreator;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Module",
        id,
    })
}

async fn ensure_slug_free(
    state: &AppState,
    path_id: DbId,
    slug: &str,
    exclude: Option<DbId>,
) -> AppResult<()> {
    if ModuleRepo::slug_exists_in_path(&state.pool, path_id, slug, exclude).await? {
        return Err(CoreError::Validation(format!(
            "Slug '{slug}' is already used by another module in this path"
        ))
        .into());
    }
    Ok(())
}

/// GET /api/v1/creator/paths/{path_id}/modules
pub async fn list_by_path(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(path_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Module>>>> {
    require_owner(&state.pool, &user, ContentNode::Path(path_id)).await?;
    let modules = ModuleRepo::list_by_path(&state.pool, path_id).await?;
    Ok(Json(DataResponse { data: modules }))
}

/// POST /api/v1/creator/paths/{path_id}/modules
pub async fn create(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(path_id): Path<DbId>,
    AppJson(input): AppJson<CreateModule>,
) -> AppResult<(StatusCode, Json<DataResponse<Module>>)> {
    input.validate()?;
    require_owner(&state.pool, &user, ContentNode::Path(path_id)).await?;
    ensure_slug_free(&state, path_id, &input.slug, None).await?;

    let module = ModuleRepo::create(&state.pool, path_id, &input).await?;
    tracing::info!(
        user_id = user.user_id,
        path_id,
        module_id = module.id,
        order_index = module.order_index,
        "Module created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: module })))
}

/// PUT /api/v1/creator/paths/{path_id}/modules/reorder
pub async fn reorder(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(path_id): Path<DbId>,
    AppJson(input): AppJson<ReorderRequest>,
) -> AppResult<Json<DataResponse<Vec<Module>>>> {
    require_owner(&state.pool, &user, ContentNode::Path(path_id)).await?;
    let modules = ModuleRepo::reorder(&state.pool, path_id, &input.items).await?;
    tracing::info!(user_id = user.user_id, path_id, count = modules.len(), "Modules reordered");
    Ok(Json(DataResponse { data: modules }))
}

/// GET /api/v1/creator/modules/{id}
pub async fn get_by_id(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ModuleWithLessons>>> {
    require_owner(&state.pool, &user, ContentNode::Module(id)).await?;
    let module = ModuleRepo::find_with_lessons(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: module }))
}

/// PUT /api/v1/creator/modules/{id}
pub async fn update(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateModule>,
) -> AppResult<Json<DataResponse<Module>>> {
    input.validate()?;
    let chain = require_owner(&state.pool, &user, ContentNode::Module(id)).await?;
    if let Some(slug) = &input.slug {
        ensure_slug_free(&state, chain.path_id, slug, Some(id)).await?;
    }

    let module = ModuleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(user_id = user.user_id, module_id = id, "Module updated");
    Ok(Json(DataResponse { data: module }))
}

/// DELETE /api/v1/creator/modules/{id}
pub async fn delete(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let chain = require_owner(&state.pool, &user, ContentNode::Module(id)).await?;
    if !ModuleRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(
        user_id = user.user_id,
        path_id = chain.path_id,
        module_id = id,
        "Module deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}
