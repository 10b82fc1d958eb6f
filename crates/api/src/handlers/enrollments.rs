//! Handlers for `/learn/enrollments`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use trailhead_core::error::CoreError;
use trailhead_core::types::DbId;
use trailhead_db::models::enrollment::{CreateEnrollment, Enrollment, EnrollmentWithPath};
use trailhead_db::repositories::{EnrollmentRepo, LearningPathRepo};

use crate::error::AppResult;
use crate::middleware::json::AppJson;
use crate::middleware::rbac::RequireLearner;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/learn/enrollments
pub async fn list(
    RequireLearner(user): RequireLearner,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<EnrollmentWithPath>>>> {
    let enrollments = EnrollmentRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: enrollments }))
}

/// POST /api/v1/learn/enrollments
///
/// 201 on a new enrollment, 200 with the existing row otherwise. Only
/// discoverable paths accept enrollments.
pub async fn enroll(
    RequireLearner(user): RequireLearner,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateEnrollment>,
) -> AppResult<(StatusCode, Json<DataResponse<Enrollment>>)> {
    let not_found = CoreError::NotFound {
        entity: "LearningPath",
        id: input.path_id,
    };
    let path = LearningPathRepo::find_by_id(&state.pool, input.path_id)
        .await?
        .ok_or(not_found)?;
    if !path.publication()?.is_discoverable() {
        return Err(CoreError::NotFound {
            entity: "LearningPath",
            id: input.path_id,
        }
        .into());
    }

    let (enrollment, created) = EnrollmentRepo::enroll(&state.pool, user.user_id, path.id).await?;
    let status = if created {
        tracing::info!(user_id = user.user_id, path_id = path.id, "Enrolled in path");
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(DataResponse { data: enrollment })))
}

/// DELETE /api/v1/learn/enrollments/{path_id}
pub async fn unenroll(
    RequireLearner(user): RequireLearner,
    State(state): State<AppState>,
    Path(path_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !EnrollmentRepo::unenroll(&state.pool, user.user_id, path_id).await? {
        return Err(CoreError::NotFound {
            entity: "Enrollment",
            id: path_id,
        }
        .into());
    }
    tracing::info!(user_id = user.user_id, path_id, "Unenrolled from path");
    Ok(StatusCode::NO_CONTENT)
}
