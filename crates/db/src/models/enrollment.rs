//! Enrollment entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trailhead_core::types::{DbId, Timestamp};

/// A row from the `enrollments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Enrollment {
    pub id: DbId,
    pub user_id: DbId,
    pub path_id: DbId,
    pub enrolled_at: Timestamp,
    pub last_accessed_at: Timestamp,
}

/// An enrollment joined with the summary fields of its path.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EnrollmentWithPath {
    pub id: DbId,
    pub path_id: DbId,
    pub path_title: String,
    pub path_slug: String,
    pub path_thumbnail_url: Option<String>,
    pub enrolled_at: Timestamp,
    pub last_accessed_at: Timestamp,
}

/// DTO for enrolling in a path.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEnrollment {
    #[serde(alias = "pathId")]
    pub path_id: DbId,
}
