//! Lesson entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use trailhead_core::content_block::ContentBlock;
use trailhead_core::slug::MAX_TITLE_LENGTH;
use trailhead_core::types::{DbId, OrderIndex, Timestamp};
use validator::Validate;

/// A row from the `lessons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lesson {
    pub id: DbId,
    pub module_id: DbId,
    pub title: String,
    pub slug: String,
    pub content_blocks: Json<Vec<ContentBlock>>,
    pub order_index: OrderIndex,
    pub estimated_minutes: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a lesson under a module.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLesson {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH))]
    pub title: String,
    #[validate(custom(function = "trailhead_core::slug::slug_rule"))]
    pub slug: String,
    #[serde(default)]
    pub content_blocks: Vec<ContentBlock>,
    pub order_index: Option<OrderIndex>,
    #[validate(range(min = 0))]
    pub estimated_minutes: Option<i32>,
}

/// DTO for updating a lesson. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLesson {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH))]
    pub title: Option<String>,
    #[validate(custom(function = "trailhead_core::slug::slug_rule"))]
    pub slug: Option<String>,
    pub content_blocks: Option<Vec<ContentBlock>>,
    #[validate(range(min = 0))]
    pub estimated_minutes: Option<i32>,
}

/// Body of an autosave: content only.
#[derive(Debug, Clone, Deserialize)]
pub struct AutosaveLesson {
    pub content_blocks: Vec<ContentBlock>,
}

/// Acknowledgement returned by autosave.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AutosaveAck {
    pub id: DbId,
    pub saved_at: Timestamp,
}

/// A lesson's zero-based position across its whole path
/// (module order, then lesson order).
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct LessonPosition {
    pub lesson_id: DbId,
    pub module_id: DbId,
    pub path_id: DbId,
    pub position: i64,
}
