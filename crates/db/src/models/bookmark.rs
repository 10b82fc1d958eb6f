//! Bookmark entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trailhead_core::types::{DbId, Timestamp};

/// A row from the `bookmarks` table. `target_id` points at a lesson,
/// module, path or creator depending on `bookmark_type`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Bookmark {
    pub id: DbId,
    pub user_id: DbId,
    pub bookmark_type: String,
    pub target_id: DbId,
    pub created_at: Timestamp,
}

/// DTO for creating a bookmark.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookmark {
    #[serde(alias = "bookmarkType")]
    pub bookmark_type: String,
    #[serde(alias = "targetId")]
    pub target_id: DbId,
}

/// Filter for listing a learner's bookmarks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookmarkFilter {
    #[serde(alias = "bookmarkType")]
    pub bookmark_type: Option<String>,
}
