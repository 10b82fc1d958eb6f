//! Learner note entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trailhead_core::learner::MAX_NOTE_CONTENT_LENGTH;
use trailhead_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Note {
    pub id: DbId,
    pub user_id: DbId,
    pub lesson_id: DbId,
    pub note_type: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a note on a lesson.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNote {
    #[serde(alias = "lessonId")]
    pub lesson_id: DbId,
    #[serde(alias = "noteType")]
    #[validate(custom(function = "trailhead_core::learner::note_type_rule"))]
    pub note_type: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = MAX_NOTE_CONTENT_LENGTH))]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// DTO for editing a note. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateNote {
    #[serde(alias = "noteType")]
    #[validate(custom(function = "trailhead_core::learner::note_type_rule"))]
    pub note_type: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = MAX_NOTE_CONTENT_LENGTH))]
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Filters for listing a learner's notes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteFilter {
    #[serde(alias = "lessonId")]
    pub lesson_id: Option<DbId>,
    #[serde(alias = "noteType")]
    pub note_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(content: String) -> CreateNote {
        CreateNote {
            lesson_id: 1,
            note_type: "insight".to_string(),
            title: "Layers".to_string(),
            content,
            tags: vec![],
        }
    }

    #[test]
    fn content_within_limit_is_accepted() {
        let content = "x".repeat(MAX_NOTE_CONTENT_LENGTH as usize);
        assert!(create(content).validate().is_ok());
    }

    #[test]
    fn content_over_limit_is_rejected() {
        let content = "x".repeat(MAX_NOTE_CONTENT_LENGTH as usize + 1);
        let errors = create(content).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("content"));
    }

    #[test]
    fn unknown_note_type_is_rejected() {
        let mut note = create("fine".to_string());
        note.note_type = "rant".to_string();
        let errors = note.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("note_type"));
    }
}
