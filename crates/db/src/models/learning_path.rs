//! Learning path entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trailhead_core::error::CoreError;
use trailhead_core::gating::{GatingStrategy, PublicationState};
use trailhead_core::slug::MAX_TITLE_LENGTH;
use trailhead_core::types::{DbId, Timestamp};
use validator::Validate;

use crate::models::module::ModuleWithLessons;

/// A row from the `learning_paths` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LearningPath {
    pub id: DbId,
    pub creator_id: DbId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub difficulty_level: String,
    pub estimated_hours: Option<f64>,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub is_public: bool,
    pub gating_strategy: String,
    pub free_lesson_count: i32,
    pub view_count: i32,
    pub enrollment_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl LearningPath {
    /// The publication fields as a typed state.
    pub fn publication(&self) -> Result<PublicationState, CoreError> {
        let gating_strategy = GatingStrategy::parse(&self.gating_strategy).map_err(|_| {
            CoreError::Internal(format!(
                "learning path {} has unknown gating strategy '{}'",
                self.id, self.gating_strategy
            ))
        })?;
        Ok(PublicationState {
            is_published: self.is_published,
            is_public: self.is_public,
            gating_strategy,
            free_lesson_count: self.free_lesson_count,
        })
    }
}

/// DTO for creating a new learning path. New paths start as private drafts.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLearningPath {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH))]
    pub title: String,
    #[validate(custom(function = "trailhead_core::slug::slug_rule"))]
    pub slug: String,
    pub description: Option<String>,
    /// Defaults to `beginner` if omitted.
    #[serde(alias = "difficulty")]
    #[validate(custom(function = "trailhead_core::gating::difficulty_rule"))]
    pub difficulty_level: Option<String>,
    #[validate(range(min = 0.0))]
    pub estimated_hours: Option<f64>,
    pub tags: Option<Vec<String>>,
    #[validate(url)]
    pub thumbnail_url: Option<String>,
}

/// DTO for updating an existing path. All fields are optional.
///
/// Publication fields are changed through the publish operation only.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLearningPath {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH))]
    pub title: Option<String>,
    #[validate(custom(function = "trailhead_core::slug::slug_rule"))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "difficulty")]
    #[validate(custom(function = "trailhead_core::gating::difficulty_rule"))]
    pub difficulty_level: Option<String>,
    #[validate(range(min = 0.0))]
    pub estimated_hours: Option<f64>,
    pub tags: Option<Vec<String>>,
    #[validate(url)]
    pub thumbnail_url: Option<String>,
}

/// A path with its ordered modules, each with its ordered lessons.
#[derive(Debug, Clone, Serialize)]
pub struct PathTree {
    #[serde(flatten)]
    pub path: LearningPath,
    pub modules: Vec<ModuleWithLessons>,
}

/// How much of a path `duplicate` copies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateMode {
    /// The path row only.
    #[default]
    Shallow,
    /// The path plus every module and lesson.
    Deep,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(title: &str, slug: &str) -> CreateLearningPath {
        CreateLearningPath {
            title: title.to_string(),
            slug: slug.to_string(),
            description: None,
            difficulty_level: None,
            estimated_hours: None,
            tags: None,
            thumbnail_url: None,
        }
    }

    #[test]
    fn title_at_limit_is_accepted() {
        let title = "t".repeat(MAX_TITLE_LENGTH as usize);
        assert!(create(&title, "docker").validate().is_ok());
    }

    #[test]
    fn title_over_limit_is_rejected() {
        let title = "t".repeat(MAX_TITLE_LENGTH as usize + 1);
        let errors = create(&title, "docker").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn empty_update_title_is_rejected() {
        let update = UpdateLearningPath {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
