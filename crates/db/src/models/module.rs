//! Module entity model and DTOs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trailhead_core::ordering::ReorderItem;
use trailhead_core::slug::MAX_TITLE_LENGTH;
use trailhead_core::types::{DbId, OrderIndex, Timestamp};
use validator::Validate;

use crate::models::lesson::Lesson;

/// A row from the `modules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Module {
    pub id: DbId,
    pub path_id: DbId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub order_index: OrderIndex,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a module under a path.
///
/// `order_index` is an insertion hint: omitted or past the end appends.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateModule {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH))]
    pub title: String,
    #[validate(custom(function = "trailhead_core::slug::slug_rule"))]
    pub slug: String,
    pub description: Option<String>,
    pub order_index: Option<OrderIndex>,
}

/// DTO for updating a module. Ordering changes go through reorder.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateModule {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH))]
    pub title: Option<String>,
    #[validate(custom(function = "trailhead_core::slug::slug_rule"))]
    pub slug: Option<String>,
    pub description: Option<String>,
}

/// Body of a reorder request for modules or lessons.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderRequest {
    pub items: Vec<ReorderItem>,
}

/// A module with its lessons in order.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleWithLessons {
    #[serde(flatten)]
    pub module: Module,
    pub lessons: Vec<Lesson>,
}

impl ModuleWithLessons {
    /// Attach each lesson to its module by `module_id`, keeping the order of
    /// both inputs. Lessons whose module is not listed are dropped.
    pub fn group(modules: Vec<Module>, lessons: Vec<Lesson>) -> Vec<Self> {
        let mut by_module: HashMap<DbId, Vec<Lesson>> = HashMap::with_capacity(modules.len());
        for lesson in lessons {
            by_module.entry(lesson.module_id).or_default().push(lesson);
        }
        modules
            .into_iter()
            .map(|module| {
                let lessons = by_module.remove(&module.id).unwrap_or_default();
                Self { module, lessons }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;

    fn module(id: DbId, order_index: OrderIndex) -> Module {
        Module {
            id,
            path_id: 1,
            title: format!("Module {id}"),
            slug: format!("m{id}"),
            description: None,
            order_index,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn lesson(id: DbId, module_id: DbId, order_index: OrderIndex) -> Lesson {
        Lesson {
            id,
            module_id,
            title: format!("Lesson {id}"),
            slug: format!("l{id}"),
            content_blocks: Json(Vec::new()),
            order_index,
            estimated_minutes: 0,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn ids(group: &ModuleWithLessons) -> Vec<DbId> {
        group.lessons.iter().map(|l| l.id).collect()
    }

    #[test]
    fn lessons_follow_their_module_id() {
        let grouped = ModuleWithLessons::group(
            vec![module(10, 0), module(20, 1)],
            vec![lesson(1, 10, 0), lesson(2, 10, 1), lesson(3, 20, 0)],
        );
        assert_eq!(ids(&grouped[0]), vec![1, 2]);
        assert_eq!(ids(&grouped[1]), vec![3]);
    }

    #[test]
    fn lessons_out_of_module_order_are_not_misattributed() {
        // Module order and lesson order read from different snapshots.
        let grouped = ModuleWithLessons::group(
            vec![module(20, 0), module(10, 1)],
            vec![lesson(1, 10, 0), lesson(3, 20, 0), lesson(2, 10, 1)],
        );
        assert_eq!(grouped[0].module.id, 20);
        assert_eq!(ids(&grouped[0]), vec![3]);
        assert_eq!(ids(&grouped[1]), vec![1, 2]);
    }

    #[test]
    fn empty_and_unknown_modules() {
        let grouped = ModuleWithLessons::group(
            vec![module(10, 0), module(20, 1)],
            vec![lesson(1, 20, 0), lesson(9, 99, 0)],
        );
        assert!(grouped[0].lessons.is_empty());
        assert_eq!(ids(&grouped[1]), vec![1]);
    }
}
