//! Repository for the `lessons` table.

use sqlx::types::Json;
use sqlx::PgPool;
use trailhead_core::error::CoreError;
use trailhead_core::ordering::{insertion_index, plan_reorder, ReorderItem};
use trailhead_core::types::DbId;

use crate::models::lesson::{AutosaveAck, CreateLesson, Lesson, LessonPosition, UpdateLesson};
use crate::repositories::bookmark_repo::BookmarkRepo;
use crate::repositories::sibling_order::LESSONS_IN_MODULE;
use crate::RepoError;

const COLUMNS: &str = "id, module_id, title, slug, content_blocks, order_index, \
    estimated_minutes, created_at, updated_at";

/// Provides CRUD, autosave and ordering for lessons within a module.
pub struct LessonRepo;

impl LessonRepo {
    /// Insert a lesson into a module, appending unless `order_index` names
    /// an existing slot.
    pub async fn create(
        pool: &PgPool,
        module_id: DbId,
        input: &CreateLesson,
    ) -> Result<Lesson, RepoError> {
        let mut tx = pool.begin().await?;

        if !LESSONS_IN_MODULE.lock_parent(&mut *tx, module_id).await? {
            return Err(CoreError::NotFound {
                entity: "Module",
                id: module_id,
            }
            .into());
        }
        let count = LESSONS_IN_MODULE.count(&mut *tx, module_id).await?;
        let order_index = insertion_index(input.order_index, count);
        LESSONS_IN_MODULE.open_slot(&mut *tx, module_id, order_index).await?;

        let query = format!(
            "INSERT INTO lessons (module_id, title, slug, content_blocks, order_index, estimated_minutes)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 0))
             RETURNING {COLUMNS}"
        );
        let lesson = sqlx::query_as::<_, Lesson>(&query)
            .bind(module_id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(Json(&input.content_blocks))
            .bind(order_index)
            .bind(input.estimated_minutes)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(lesson)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lessons WHERE id = $1");
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_module(
        pool: &PgPool,
        module_id: DbId,
    ) -> Result<Vec<Lesson>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM lessons WHERE module_id = $1 ORDER BY order_index");
        sqlx::query_as::<_, Lesson>(&query)
            .bind(module_id)
            .fetch_all(pool)
            .await
    }

    /// Every lesson of a path, ordered by module order then lesson order.
    pub async fn list_by_path(pool: &PgPool, path_id: DbId) -> Result<Vec<Lesson>, sqlx::Error> {
        let columns = prefixed_columns("l");
        let query = format!(
            "SELECT {columns} FROM lessons l
             JOIN modules m ON m.id = l.module_id
             WHERE m.path_id = $1
             ORDER BY m.order_index, l.order_index"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(path_id)
            .fetch_all(pool)
            .await
    }

    /// Whether `slug` is taken in the module by a lesson other than `exclude_id`.
    pub async fn slug_exists_in_module(
        pool: &PgPool,
        module_id: DbId,
        slug: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM lessons
                WHERE module_id = $1 AND slug = $2 AND ($3::BIGINT IS NULL OR id <> $3))",
        )
        .bind(module_id)
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Update a lesson. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLesson,
    ) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!(
            "UPDATE lessons SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                content_blocks = COALESCE($4, content_blocks),
                estimated_minutes = COALESCE($5, estimated_minutes),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(input.content_blocks.as_ref().map(Json))
            .bind(input.estimated_minutes)
            .fetch_optional(pool)
            .await
    }

    /// Replace only the content blocks.
    pub async fn autosave(
        pool: &PgPool,
        id: DbId,
        blocks: &[trailhead_core::content_block::ContentBlock],
    ) -> Result<Option<AutosaveAck>, sqlx::Error> {
        sqlx::query_as::<_, AutosaveAck>(
            "UPDATE lessons SET content_blocks = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING id, updated_at AS saved_at",
        )
        .bind(id)
        .bind(Json(blocks))
        .fetch_optional(pool)
        .await
    }

    /// Delete a lesson and its bookmarks, closing the gap in the module's
    /// ordering. Returns `true` if the lesson existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let Some(lesson) = Self::find_by_id(pool, id).await? else {
            return Ok(false);
        };

        let mut tx = pool.begin().await?;
        LESSONS_IN_MODULE.lock_parent(&mut *tx, lesson.module_id).await?;

        BookmarkRepo::delete_for_lesson(&mut *tx, id).await?;
        let removed: Option<i32> = sqlx::query_scalar(
            "DELETE FROM lessons WHERE id = $1 AND module_id = $2 RETURNING order_index",
        )
        .bind(id)
        .bind(lesson.module_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(removed) = removed else {
            return Ok(false);
        };
        LESSONS_IN_MODULE.close_slot(&mut *tx, lesson.module_id, removed).await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Apply a full reordering of a module's lessons.
    pub async fn reorder(
        pool: &PgPool,
        module_id: DbId,
        items: &[ReorderItem],
    ) -> Result<Vec<Lesson>, RepoError> {
        let mut tx = pool.begin().await?;

        if !LESSONS_IN_MODULE.lock_parent(&mut *tx, module_id).await? {
            return Err(CoreError::NotFound {
                entity: "Module",
                id: module_id,
            }
            .into());
        }
        let siblings = LESSONS_IN_MODULE.sibling_ids(&mut *tx, module_id).await?;
        let plan = plan_reorder(&siblings, items)?;
        LESSONS_IN_MODULE.apply(&mut *tx, module_id, &plan).await?;

        tx.commit().await?;
        Ok(Self::list_by_module(pool, module_id).await?)
    }

    /// Zero-based position of a lesson across its whole path.
    pub async fn position_in_path(
        pool: &PgPool,
        lesson_id: DbId,
    ) -> Result<Option<LessonPosition>, sqlx::Error> {
        sqlx::query_as::<_, LessonPosition>(
            "SELECT lesson_id, module_id, path_id, position FROM (
                SELECT l.id AS lesson_id, l.module_id, m.path_id,
                       ROW_NUMBER() OVER (ORDER BY m.order_index, l.order_index) - 1 AS position
                FROM lessons l
                JOIN modules m ON m.id = l.module_id
                WHERE m.path_id = (
                    SELECT m2.path_id FROM lessons l2
                    JOIN modules m2 ON m2.id = l2.module_id
                    WHERE l2.id = $1)
             ) ranked
             WHERE lesson_id = $1",
        )
        .bind(lesson_id)
        .fetch_optional(pool)
        .await
    }
}

fn prefixed_columns(alias: &str) -> String {
    COLUMNS
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}
