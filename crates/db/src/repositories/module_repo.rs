//! Repository for the `modules` table.

use sqlx::PgPool;
use trailhead_core::error::CoreError;
use trailhead_core::ordering::{insertion_index, plan_reorder, ReorderItem};
use trailhead_core::types::DbId;

use crate::models::module::{CreateModule, Module, ModuleWithLessons, UpdateModule};
use crate::repositories::bookmark_repo::BookmarkRepo;
use crate::repositories::lesson_repo::LessonRepo;
use crate::repositories::sibling_order::MODULES_IN_PATH;
use crate::RepoError;

const COLUMNS: &str =
    "id, path_id, title, slug, description, order_index, created_at, updated_at";

/// Provides CRUD and ordering for modules within a path.
pub struct ModuleRepo;

impl ModuleRepo {
    /// Insert a module into a path.
    ///
    /// Appends unless `input.order_index` names an existing slot, in which
    /// case later modules shift down by one.
    pub async fn create(
        pool: &PgPool,
        path_id: DbId,
        input: &CreateModule,
    ) -> Result<Module, RepoError> {
        let mut tx = pool.begin().await?;

        if !MODULES_IN_PATH.lock_parent(&mut *tx, path_id).await? {
            return Err(CoreError::NotFound {
                entity: "LearningPath",
                id: path_id,
            }
            .into());
        }
        let count = MODULES_IN_PATH.count(&mut *tx, path_id).await?;
        let order_index = insertion_index(input.order_index, count);
        MODULES_IN_PATH.open_slot(&mut *tx, path_id, order_index).await?;

        let query = format!(
            "INSERT INTO modules (path_id, title, slug, description, order_index)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let module = sqlx::query_as::<_, Module>(&query)
            .bind(path_id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(order_index)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(module)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Module>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM modules WHERE id = $1");
        sqlx::query_as::<_, Module>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A module with its lessons in order.
    pub async fn find_with_lessons(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ModuleWithLessons>, sqlx::Error> {
        let Some(module) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let lessons = LessonRepo::list_by_module(pool, id).await?;
        Ok(Some(ModuleWithLessons { module, lessons }))
    }

    pub async fn list_by_path(pool: &PgPool, path_id: DbId) -> Result<Vec<Module>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM modules WHERE path_id = $1 ORDER BY order_index");
        sqlx::query_as::<_, Module>(&query)
            .bind(path_id)
            .fetch_all(pool)
            .await
    }

    /// Whether `slug` is taken in the path by a module other than `exclude_id`.
    pub async fn slug_exists_in_path(
        pool: &PgPool,
        path_id: DbId,
        slug: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM modules
                WHERE path_id = $1 AND slug = $2 AND ($3::BIGINT IS NULL OR id <> $3))",
        )
        .bind(path_id)
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Update a module. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateModule,
    ) -> Result<Option<Module>, sqlx::Error> {
        let query = format!(
            "UPDATE modules SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Module>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a module with its lessons and bookmarks, then close the gap
    /// in the path's ordering. Returns `true` if the module existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let Some(module) = Self::find_by_id(pool, id).await? else {
            return Ok(false);
        };

        let mut tx = pool.begin().await?;
        MODULES_IN_PATH.lock_parent(&mut *tx, module.path_id).await?;

        BookmarkRepo::delete_for_module(&mut *tx, id).await?;
        let removed: Option<i32> = sqlx::query_scalar(
            "DELETE FROM modules WHERE id = $1 AND path_id = $2 RETURNING order_index",
        )
        .bind(id)
        .bind(module.path_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(removed) = removed else {
            return Ok(false);
        };
        MODULES_IN_PATH.close_slot(&mut *tx, module.path_id, removed).await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Apply a full reordering of a path's modules.
    ///
    /// The request is validated against the sibling set read under the
    /// parent lock; a rejected request changes nothing.
    pub async fn reorder(
        pool: &PgPool,
        path_id: DbId,
        items: &[ReorderItem],
    ) -> Result<Vec<Module>, RepoError> {
        let mut tx = pool.begin().await?;

        if !MODULES_IN_PATH.lock_parent(&mut *tx, path_id).await? {
            return Err(CoreError::NotFound {
                entity: "LearningPath",
                id: path_id,
            }
            .into());
        }
        let siblings = MODULES_IN_PATH.sibling_ids(&mut *tx, path_id).await?;
        let plan = plan_reorder(&siblings, items)?;
        MODULES_IN_PATH.apply(&mut *tx, path_id, &plan).await?;

        tx.commit().await?;
        Ok(Self::list_by_path(pool, path_id).await?)
    }
}
