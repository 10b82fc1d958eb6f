//! Repository for the `learning_paths` table.

use sqlx::PgPool;
use trailhead_core::gating::PublicationPatch;
use trailhead_core::slug::{copy_slug, copy_title};
use trailhead_core::types::DbId;

use crate::models::learning_path::{
    CreateLearningPath, DuplicateMode, LearningPath, PathTree, UpdateLearningPath,
};
use crate::models::module::ModuleWithLessons;
use crate::repositories::bookmark_repo::BookmarkRepo;
use crate::repositories::lesson_repo::LessonRepo;
use crate::repositories::module_repo::ModuleRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, creator_id, title, slug, description, thumbnail_url, \
    difficulty_level, estimated_hours, tags, is_published, is_public, \
    gating_strategy, free_lesson_count, view_count, enrollment_count, \
    created_at, updated_at";

/// How many numbered suffixes `duplicate` tries before letting the unique
/// constraint decide.
const MAX_COPY_SLUG_ATTEMPTS: u32 = 10;

/// Provides CRUD, publication and duplication for learning paths.
pub struct LearningPathRepo;

impl LearningPathRepo {
    /// Insert a new path owned by `creator_id`. New paths are private drafts.
    pub async fn create(
        pool: &PgPool,
        creator_id: DbId,
        input: &CreateLearningPath,
    ) -> Result<LearningPath, sqlx::Error> {
        let query = format!(
            "INSERT INTO learning_paths
                (creator_id, title, slug, description, difficulty_level,
                 estimated_hours, tags, thumbnail_url)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'beginner'), $6,
                     COALESCE($7, '{{}}'::TEXT[]), $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LearningPath>(&query)
            .bind(creator_id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.difficulty_level)
            .bind(input.estimated_hours)
            .bind(&input.tags)
            .bind(&input.thumbnail_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<LearningPath>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM learning_paths WHERE id = $1");
        sqlx::query_as::<_, LearningPath>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<LearningPath>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM learning_paths WHERE slug = $1");
        sqlx::query_as::<_, LearningPath>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Whether `slug` is taken by a path other than `exclude_id`.
    pub async fn slug_exists(
        pool: &PgPool,
        slug: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM learning_paths
                WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// A creator's own paths, most recently updated first.
    pub async fn list_by_creator(
        pool: &PgPool,
        creator_id: DbId,
    ) -> Result<Vec<LearningPath>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM learning_paths
             WHERE creator_id = $1
             ORDER BY updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, LearningPath>(&query)
            .bind(creator_id)
            .fetch_all(pool)
            .await
    }

    /// Published and public paths, newest first.
    pub async fn list_discoverable(pool: &PgPool) -> Result<Vec<LearningPath>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM learning_paths
             WHERE is_published AND is_public
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, LearningPath>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update a path. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLearningPath,
    ) -> Result<Option<LearningPath>, sqlx::Error> {
        let query = format!(
            "UPDATE learning_paths SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                difficulty_level = COALESCE($5, difficulty_level),
                estimated_hours = COALESCE($6, estimated_hours),
                tags = COALESCE($7, tags),
                thumbnail_url = COALESCE($8, thumbnail_url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LearningPath>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.difficulty_level)
            .bind(input.estimated_hours)
            .bind(&input.tags)
            .bind(&input.thumbnail_url)
            .fetch_optional(pool)
            .await
    }

    /// Merge a publish patch onto the stored row. Omitted fields keep their
    /// current value; the merge runs inside the UPDATE itself.
    pub async fn publish(
        pool: &PgPool,
        id: DbId,
        patch: &PublicationPatch,
    ) -> Result<Option<LearningPath>, sqlx::Error> {
        let query = format!(
            "UPDATE learning_paths SET
                is_published = COALESCE($2, is_published),
                is_public = COALESCE($3, is_public),
                gating_strategy = COALESCE($4, gating_strategy),
                free_lesson_count = COALESCE($5, free_lesson_count),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LearningPath>(&query)
            .bind(id)
            .bind(patch.is_published)
            .bind(patch.is_public)
            .bind(patch.gating_strategy.map(|g| g.as_str()))
            .bind(patch.free_lesson_count)
            .fetch_optional(pool)
            .await
    }

    /// Delete a path with its modules, lessons and any bookmarks on them.
    /// Returns `true` if the path existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        BookmarkRepo::delete_for_path(&mut *tx, id).await?;
        let result = sqlx::query("DELETE FROM learning_paths WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn increment_view_count(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE learning_paths SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Load a path with its modules and lessons, each level in order.
    pub async fn load_tree(pool: &PgPool, id: DbId) -> Result<Option<PathTree>, sqlx::Error> {
        let Some(path) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let modules = ModuleRepo::list_by_path(pool, id).await?;
        let lessons = LessonRepo::list_by_path(pool, id).await?;
        let tree = ModuleWithLessons::group(modules, lessons);

        Ok(Some(PathTree {
            path,
            modules: tree,
        }))
    }

    /// Copy a path for `creator_id`.
    ///
    /// The copy is an unpublished private draft with zeroed counters, titled
    /// "{title} (Copy)". `Deep` also copies every module and lesson in the
    /// same transaction.
    pub async fn duplicate(
        pool: &PgPool,
        source: &LearningPath,
        creator_id: DbId,
        mode: DuplicateMode,
    ) -> Result<LearningPath, sqlx::Error> {
        let stamp = chrono::Utc::now().timestamp_millis();
        let mut slug = copy_slug(&source.slug, stamp, 0);
        for attempt in 1..MAX_COPY_SLUG_ATTEMPTS {
            if !Self::slug_exists(pool, &slug, None).await? {
                break;
            }
            slug = copy_slug(&source.slug, stamp, attempt);
        }

        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO learning_paths
                (creator_id, title, slug, description, thumbnail_url,
                 difficulty_level, estimated_hours, tags, is_published,
                 is_public, gating_strategy, free_lesson_count)
             SELECT $2, $3, $4, description, thumbnail_url,
                    difficulty_level, estimated_hours, tags, false,
                    false, gating_strategy, free_lesson_count
             FROM learning_paths WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let copy = sqlx::query_as::<_, LearningPath>(&query)
            .bind(source.id)
            .bind(creator_id)
            .bind(copy_title(&source.title))
            .bind(&slug)
            .fetch_one(&mut *tx)
            .await?;

        if mode == DuplicateMode::Deep {
            let module_ids: Vec<DbId> = sqlx::query_scalar(
                "SELECT id FROM modules WHERE path_id = $1 ORDER BY order_index",
            )
            .bind(source.id)
            .fetch_all(&mut *tx)
            .await?;

            for module_id in module_ids {
                let new_module_id: DbId = sqlx::query_scalar(
                    "INSERT INTO modules (path_id, title, slug, description, order_index)
                     SELECT $1, title, slug, description, order_index
                     FROM modules WHERE id = $2
                     RETURNING id",
                )
                .bind(copy.id)
                .bind(module_id)
                .fetch_one(&mut *tx)
                .await?;

                sqlx::query(
                    "INSERT INTO lessons
                        (module_id, title, slug, content_blocks, order_index, estimated_minutes)
                     SELECT $1, title, slug, content_blocks, order_index, estimated_minutes
                     FROM lessons WHERE module_id = $2",
                )
                .bind(new_module_id)
                .bind(module_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(copy)
    }
}
