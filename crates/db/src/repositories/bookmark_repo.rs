//! Repository for the `bookmarks` table.

use sqlx::{PgConnection, PgPool};
use trailhead_core::learner::{BOOKMARK_CREATOR, BOOKMARK_LESSON, BOOKMARK_MODULE, BOOKMARK_PATH};
use trailhead_core::types::DbId;

use crate::models::bookmark::{Bookmark, BookmarkFilter, CreateBookmark};

const COLUMNS: &str = "id, user_id, bookmark_type, target_id, created_at";

pub struct BookmarkRepo;

impl BookmarkRepo {
    /// Insert a bookmark, or return the existing one for the same
    /// `(user, type, target)`. The flag is `true` when a row was inserted.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateBookmark,
    ) -> Result<(Bookmark, bool), sqlx::Error> {
        let insert = format!(
            "INSERT INTO bookmarks (user_id, bookmark_type, target_id)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_bookmarks_user_target DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Bookmark>(&insert)
            .bind(user_id)
            .bind(&input.bookmark_type)
            .bind(input.target_id)
            .fetch_optional(pool)
            .await?;
        if let Some(bookmark) = inserted {
            return Ok((bookmark, true));
        }

        let existing = format!(
            "SELECT {COLUMNS} FROM bookmarks
             WHERE user_id = $1 AND bookmark_type = $2 AND target_id = $3"
        );
        let bookmark = sqlx::query_as::<_, Bookmark>(&existing)
            .bind(user_id)
            .bind(&input.bookmark_type)
            .bind(input.target_id)
            .fetch_one(pool)
            .await?;
        Ok((bookmark, false))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Bookmark>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookmarks WHERE id = $1");
        sqlx::query_as::<_, Bookmark>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's bookmarks, newest first, optionally of one type.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        filter: &BookmarkFilter,
    ) -> Result<Vec<Bookmark>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookmarks
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR bookmark_type = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Bookmark>(&query)
            .bind(user_id)
            .bind(&filter.bookmark_type)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether the entity a bookmark would point at exists.
    ///
    /// Returns `false` for an unknown bookmark type.
    pub async fn target_exists(
        pool: &PgPool,
        bookmark_type: &str,
        target_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let table = match bookmark_type {
            BOOKMARK_LESSON => "lessons",
            BOOKMARK_MODULE => "modules",
            BOOKMARK_PATH => "learning_paths",
            BOOKMARK_CREATOR => "users",
            _ => return Ok(false),
        };
        let query = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1)");
        sqlx::query_scalar(&query)
            .bind(target_id)
            .fetch_one(pool)
            .await
    }

    /// Remove bookmarks on a path and everything beneath it.
    pub(crate) async fn delete_for_path(
        conn: &mut PgConnection,
        path_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM bookmarks WHERE
                (bookmark_type = 'path' AND target_id = $1)
             OR (bookmark_type = 'module'
                 AND target_id IN (SELECT id FROM modules WHERE path_id = $1))
             OR (bookmark_type = 'lesson'
                 AND target_id IN (SELECT l.id FROM lessons l
                                   JOIN modules m ON m.id = l.module_id
                                   WHERE m.path_id = $1))",
        )
        .bind(path_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Remove bookmarks on a module and its lessons.
    pub(crate) async fn delete_for_module(
        conn: &mut PgConnection,
        module_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM bookmarks WHERE
                (bookmark_type = 'module' AND target_id = $1)
             OR (bookmark_type = 'lesson'
                 AND target_id IN (SELECT id FROM lessons WHERE module_id = $1))",
        )
        .bind(module_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }

    pub(crate) async fn delete_for_lesson(
        conn: &mut PgConnection,
        lesson_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM bookmarks WHERE bookmark_type = 'lesson' AND target_id = $1")
                .bind(lesson_id)
                .execute(&mut *conn)
                .await?;
        Ok(result.rows_affected())
    }
}
