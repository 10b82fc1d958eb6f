//! Repository for the `notes` table.

use sqlx::PgPool;
use trailhead_core::types::DbId;

use crate::models::note::{CreateNote, Note, NoteFilter, UpdateNote};

const COLUMNS: &str =
    "id, user_id, lesson_id, note_type, title, content, tags, created_at, updated_at";

pub struct NoteRepo;

impl NoteRepo {
    pub async fn create(pool: &PgPool, user_id: DbId, input: &CreateNote) -> Result<Note, sqlx::Error> {
        let query = format!(
            "INSERT INTO notes (user_id, lesson_id, note_type, title, content, tags)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(user_id)
            .bind(input.lesson_id)
            .bind(&input.note_type)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.tags)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes WHERE id = $1");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's notes, most recently edited first, with optional filters.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        filter: &NoteFilter,
    ) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes
             WHERE user_id = $1
               AND ($2::BIGINT IS NULL OR lesson_id = $2)
               AND ($3::TEXT IS NULL OR note_type = $3)
             ORDER BY updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(user_id)
            .bind(filter.lesson_id)
            .bind(&filter.note_type)
            .fetch_all(pool)
            .await
    }

    /// Update a note. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNote,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET
                note_type = COALESCE($2, note_type),
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                tags = COALESCE($5, tags),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(&input.note_type)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.tags)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
