//! Repository for the `progress` table.

use sqlx::types::Json;
use sqlx::PgPool;
use trailhead_core::learner::{status_for_percentage, PROGRESS_COMPLETED, PROGRESS_NOT_STARTED};
use trailhead_core::types::DbId;

use crate::models::progress::{LessonProgress, Progress, RecordProgress};

const COLUMNS: &str = "id, user_id, lesson_id, status, completion_percentage, \
    time_spent_seconds, last_position, created_at, updated_at";

pub struct ProgressRepo;

impl ProgressRepo {
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<Option<Progress>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM progress WHERE user_id = $1 AND lesson_id = $2");
        sqlx::query_as::<_, Progress>(&query)
            .bind(user_id)
            .bind(lesson_id)
            .fetch_optional(pool)
            .await
    }

    /// Upsert to `completed` / 100. Repeated calls leave a single row.
    pub async fn mark_complete(
        pool: &PgPool,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<Progress, sqlx::Error> {
        let query = format!(
            "INSERT INTO progress (user_id, lesson_id, status, completion_percentage)
             VALUES ($1, $2, $3, 100)
             ON CONFLICT ON CONSTRAINT uq_progress_user_lesson DO UPDATE SET
                status = EXCLUDED.status,
                completion_percentage = 100,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Progress>(&query)
            .bind(user_id)
            .bind(lesson_id)
            .bind(PROGRESS_COMPLETED)
            .fetch_one(pool)
            .await
    }

    /// Reset an existing row to `not_started` / 0. Returns `None` when the
    /// learner never had progress on the lesson.
    pub async fn mark_incomplete(
        pool: &PgPool,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<Option<Progress>, sqlx::Error> {
        let query = format!(
            "UPDATE progress SET status = $3, completion_percentage = 0, updated_at = NOW()
             WHERE user_id = $1 AND lesson_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Progress>(&query)
            .bind(user_id)
            .bind(lesson_id)
            .bind(PROGRESS_NOT_STARTED)
            .fetch_optional(pool)
            .await
    }

    /// Upsert progress. Omitted fields keep their stored value; on first
    /// write they take the column defaults. A percentage without a status
    /// derives the status from the percentage.
    pub async fn record(
        pool: &PgPool,
        user_id: DbId,
        lesson_id: DbId,
        input: &RecordProgress,
    ) -> Result<Progress, sqlx::Error> {
        let status = input.status.clone().or_else(|| {
            input
                .completion_percentage
                .map(|pct| status_for_percentage(pct).to_string())
        });
        let query = format!(
            "INSERT INTO progress
                (user_id, lesson_id, status, completion_percentage, time_spent_seconds, last_position)
             VALUES ($1, $2, COALESCE($3, 'not_started'), COALESCE($4, 0), COALESCE($5, 0), $6)
             ON CONFLICT ON CONSTRAINT uq_progress_user_lesson DO UPDATE SET
                status = COALESCE($3, progress.status),
                completion_percentage = COALESCE($4, progress.completion_percentage),
                time_spent_seconds = COALESCE($5, progress.time_spent_seconds),
                last_position = COALESCE($6, progress.last_position),
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Progress>(&query)
            .bind(user_id)
            .bind(lesson_id)
            .bind(status)
            .bind(input.completion_percentage)
            .bind(input.time_spent_seconds)
            .bind(input.last_position.as_ref().map(Json))
            .fetch_one(pool)
            .await
    }

    /// Every lesson of a path in flattened order with the user's progress,
    /// defaulting untouched lessons to `not_started` / 0.
    pub async fn list_for_path(
        pool: &PgPool,
        user_id: DbId,
        path_id: DbId,
    ) -> Result<Vec<LessonProgress>, sqlx::Error> {
        sqlx::query_as::<_, LessonProgress>(
            "SELECT l.id AS lesson_id, l.title AS lesson_title, m.id AS module_id,
                    m.order_index AS module_order_index, l.order_index AS lesson_order_index,
                    COALESCE(pr.status, 'not_started') AS status,
                    COALESCE(pr.completion_percentage, 0) AS completion_percentage,
                    COALESCE(pr.time_spent_seconds, 0) AS time_spent_seconds,
                    pr.last_position, pr.updated_at
             FROM lessons l
             JOIN modules m ON m.id = l.module_id
             LEFT JOIN progress pr ON pr.lesson_id = l.id AND pr.user_id = $1
             WHERE m.path_id = $2
             ORDER BY m.order_index, l.order_index",
        )
        .bind(user_id)
        .bind(path_id)
        .fetch_all(pool)
        .await
    }
}
