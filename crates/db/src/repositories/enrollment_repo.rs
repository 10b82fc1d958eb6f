//! Repository for the `enrollments` table.

use sqlx::PgPool;
use trailhead_core::types::DbId;

use crate::models::enrollment::{Enrollment, EnrollmentWithPath};

const COLUMNS: &str = "id, user_id, path_id, enrolled_at, last_accessed_at";

pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Enroll a user, returning the enrollment and whether it was new.
    ///
    /// An existing enrollment is returned unchanged; `enrollment_count`
    /// only moves on insert.
    pub async fn enroll(
        pool: &PgPool,
        user_id: DbId,
        path_id: DbId,
    ) -> Result<(Enrollment, bool), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert = format!(
            "INSERT INTO enrollments (user_id, path_id)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_enrollments_user_path DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Enrollment>(&insert)
            .bind(user_id)
            .bind(path_id)
            .fetch_optional(&mut *tx)
            .await?;

        let result = match inserted {
            Some(enrollment) => {
                sqlx::query(
                    "UPDATE learning_paths SET enrollment_count = enrollment_count + 1
                     WHERE id = $1",
                )
                .bind(path_id)
                .execute(&mut *tx)
                .await?;
                (enrollment, true)
            }
            None => {
                let existing = format!(
                    "SELECT {COLUMNS} FROM enrollments WHERE user_id = $1 AND path_id = $2"
                );
                let enrollment = sqlx::query_as::<_, Enrollment>(&existing)
                    .bind(user_id)
                    .bind(path_id)
                    .fetch_one(&mut *tx)
                    .await?;
                (enrollment, false)
            }
        };

        tx.commit().await?;
        Ok(result)
    }

    /// Remove an enrollment. Returns `false` if the user was not enrolled.
    pub async fn unenroll(pool: &PgPool, user_id: DbId, path_id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query("DELETE FROM enrollments WHERE user_id = $1 AND path_id = $2")
            .bind(user_id)
            .bind(path_id)
            .execute(&mut *tx)
            .await?;
        let removed = result.rows_affected() > 0;

        if removed {
            sqlx::query(
                "UPDATE learning_paths SET enrollment_count = GREATEST(enrollment_count - 1, 0)
                 WHERE id = $1",
            )
            .bind(path_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(removed)
    }

    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        path_id: DbId,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM enrollments WHERE user_id = $1 AND path_id = $2");
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(path_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn is_enrolled(pool: &PgPool, user_id: DbId, path_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE user_id = $1 AND path_id = $2)",
        )
        .bind(user_id)
        .bind(path_id)
        .fetch_one(pool)
        .await
    }

    /// A user's enrollments with path summaries, most recently accessed first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<EnrollmentWithPath>, sqlx::Error> {
        sqlx::query_as::<_, EnrollmentWithPath>(
            "SELECT e.id, e.path_id, p.title AS path_title, p.slug AS path_slug,
                    p.thumbnail_url AS path_thumbnail_url, e.enrolled_at, e.last_accessed_at
             FROM enrollments e
             JOIN learning_paths p ON p.id = e.path_id
             WHERE e.user_id = $1
             ORDER BY e.last_accessed_at DESC, e.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Bump `last_accessed_at` if the user is enrolled.
    pub async fn touch(pool: &PgPool, user_id: DbId, path_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE enrollments SET last_accessed_at = NOW()
             WHERE user_id = $1 AND path_id = $2",
        )
        .bind(user_id)
        .bind(path_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
