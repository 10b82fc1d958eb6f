//! Repository for the `users` table.

use sqlx::PgPool;
use trailhead_core::types::DbId;

use crate::models::user::{CreateUser, User};

const COLUMNS: &str = "id, name, email, role, created_at, updated_at";

/// Minimal user lookups; accounts are provisioned outside this service.
pub struct UserRepo;

impl UserRepo {
    /// Insert a user. `role` defaults to `learner`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, role)
             VALUES ($1, $2, COALESCE($3, 'learner'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
