//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trailhead_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user. `role` defaults to `learner`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}
