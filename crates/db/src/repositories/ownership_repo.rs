//! Resolves the owning path and creator of any content node.
//!
//! Each lookup is a single JOIN; a missing row anywhere along the chain
//! yields `None`.

use sqlx::PgPool;
use trailhead_core::ownership::{ContentNode, OwnerChain};
use trailhead_core::types::DbId;

pub struct OwnershipRepo;

impl OwnershipRepo {
    /// Resolve the chain for any node kind.
    pub async fn resolve(pool: &PgPool, node: ContentNode) -> Result<Option<OwnerChain>, sqlx::Error> {
        match node {
            ContentNode::Path(id) => Self::for_path(pool, id).await,
            ContentNode::Module(id) => Self::for_module(pool, id).await,
            ContentNode::Lesson(id) => Self::for_lesson(pool, id).await,
        }
    }

    pub async fn for_path(pool: &PgPool, path_id: DbId) -> Result<Option<OwnerChain>, sqlx::Error> {
        let row: Option<(DbId, DbId)> =
            sqlx::query_as("SELECT id, creator_id FROM learning_paths WHERE id = $1")
                .bind(path_id)
                .fetch_optional(pool)
                .await?;
        Ok(row.map(into_chain))
    }

    pub async fn for_module(
        pool: &PgPool,
        module_id: DbId,
    ) -> Result<Option<OwnerChain>, sqlx::Error> {
        let row: Option<(DbId, DbId)> = sqlx::query_as(
            "SELECT p.id, p.creator_id
             FROM modules m
             JOIN learning_paths p ON p.id = m.path_id
             WHERE m.id = $1",
        )
        .bind(module_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(into_chain))
    }

    pub async fn for_lesson(
        pool: &PgPool,
        lesson_id: DbId,
    ) -> Result<Option<OwnerChain>, sqlx::Error> {
        let row: Option<(DbId, DbId)> = sqlx::query_as(
            "SELECT p.id, p.creator_id
             FROM lessons l
             JOIN modules m ON m.id = l.module_id
             JOIN learning_paths p ON p.id = m.path_id
             WHERE l.id = $1",
        )
        .bind(lesson_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(into_chain))
    }
}

fn into_chain((path_id, creator_id): (DbId, DbId)) -> OwnerChain {
    OwnerChain {
        path_id,
        creator_id,
    }
}
