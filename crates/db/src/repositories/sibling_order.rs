//! Transactional helpers that keep sibling `order_index` values dense.
//!
//! Every helper expects to run inside a transaction that has already locked
//! the parent row with [`SiblingScope::lock_parent`].

use sqlx::PgConnection;
use trailhead_core::types::{DbId, OrderIndex};

/// A child table ordered within a parent table.
pub(crate) struct SiblingScope {
    pub table: &'static str,
    pub parent_table: &'static str,
    pub parent_column: &'static str,
}

pub(crate) const MODULES_IN_PATH: SiblingScope = SiblingScope {
    table: "modules",
    parent_table: "learning_paths",
    parent_column: "path_id",
};

pub(crate) const LESSONS_IN_MODULE: SiblingScope = SiblingScope {
    table: "lessons",
    parent_table: "modules",
    parent_column: "module_id",
};

impl SiblingScope {
    /// Lock the parent row. Returns `false` if the parent does not exist.
    pub async fn lock_parent(
        &self,
        conn: &mut PgConnection,
        parent_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("SELECT id FROM {} WHERE id = $1 FOR UPDATE", self.parent_table);
        let row: Option<(DbId,)> = sqlx::query_as(&query)
            .bind(parent_id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row.is_some())
    }

    /// Current sibling ids in order.
    pub async fn sibling_ids(
        &self,
        conn: &mut PgConnection,
        parent_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let query = format!(
            "SELECT id FROM {} WHERE {} = $1 ORDER BY order_index",
            self.table, self.parent_column
        );
        sqlx::query_scalar(&query)
            .bind(parent_id)
            .fetch_all(&mut *conn)
            .await
    }

    pub async fn count(&self, conn: &mut PgConnection, parent_id: DbId) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM {} WHERE {} = $1",
            self.table, self.parent_column
        );
        sqlx::query_scalar(&query)
            .bind(parent_id)
            .fetch_one(&mut *conn)
            .await
    }

    /// Shift every sibling at or after `at` one slot later.
    pub async fn open_slot(
        &self,
        conn: &mut PgConnection,
        parent_id: DbId,
        at: OrderIndex,
    ) -> Result<(), sqlx::Error> {
        let query = format!(
            "UPDATE {} SET order_index = order_index + 1, updated_at = NOW() \
             WHERE {} = $1 AND order_index >= $2",
            self.table, self.parent_column
        );
        sqlx::query(&query)
            .bind(parent_id)
            .bind(at)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Shift every sibling after `removed` one slot earlier.
    pub async fn close_slot(
        &self,
        conn: &mut PgConnection,
        parent_id: DbId,
        removed: OrderIndex,
    ) -> Result<(), sqlx::Error> {
        let query = format!(
            "UPDATE {} SET order_index = order_index - 1, updated_at = NOW() \
             WHERE {} = $1 AND order_index > $2",
            self.table, self.parent_column
        );
        sqlx::query(&query)
            .bind(parent_id)
            .bind(removed)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Write a validated reorder plan in a single statement.
    ///
    /// The `(parent, order_index)` unique constraint is deferred, so the
    /// intermediate permutation is never checked.
    pub async fn apply(
        &self,
        conn: &mut PgConnection,
        parent_id: DbId,
        plan: &[(DbId, OrderIndex)],
    ) -> Result<(), sqlx::Error> {
        let (ids, indices): (Vec<DbId>, Vec<OrderIndex>) = plan.iter().copied().unzip();
        let query = format!(
            "UPDATE {table} AS t SET order_index = u.order_index, updated_at = NOW() \
             FROM UNNEST($2::BIGINT[], $3::INTEGER[]) AS u(id, order_index) \
             WHERE t.id = u.id AND t.{parent} = $1",
            table = self.table,
            parent = self.parent_column
        );
        sqlx::query(&query)
            .bind(parent_id)
            .bind(&ids)
            .bind(&indices)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
