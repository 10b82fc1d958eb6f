//! Ordering engine for modules within a path and lessons within a module.
//!
//! Siblings under one parent always carry dense zero-based order indices
//! `{0..n-1}`. A reorder request must name every current sibling exactly
//! once and use every index in `0..n` exactly once; anything else is
//! rejected before storage is touched.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, OrderIndex};

/// One entry of a reorder request, as produced by a drag-reorder UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderItem {
    pub id: DbId,
    pub order_index: OrderIndex,
}

/// Validate a reorder request against the full current sibling set.
///
/// Returns `(id, new_order_index)` pairs sorted by the new index.
pub fn plan_reorder(
    siblings: &[DbId],
    requested: &[ReorderItem],
) -> Result<Vec<(DbId, OrderIndex)>, CoreError> {
    if requested.len() != siblings.len() {
        return Err(CoreError::Validation(format!(
            "Reorder must list all {} siblings exactly once, got {} items",
            siblings.len(),
            requested.len()
        )));
    }

    let current: HashSet<DbId> = siblings.iter().copied().collect();
    let mut seen_ids: HashSet<DbId> = HashSet::with_capacity(requested.len());
    let mut by_index: HashMap<OrderIndex, DbId> = HashMap::with_capacity(requested.len());
    let n = requested.len() as i64;

    for item in requested {
        if !current.contains(&item.id) {
            return Err(CoreError::Validation(format!(
                "Item {} is not a sibling in this scope",
                item.id
            )));
        }
        if !seen_ids.insert(item.id) {
            return Err(CoreError::Validation(format!(
                "Item {} appears more than once",
                item.id
            )));
        }
        if item.order_index < 0 || i64::from(item.order_index) >= n {
            return Err(CoreError::Validation(format!(
                "Order index {} for item {} is outside 0..{n}",
                item.order_index, item.id
            )));
        }
        if let Some(other) = by_index.insert(item.order_index, item.id) {
            return Err(CoreError::Validation(format!(
                "Items {other} and {} both request order index {}",
                item.id, item.order_index
            )));
        }
    }

    let mut plan: Vec<(DbId, OrderIndex)> = requested
        .iter()
        .map(|item| (item.id, item.order_index))
        .collect();
    plan.sort_by_key(|&(_, idx)| idx);
    Ok(plan)
}

/// Build a reorder request from a plain id sequence (position = index).
pub fn items_from_sequence(ids: &[DbId]) -> Vec<ReorderItem> {
    ids.iter()
        .enumerate()
        .map(|(pos, &id)| ReorderItem {
            id,
            order_index: pos as OrderIndex,
        })
        .collect()
}

/// Where a newly created sibling lands.
///
/// `None` or anything at/after the end appends; a smaller index inserts at
/// that slot (later siblings shift by one).
pub fn insertion_index(requested: Option<OrderIndex>, sibling_count: i64) -> OrderIndex {
    let end = sibling_count as OrderIndex;
    match requested {
        Some(idx) if idx >= 0 && idx < end => idx,
        _ => end,
    }
}

/// Whether a set of indices is exactly `{0..n-1}`.
pub fn is_dense(indices: &[OrderIndex]) -> bool {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted
        .iter()
        .enumerate()
        .all(|(pos, &idx)| idx == pos as OrderIndex)
}
