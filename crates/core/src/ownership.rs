//! Creator ownership rule.
//!
//! Every module and lesson belongs to exactly one path, and every path to
//! exactly one creator. Writes (and creator-facing reads) are allowed only
//! when the acting user is the creator at the top of that chain.

use crate::error::CoreError;
use crate::types::DbId;

/// Which node of the hierarchy a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentNode {
    Path(DbId),
    Module(DbId),
    Lesson(DbId),
}

impl ContentNode {
    pub fn entity(self) -> &'static str {
        match self {
            ContentNode::Path(_) => "LearningPath",
            ContentNode::Module(_) => "Module",
            ContentNode::Lesson(_) => "Lesson",
        }
    }

    pub fn id(self) -> DbId {
        match self {
            ContentNode::Path(id) | ContentNode::Module(id) | ContentNode::Lesson(id) => id,
        }
    }
}

/// The resolved top of a node's ownership chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerChain {
    pub path_id: DbId,
    pub creator_id: DbId,
}

/// Check a resolved chain against the acting user.
///
/// `chain` is `None` when any link (lesson, module or path) is missing,
/// which surfaces as NotFound for the requested node.
pub fn ensure_owner(
    actor_id: DbId,
    node: ContentNode,
    chain: Option<OwnerChain>,
) -> Result<OwnerChain, CoreError> {
    let chain = chain.ok_or(CoreError::NotFound {
        entity: node.entity(),
        id: node.id(),
    })?;
    if chain.creator_id != actor_id {
        return Err(CoreError::Forbidden(format!(
            "Not authorized to modify {} {}",
            node.entity(),
            node.id()
        )));
    }
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const CHAIN: OwnerChain = OwnerChain {
        path_id: 1,
        creator_id: 10,
    };

    #[test]
    fn owner_passes() {
        assert_eq!(
            ensure_owner(10, ContentNode::Lesson(5), Some(CHAIN)).unwrap(),
            CHAIN
        );
    }

    #[test]
    fn other_creator_forbidden() {
        let err = ensure_owner(11, ContentNode::Module(3), Some(CHAIN)).unwrap_err();
        assert_matches!(err, CoreError::Forbidden(_));
    }

    #[test]
    fn broken_chain_not_found() {
        let err = ensure_owner(10, ContentNode::Lesson(7), None).unwrap_err();
        assert_matches!(
            err,
            CoreError::NotFound {
                entity: "Lesson",
                id: 7
            }
        );
    }
}
