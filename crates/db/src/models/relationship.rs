//! Business process relationship rows and joined views.

use bpaudit_core::types::{DbId, SequenceNumber};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// The audited subset of a row from `business_process_relationships`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ProcessRelationship {
    pub child_process_id: DbId,
    pub parent_process_id: DbId,
    pub sequence_number: SequenceNumber,
}

// ---------------------------------------------------------------------------
// Joined views
// ---------------------------------------------------------------------------

/// A relationship whose child sits at a level that must not have a parent,
/// joined with both endpoints' names and levels.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct InvalidParentLink {
    pub child_id: DbId,
    pub child_name: String,
    pub child_level: String,
    pub parent_id: DbId,
    pub parent_name: String,
    pub parent_level: String,
}

/// A relationship joined with both endpoint processes, used to render the
/// hierarchy tree.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct HierarchyEdge {
    pub parent_id: DbId,
    pub parent_name: String,
    pub parent_level: String,
    pub child_id: DbId,
    pub child_name: String,
    pub child_level: String,
    pub sequence_number: SequenceNumber,
}
