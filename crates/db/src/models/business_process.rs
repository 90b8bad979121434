//! Business process rows.

use bpaudit_core::types::DbId;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// The audited subset of a row from the `business_processes` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BusinessProcess {
    pub id: DbId,
    pub business_process: String,
    pub level: String,
    pub status: String,
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// A process recorded as the child of more than one parent.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct MultiParentProcess {
    pub id: DbId,
    pub business_process: String,
    pub level: String,
    pub parent_count: i64,
}
