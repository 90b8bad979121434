//! Repository for the `business_process_relationships` table.

use bpaudit_core::types::DbId;
use sqlx::PgConnection;

use crate::models::relationship::{HierarchyEdge, InvalidParentLink, ProcessRelationship};

/// Queries over parent/child relationships. `delete_link` is the only
/// statement in the tool that mutates data.
pub struct ProcessRelationshipRepo;

impl ProcessRelationshipRepo {
    /// List every relationship whose child is at exactly `child_level`,
    /// joined with the parent's name and level.
    pub async fn list_with_child_level(
        conn: &mut PgConnection,
        child_level: &str,
    ) -> Result<Vec<InvalidParentLink>, sqlx::Error> {
        sqlx::query_as::<_, InvalidParentLink>(
            "SELECT bp.id AS child_id, bp.business_process AS child_name, bp.level AS child_level,
                    bpr.parent_process_id AS parent_id,
                    parent.business_process AS parent_name, parent.level AS parent_level
             FROM business_processes bp
             JOIN business_process_relationships bpr ON bp.id = bpr.child_process_id
             JOIN business_processes parent ON bpr.parent_process_id = parent.id
             WHERE bp.level = $1
             ORDER BY bp.business_process, bp.id, parent.business_process, parent.id",
        )
        .bind(child_level)
        .fetch_all(conn)
        .await
    }

    /// Delete every relationship row matching the exact child/parent pair.
    ///
    /// Returns the number of rows removed.
    pub async fn delete_link(
        conn: &mut PgConnection,
        child_id: DbId,
        parent_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM business_process_relationships
             WHERE child_process_id = $1 AND parent_process_id = $2",
        )
        .bind(child_id)
        .bind(parent_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// List every relationship joined with both endpoints, ordered by parent
    /// name then sequence number. Parent id separates equally named parents.
    pub async fn list_edges(conn: &mut PgConnection) -> Result<Vec<HierarchyEdge>, sqlx::Error> {
        sqlx::query_as::<_, HierarchyEdge>(
            "SELECT parent.id AS parent_id, parent.business_process AS parent_name,
                    parent.level AS parent_level,
                    child.id AS child_id, child.business_process AS child_name,
                    child.level AS child_level,
                    bpr.sequence_number
             FROM business_process_relationships bpr
             JOIN business_processes parent ON bpr.parent_process_id = parent.id
             JOIN business_processes child ON bpr.child_process_id = child.id
             ORDER BY parent.business_process, parent.id, bpr.sequence_number, child.id",
        )
        .fetch_all(conn)
        .await
    }

    /// List the raw relationship rows recorded for one child.
    pub async fn list_by_child(
        conn: &mut PgConnection,
        child_id: DbId,
    ) -> Result<Vec<ProcessRelationship>, sqlx::Error> {
        sqlx::query_as::<_, ProcessRelationship>(
            "SELECT child_process_id, parent_process_id, sequence_number
             FROM business_process_relationships
             WHERE child_process_id = $1
             ORDER BY parent_process_id",
        )
        .bind(child_id)
        .fetch_all(conn)
        .await
    }
}
