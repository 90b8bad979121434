//! Repository for the `business_processes` table.

use sqlx::PgConnection;

use crate::models::business_process::{BusinessProcess, MultiParentProcess};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "bp.id, bp.business_process, bp.level, bp.status";

/// Read-only queries over business processes.
pub struct BusinessProcessRepo;

impl BusinessProcessRepo {
    /// List every process at exactly `level`, ordered by name.
    pub async fn list_by_level(
        conn: &mut PgConnection,
        level: &str,
    ) -> Result<Vec<BusinessProcess>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM business_processes bp
             WHERE bp.level = $1
             ORDER BY bp.business_process"
        );
        sqlx::query_as::<_, BusinessProcess>(&query)
            .bind(level)
            .fetch_all(conn)
            .await
    }

    /// List processes below `top_level` that never appear as a relationship
    /// child, ordered by level then name.
    pub async fn list_orphans(
        conn: &mut PgConnection,
        top_level: &str,
    ) -> Result<Vec<BusinessProcess>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM business_processes bp
             WHERE bp.level != $1
               AND bp.id NOT IN (
                   SELECT child_process_id FROM business_process_relationships
               )
             ORDER BY bp.level, bp.business_process"
        );
        sqlx::query_as::<_, BusinessProcess>(&query)
            .bind(top_level)
            .fetch_all(conn)
            .await
    }

    /// List processes below `top_level` recorded under more than one
    /// distinct parent, ordered by level then name.
    pub async fn list_with_multiple_parents(
        conn: &mut PgConnection,
        top_level: &str,
    ) -> Result<Vec<MultiParentProcess>, sqlx::Error> {
        sqlx::query_as::<_, MultiParentProcess>(
            "SELECT bp.id, bp.business_process, bp.level,
                    COUNT(DISTINCT bpr.parent_process_id) AS parent_count
             FROM business_processes bp
             JOIN business_process_relationships bpr ON bp.id = bpr.child_process_id
             WHERE bp.level != $1
             GROUP BY bp.id, bp.business_process, bp.level
             HAVING COUNT(DISTINCT bpr.parent_process_id) > 1
             ORDER BY bp.level, bp.business_process",
        )
        .bind(top_level)
        .fetch_all(conn)
        .await
    }
}
